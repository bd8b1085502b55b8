//! Tree navigation and traversal over item handles

use std::collections::VecDeque;

use crate::node::ItemId;

/// A forest of items connected by parent/child edges
///
/// Implementations provide the basic edges; the derived methods walk them.
/// Every method tolerates unknown handles by treating them as isolated.
pub trait Hierarchy {
    /// Get the parent of an item
    ///
    /// Returns `None` for roots and unknown handles.
    fn parent_of(&self, id: ItemId) -> Option<ItemId>;

    /// Iterate over the children of an item, in stored order
    ///
    /// Returns an empty iterator for leaves or unknown handles.
    fn children_of(&self, id: ItemId) -> Box<dyn Iterator<Item = ItemId> + '_>;

    /// Number of ancestors of an item (roots are at depth 0)
    fn depth(&self, id: ItemId) -> usize
    where
        Self: Sized,
    {
        self.ancestors(id).count()
    }

    /// Iterate over the ancestors of an item, from parent to root
    fn ancestors(&self, id: ItemId) -> Ancestors<'_, Self>
    where
        Self: Sized,
    {
        Ancestors {
            tree: self,
            next: self.parent_of(id),
        }
    }

    /// The topmost ancestor of an item (the item itself for a root)
    fn root_of(&self, id: ItemId) -> ItemId
    where
        Self: Sized,
    {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Returns true if `ancestor` lies on the path from `descendant` to its root
    fn is_ancestor_of(&self, ancestor: ItemId, descendant: ItemId) -> bool
    where
        Self: Sized,
    {
        self.ancestors(descendant).any(|id| id == ancestor)
    }
}

/// Iterator over the chain of parents above an item
pub struct Ancestors<'a, T: Hierarchy + ?Sized> {
    tree: &'a T,
    next: Option<ItemId>,
}

impl<'a, T: Hierarchy + ?Sized> Iterator for Ancestors<'a, T> {
    type Item = ItemId;

    fn next(&mut self) -> Option<ItemId> {
        let current = self.next?;
        self.next = self.tree.parent_of(current);
        Some(current)
    }
}

/// Traversal order for walking a subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Visit parent before children (top-down)
    PreOrder,
    /// Visit children before parent (bottom-up)
    PostOrder,
    /// Visit level by level (breadth-first)
    BreadthFirst,
}

/// Extension trait providing subtree walks
///
/// This trait is automatically implemented for all types that implement `Hierarchy`.
pub trait TreeTraversal: Hierarchy {
    /// Walk the subtree rooted at `start` in the specified order
    fn walk_from(&self, start: ItemId, order: TraversalOrder) -> TreeWalker<'_, Self>
    where
        Self: Sized,
    {
        TreeWalker::new(self, start, order)
    }

    /// All direct and indirect children of an item, in pre-order
    fn descendants(&self, id: ItemId) -> Vec<ItemId>
    where
        Self: Sized,
    {
        self.walk_from(id, TraversalOrder::PreOrder).skip(1).collect()
    }
}

// Blanket implementation for all Hierarchy types
impl<T: Hierarchy> TreeTraversal for T {}

/// Iterator for traversing a subtree in different orders
///
/// Depth-first orders use `pending` as a stack, breadth-first as a queue.
/// The flag marks items whose children were already scheduled.
pub struct TreeWalker<'a, T: Hierarchy + ?Sized> {
    tree: &'a T,
    order: TraversalOrder,
    pending: VecDeque<(ItemId, bool)>,
}

impl<'a, T: Hierarchy + ?Sized> TreeWalker<'a, T> {
    /// Create a walker over the subtree rooted at `start`
    pub fn new(tree: &'a T, start: ItemId, order: TraversalOrder) -> Self {
        Self {
            tree,
            order,
            pending: VecDeque::from([(start, false)]),
        }
    }

    /// Schedule the children of `id` so the first child is popped first
    fn schedule_children(&mut self, id: ItemId) {
        let children: Vec<_> = self.tree.children_of(id).collect();
        self.pending
            .extend(children.into_iter().rev().map(|child| (child, false)));
    }
}

impl<'a, T: Hierarchy + ?Sized> Iterator for TreeWalker<'a, T> {
    type Item = ItemId;

    fn next(&mut self) -> Option<Self::Item> {
        match self.order {
            TraversalOrder::PreOrder => {
                let (current, _) = self.pending.pop_back()?;
                self.schedule_children(current);
                Some(current)
            }
            TraversalOrder::PostOrder => loop {
                let (current, scheduled) = self.pending.pop_back()?;
                if scheduled {
                    return Some(current);
                }
                self.pending.push_back((current, true));
                self.schedule_children(current);
            },
            TraversalOrder::BreadthFirst => {
                let (current, _) = self.pending.pop_front()?;
                let children = self.tree.children_of(current).map(|child| (child, false));
                self.pending.extend(children);
                Some(current)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Simple hierarchy over plain vectors
    struct TestTree {
        parents: Vec<Option<ItemId>>,
        children: Vec<Vec<ItemId>>,
    }

    impl TestTree {
        fn new() -> Self {
            Self {
                parents: vec![None],
                children: vec![vec![]],
            }
        }

        fn add_child(&mut self, parent: ItemId) -> ItemId {
            let id = ItemId::new(self.parents.len());
            self.parents.push(Some(parent));
            self.children.push(vec![]);
            self.children[parent.get()].push(id);
            id
        }
    }

    impl Hierarchy for TestTree {
        fn parent_of(&self, id: ItemId) -> Option<ItemId> {
            self.parents.get(id.get()).copied().flatten()
        }

        fn children_of(&self, id: ItemId) -> Box<dyn Iterator<Item = ItemId> + '_> {
            Box::new(
                self.children
                    .get(id.get())
                    .map(|c| c.iter().copied())
                    .into_iter()
                    .flatten(),
            )
        }
    }

    const ROOT: ItemId = ItemId(0);

    #[test]
    fn test_depth_and_ancestors() {
        let mut tree = TestTree::new();
        let dir1 = tree.add_child(ROOT);
        let dir2 = tree.add_child(dir1);
        let file = tree.add_child(dir2);

        assert_eq!(tree.depth(ROOT), 0);
        assert_eq!(tree.depth(dir1), 1);
        assert_eq!(tree.depth(file), 3);
        assert_eq!(tree.ancestors(file).collect::<Vec<_>>(), vec![dir2, dir1, ROOT]);
        assert_eq!(tree.root_of(file), ROOT);
        assert_eq!(tree.root_of(ROOT), ROOT);
    }

    #[test]
    fn test_is_ancestor_of() {
        let mut tree = TestTree::new();
        let dir1 = tree.add_child(ROOT);
        let file = tree.add_child(dir1);
        let other = tree.add_child(ROOT);

        assert!(tree.is_ancestor_of(ROOT, file));
        assert!(tree.is_ancestor_of(dir1, file));
        assert!(!tree.is_ancestor_of(file, dir1));
        assert!(!tree.is_ancestor_of(other, file));
        assert!(!tree.is_ancestor_of(file, file));
    }

    #[test]
    fn test_tree_traversal_preorder() {
        let mut tree = TestTree::new();
        let dir1 = tree.add_child(ROOT);
        let file1 = tree.add_child(ROOT);
        let file2 = tree.add_child(dir1);

        let nodes: Vec<_> = tree.walk_from(ROOT, TraversalOrder::PreOrder).collect();
        assert_eq!(nodes, vec![ROOT, dir1, file2, file1]);
        assert_eq!(tree.descendants(ROOT), vec![dir1, file2, file1]);
    }

    #[test]
    fn test_tree_traversal_postorder() {
        let mut tree = TestTree::new();
        let dir1 = tree.add_child(ROOT);
        let file1 = tree.add_child(ROOT);
        let file2 = tree.add_child(dir1);

        let nodes: Vec<_> = tree.walk_from(ROOT, TraversalOrder::PostOrder).collect();
        assert_eq!(nodes, vec![file2, dir1, file1, ROOT]);
    }

    #[test]
    fn test_tree_traversal_breadth_first() {
        let mut tree = TestTree::new();
        let dir1 = tree.add_child(ROOT);
        let file1 = tree.add_child(ROOT);
        let file2 = tree.add_child(dir1);

        let nodes: Vec<_> = tree.walk_from(ROOT, TraversalOrder::BreadthFirst).collect();
        assert_eq!(nodes, vec![ROOT, dir1, file1, file2]);
    }
}
