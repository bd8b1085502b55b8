//! Termination of single items and recursive deletion of subtrees

use std::time::SystemTime;

use log::debug;

use crate::error::{FsError, Result};
use crate::filesystem::FileSystem;
use crate::node::{Item, ItemId, Node};
use crate::traversal::{TraversalOrder, TreeTraversal};

impl FileSystem {
    /// Returns true if `id` may be terminated on its own
    pub fn can_be_terminated(&self, id: ItemId) -> Result<bool> {
        let node = self.node(id)?;
        let is_empty = node.as_directory().map_or(true, |dir| dir.is_empty());
        Ok(is_empty && self.check_mutable(id).is_ok())
    }

    /// Terminate a file, a link or an empty directory
    ///
    /// The item is detached from its parent. Its handle stays valid and
    /// reports the item as terminated.
    ///
    /// # Errors
    ///
    /// - `Terminated` if the item is already terminated
    /// - `InvalidState` if the item is a directory with children
    /// - `NotWritable` if the item or its parent is not writable
    pub fn terminate(&mut self, id: ItemId) -> Result<()> {
        let node = self.node(id)?;
        if node.is_terminated() {
            return Err(FsError::Terminated(id));
        }
        if node.as_directory().map_or(false, |dir| !dir.is_empty()) {
            return Err(FsError::invalid_state(format!(
                "directory {} is not empty",
                id
            )));
        }
        self.check_mutable(id)?;

        let now = self.now();
        self.detach_and_terminate(id, now);
        Ok(())
    }

    /// Returns true if `id` and everything below it may be deleted
    pub fn can_be_recursively_deleted(&self, id: ItemId) -> Result<bool> {
        self.node(id)?;
        Ok(self.subtree_deletable(id))
    }

    fn subtree_deletable(&self, id: ItemId) -> bool {
        self.walk_from(id, TraversalOrder::PreOrder)
            .all(|item| self.check_mutable(item).is_ok())
    }

    /// Terminate `id` together with all of its direct and indirect children
    ///
    /// Nothing is changed unless the whole subtree may be deleted.
    ///
    /// # Errors
    ///
    /// - `Terminated` if the item is already terminated
    /// - `InvalidState` if some item of the subtree may not be deleted
    pub fn delete_recursive(&mut self, id: ItemId) -> Result<()> {
        if self.node(id)?.is_terminated() {
            return Err(FsError::Terminated(id));
        }
        if !self.subtree_deletable(id) {
            return Err(FsError::invalid_state(format!(
                "{} cannot be deleted recursively",
                id
            )));
        }

        let now = self.now();
        self.delete_subtree(id, now);
        debug!("deleted subtree of {}", id);
        Ok(())
    }

    fn delete_subtree(&mut self, id: ItemId, now: SystemTime) {
        // Descend along last children; an item goes once it has none left
        let mut pending = vec![id];
        while let Some(&current) = pending.last() {
            let last_child = self
                .get(current)
                .and_then(Node::as_directory)
                .and_then(|dir| dir.children().last().copied());
            match last_child {
                Some(child) => pending.push(child),
                None => {
                    pending.pop();
                    self.detach_and_terminate(current, now);
                }
            }
        }
    }

    fn detach_and_terminate(&mut self, id: ItemId, now: SystemTime) {
        let header = self.node_mut(id).header_mut();
        let parent = header.parent.take();
        header.terminated = true;
        if let Some(parent) = parent {
            self.remove_item(parent, id, now);
        }
        debug!("terminated {}", id);
    }
}

#[cfg(test)]
mod tests {
    use crate::error::FsError;
    use crate::file_type::FileType;
    use crate::filesystem::FileSystem;

    #[test]
    fn test_terminate_file() {
        let mut fs = FileSystem::new();
        let root = fs.create_root_directory("root").unwrap();
        let file = fs.create_empty_file(root, "f", FileType::Text).unwrap();

        assert!(fs.can_be_terminated(file).unwrap());
        fs.terminate(file).unwrap();

        assert!(fs.is_terminated(file).unwrap());
        assert!(fs.is_root(file).unwrap());
        assert_eq!(fs.child_count(root).unwrap(), 0);
        assert_eq!(fs.absolute_path(file).unwrap(), "/f.txt");
        assert_eq!(fs.terminate(file).unwrap_err(), FsError::Terminated(file));
        assert!(fs.check_invariants().is_ok());
    }

    #[test]
    fn test_terminate_non_empty_directory() {
        let mut fs = FileSystem::new();
        let root = fs.create_root_directory("root").unwrap();
        fs.create_empty_file(root, "f", FileType::Text).unwrap();

        assert!(!fs.can_be_terminated(root).unwrap());
        let err = fs.terminate(root).unwrap_err();
        assert!(matches!(err, FsError::InvalidState(_)));
        assert!(err.is_invalid_state());
    }

    #[test]
    fn test_terminate_in_read_only_directory() {
        let mut fs = FileSystem::new();
        let root = fs.create_root_directory("root").unwrap();
        let file = fs.create_empty_file(root, "f", FileType::Text).unwrap();
        fs.set_writable(root, false).unwrap();

        assert!(!fs.can_be_terminated(file).unwrap());
        assert_eq!(fs.terminate(file).unwrap_err(), FsError::NotWritable(root));
        assert!(!fs.is_terminated(file).unwrap());
    }

    #[test]
    fn test_terminated_target_makes_link_stale() {
        let mut fs = FileSystem::new();
        let root = fs.create_root_directory("root").unwrap();
        let file = fs.create_empty_file(root, "f", FileType::Text).unwrap();
        let link = fs.create_link(root, "l", file).unwrap();

        fs.terminate(file).unwrap();
        assert!(!fs.is_valid_link(link).unwrap());
        assert!(fs.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_recursive() {
        let mut fs = FileSystem::new();
        let root = fs.create_root_directory("root").unwrap();
        let sub = fs.create_directory(Some(root), "sub", true).unwrap();
        let a = fs.create_empty_file(sub, "a", FileType::Text).unwrap();
        let b = fs.create_empty_file(sub, "b", FileType::Pdf).unwrap();
        let link = fs.create_link(root, "l", a).unwrap();

        fs.delete_recursive(root).unwrap();

        for id in [root, sub, a, b, link] {
            assert!(fs.is_terminated(id).unwrap());
            assert!(fs.is_root(id).unwrap());
        }
        assert!(fs.children(root).unwrap().is_empty());
        assert!(fs.children(sub).unwrap().is_empty());
        assert!(fs.roots().is_empty());
        assert!(fs.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_recursive_blocked_by_read_only_file() {
        let mut fs = FileSystem::new();
        let root = fs.create_root_directory("root").unwrap();
        let sub = fs.create_directory(Some(root), "sub", true).unwrap();
        let a = fs.create_empty_file(sub, "a", FileType::Text).unwrap();
        fs.create_file(sub, "b", FileType::Text, 0, false).unwrap();

        assert!(!fs.can_be_recursively_deleted(root).unwrap());
        assert!(matches!(
            fs.delete_recursive(root),
            Err(FsError::InvalidState(_))
        ));
        assert!(!fs.is_terminated(a).unwrap());
        assert_eq!(fs.child_count(sub).unwrap(), 2);
    }

    #[test]
    fn test_delete_recursive_deep_chain() {
        let mut fs = FileSystem::new();
        let root = fs.create_root_directory("root").unwrap();
        let mut chain = vec![root];
        for _ in 0..50_000 {
            let parent = *chain.last().unwrap();
            chain.push(fs.create_directory(Some(parent), "d", true).unwrap());
        }
        let leaf = *chain.last().unwrap();
        fs.create_empty_file(leaf, "f", FileType::Text).unwrap();

        assert!(fs.can_be_recursively_deleted(root).unwrap());
        fs.set_writable(leaf, false).unwrap();
        assert!(!fs.can_be_recursively_deleted(root).unwrap());
        fs.set_writable(leaf, true).unwrap();

        fs.delete_recursive(root).unwrap();
        assert!(chain.iter().all(|&id| fs.is_terminated(id).unwrap()));
        assert!(chain.iter().all(|&id| fs.is_root(id).unwrap()));
        assert_eq!(fs.child_count(leaf).unwrap(), 0);
    }
}
