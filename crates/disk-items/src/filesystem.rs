//! The item arena: construction, queries, paths and the invariant checker

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::debug;

use crate::error::{FsError, Result};
use crate::file_type::FileType;
use crate::name::{compare_names, effective_name, names_collide};
use crate::node::{
    DirectoryNode, FileNode, Item, ItemHeader, ItemId, ItemKind, LinkNode, Node,
};
use crate::options::{ClockMode, FileSystemOptions};
use crate::traversal::{Hierarchy, TraversalOrder, TreeTraversal};

/// An in-memory forest of directories, files and links
///
/// All items live in one arena and are addressed by [`ItemId`] handles.
/// Every public operation either completes the whole change (both sides of
/// each parent/child edge) or returns an error without touching anything.
///
/// # Example
///
/// ```
/// use disk_items::prelude::*;
///
/// let mut fs = FileSystem::new();
/// let home = fs.create_root_directory("home").unwrap();
/// let notes = fs.create_empty_file(home, "notes", FileType::Text).unwrap();
///
/// assert_eq!(fs.absolute_path(notes).unwrap(), "/home/notes.txt");
/// assert_eq!(fs.get_item(home, "NOTES").unwrap(), Some(notes));
/// ```
#[derive(Debug, Clone)]
pub struct FileSystem {
    /// Arena storage; an item's handle is its index
    nodes: Vec<Node>,
    options: FileSystemOptions,
    /// Readings taken from the logical clock so far
    ticks: u64,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem {
    /// Create an empty filesystem with default options
    pub fn new() -> Self {
        Self::with_options(FileSystemOptions::default())
    }

    /// Create an empty filesystem with the given options
    pub fn with_options(options: FileSystemOptions) -> Self {
        Self {
            nodes: Vec::new(),
            options,
            ticks: 0,
        }
    }

    /// The options this filesystem was created with
    pub fn options(&self) -> &FileSystemOptions {
        &self.options
    }

    /// Number of items ever created, terminated ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no item was ever created
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All handles issued so far, in creation order
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        (0..self.nodes.len()).map(ItemId::new)
    }

    /// Live items without a parent
    pub fn roots(&self) -> Vec<ItemId> {
        self.ids()
            .filter(|&id| {
                let node = &self.nodes[id.get()];
                !node.is_terminated() && node.is_root()
            })
            .collect()
    }

    /// Get an item by its handle
    pub fn get(&self, id: ItemId) -> Option<&Node> {
        self.nodes.get(id.get())
    }

    pub(crate) fn node(&self, id: ItemId) -> Result<&Node> {
        self.get(id).ok_or(FsError::UnknownItem(id))
    }

    pub(crate) fn node_mut(&mut self, id: ItemId) -> &mut Node {
        &mut self.nodes[id.get()]
    }

    pub(crate) fn directory(&self, id: ItemId) -> Result<&DirectoryNode> {
        self.node(id)?
            .as_directory()
            .ok_or_else(|| FsError::invalid_argument(format!("{} is not a directory", id)))
    }

    /// Name of an item known to exist
    pub(crate) fn name_of(&self, id: ItemId) -> &str {
        self.nodes[id.get()].name()
    }

    /// Returns true if `id` is a live, writable directory
    pub(crate) fn is_writable_directory(&self, id: ItemId) -> bool {
        self.get(id)
            .and_then(Node::as_directory)
            .map(|dir| !dir.header.terminated && dir.writable)
            .unwrap_or(false)
    }

    /// Read the configured clock
    ///
    /// Only called once all preconditions of an operation hold.
    pub(crate) fn now(&mut self) -> SystemTime {
        match self.options.clock {
            ClockMode::System => SystemTime::now(),
            ClockMode::Logical => {
                self.ticks += 1;
                UNIX_EPOCH + Duration::from_secs(self.ticks)
            }
        }
    }

    /// Checks that `id` may be renamed, moved or destroyed
    ///
    /// The item must be live, writable when it is a file or directory, and
    /// its parent (if any) must be writable.
    pub(crate) fn check_mutable(&self, id: ItemId) -> Result<&Node> {
        let node = self.node(id)?;
        if node.is_terminated() {
            return Err(FsError::Terminated(id));
        }
        if node.writable() == Some(false) {
            return Err(FsError::NotWritable(id));
        }
        if let Some(parent) = node.parent() {
            if !self.is_writable_directory(parent) {
                return Err(FsError::NotWritable(parent));
            }
        }
        Ok(node)
    }

    /// Checks that an item named `name` may be created inside `parent`
    fn check_new_child(&self, parent: ItemId, name: &str) -> Result<()> {
        let dir = self.directory(parent)?;
        if dir.is_terminated() {
            return Err(FsError::invalid_argument(format!(
                "parent {} is terminated",
                parent
            )));
        }
        if !dir.writable {
            return Err(FsError::NotWritable(parent));
        }
        if self.get_item(parent, name)?.is_some() {
            return Err(FsError::name_conflict(name));
        }
        Ok(())
    }

    /// Push a fully validated node into the arena and link it into its parent
    fn insert_node(&mut self, node: Node) -> ItemId {
        let id = ItemId::new(self.nodes.len());
        let parent = node.parent();
        let created_at = node.created_at();
        self.nodes.push(node);
        if let Some(parent) = parent {
            self.add_item(parent, id, created_at);
        }
        id
    }

    /// Create a directory, as a root when `parent` is `None`
    ///
    /// An illegal name is replaced by the default name.
    ///
    /// # Errors
    ///
    /// - `UnknownItem` if the parent handle is unknown
    /// - `InvalidArgument` if the parent is not a live directory
    /// - `NotWritable` if the parent is not writable
    /// - `NameConflict` if the parent already holds the (effective) name
    pub fn create_directory(
        &mut self,
        parent: Option<ItemId>,
        name: &str,
        writable: bool,
    ) -> Result<ItemId> {
        let name = effective_name(ItemKind::Directory, name);
        if let Some(parent) = parent {
            self.check_new_child(parent, &name)?;
        }

        let now = self.now();
        let id = self.insert_node(Node::Directory(DirectoryNode {
            header: ItemHeader::new(name, now, parent),
            writable,
            children: Vec::new(),
        }));
        debug!("created directory {} at {:?}", id, self.absolute_path(id));
        Ok(id)
    }

    /// Create a writable root directory
    pub fn create_root_directory(&mut self, name: &str) -> Result<ItemId> {
        self.create_directory(None, name, true)
    }

    /// Create a file inside `parent`
    ///
    /// An illegal name is replaced by the default name, and a size above the
    /// configured maximum by zero.
    ///
    /// # Errors
    ///
    /// As for [`create_directory`](Self::create_directory).
    pub fn create_file(
        &mut self,
        parent: ItemId,
        name: &str,
        file_type: FileType,
        size: u64,
        writable: bool,
    ) -> Result<ItemId> {
        let name = effective_name(ItemKind::File, name);
        self.check_new_child(parent, &name)?;
        let size = if size <= self.options.max_file_size {
            size
        } else {
            debug!("size {} exceeds the maximum, using 0", size);
            0
        };

        let now = self.now();
        let id = self.insert_node(Node::File(FileNode {
            header: ItemHeader::new(name, now, Some(parent)),
            writable,
            file_type,
            size,
        }));
        debug!("created file {} at {:?}", id, self.absolute_path(id));
        Ok(id)
    }

    /// Create an empty, writable file inside `parent`
    pub fn create_empty_file(
        &mut self,
        parent: ItemId,
        name: &str,
        file_type: FileType,
    ) -> Result<ItemId> {
        self.create_file(parent, name, file_type, 0, true)
    }

    /// Create a link inside `parent` referring to `target`
    ///
    /// # Errors
    ///
    /// - `UnknownItem` if either handle is unknown
    /// - `InvalidArgument` if the target is a link or terminated, or the
    ///   parent is not a live directory
    /// - `NotWritable` if the parent is not writable
    /// - `NameConflict` if the parent already holds the (effective) name
    pub fn create_link(&mut self, parent: ItemId, name: &str, target: ItemId) -> Result<ItemId> {
        let target_node = self.node(target)?;
        if target_node.kind() == ItemKind::Link {
            return Err(FsError::invalid_argument(format!(
                "link target {} is itself a link",
                target
            )));
        }
        if target_node.is_terminated() {
            return Err(FsError::invalid_argument(format!(
                "link target {} is terminated",
                target
            )));
        }
        let name = effective_name(ItemKind::Link, name);
        self.check_new_child(parent, &name)?;

        let now = self.now();
        let id = self.insert_node(Node::Link(LinkNode {
            header: ItemHeader::new(name, now, Some(parent)),
            target,
        }));
        debug!("created link {} to {}", id, target);
        Ok(id)
    }

    /// The kind of an item
    pub fn kind(&self, id: ItemId) -> Result<ItemKind> {
        Ok(self.node(id)?.kind())
    }

    /// The name of an item (without extension)
    pub fn name(&self, id: ItemId) -> Result<&str> {
        Ok(self.node(id)?.name())
    }

    /// The name of an item as shown in paths (`name.ext` for files)
    pub fn display_name(&self, id: ItemId) -> Result<String> {
        Ok(self.node(id)?.display_name())
    }

    /// The directory holding an item, if any
    pub fn parent(&self, id: ItemId) -> Result<Option<ItemId>> {
        Ok(self.node(id)?.parent())
    }

    /// Returns true if the item has no parent
    pub fn is_root(&self, id: ItemId) -> Result<bool> {
        Ok(self.node(id)?.is_root())
    }

    /// Returns true once the item has been terminated
    pub fn is_terminated(&self, id: ItemId) -> Result<bool> {
        Ok(self.node(id)?.is_terminated())
    }

    /// When the item was created
    pub fn created_at(&self, id: ItemId) -> Result<SystemTime> {
        Ok(self.node(id)?.created_at())
    }

    /// When the item was last modified, if ever
    pub fn modified_at(&self, id: ItemId) -> Result<Option<SystemTime>> {
        Ok(self.node(id)?.modified_at())
    }

    /// The writable flag of a file or directory
    pub fn is_writable(&self, id: ItemId) -> Result<bool> {
        self.node(id)?
            .writable()
            .ok_or_else(|| FsError::invalid_argument(format!("{} has no writable flag", id)))
    }

    fn file(&self, id: ItemId) -> Result<&FileNode> {
        self.node(id)?
            .as_file()
            .ok_or_else(|| FsError::invalid_argument(format!("{} is not a file", id)))
    }

    /// Size of a file in bytes
    pub fn size(&self, id: ItemId) -> Result<u64> {
        Ok(self.file(id)?.size)
    }

    /// Type of a file
    pub fn file_type(&self, id: ItemId) -> Result<FileType> {
        Ok(self.file(id)?.file_type)
    }

    /// The item a link refers to
    pub fn link_target(&self, id: ItemId) -> Result<ItemId> {
        self.node(id)?
            .as_link()
            .map(LinkNode::target)
            .ok_or_else(|| FsError::invalid_argument(format!("{} is not a link", id)))
    }

    /// Returns true if neither the link nor its target is terminated
    pub fn is_valid_link(&self, id: ItemId) -> Result<bool> {
        let link = self.node(id)?;
        let target = self.link_target(id)?;
        Ok(!link.is_terminated() && !self.nodes[target.get()].is_terminated())
    }

    /// Returns true if `id` lies somewhere below `dir`
    pub fn is_direct_or_indirect_child_of(&self, id: ItemId, dir: ItemId) -> Result<bool> {
        self.node(id)?;
        self.node(dir)?;
        Ok(self.is_ancestor_of(dir, id))
    }

    /// Returns true if the use periods of both items intersect
    pub fn has_overlapping_use_period(&self, a: ItemId, b: ItemId) -> Result<bool> {
        Ok(self
            .node(a)?
            .header()
            .has_overlapping_use_period(self.node(b)?.header()))
    }

    /// `/`-joined display names from the root down to the item
    pub fn absolute_path(&self, id: ItemId) -> Result<String> {
        let mut segments = vec![self.node(id)?.display_name()];
        segments.extend(
            self.ancestors(id)
                .map(|ancestor| self.nodes[ancestor.get()].display_name()),
        );
        Ok(segments
            .iter()
            .rev()
            .fold(String::new(), |path, segment| path + "/" + segment))
    }

    /// Bytes used by the item: the size of a file, nothing for a link and the
    /// sum over the subtree for a directory
    pub fn total_disk_usage(&self, id: ItemId) -> Result<u64> {
        self.node(id)?;
        Ok(self
            .walk_from(id, TraversalOrder::PreOrder)
            .filter_map(|item| self.nodes[item.get()].as_file())
            .fold(0u64, |total, file| total.saturating_add(file.size)))
    }

    /// Verify every structural invariant of the forest
    ///
    /// Returns an `InvalidState` error describing the first breach found.
    pub fn check_invariants(&self) -> Result<()> {
        for id in self.ids() {
            self.check_item_invariants(id)?;
        }
        Ok(())
    }

    fn check_item_invariants(&self, id: ItemId) -> Result<()> {
        let fail = |msg: String| Err(FsError::invalid_state(format!("{}: {}", id, msg)));
        let node = &self.nodes[id.get()];

        if !node.can_have_as_name(node.name()) {
            return fail(format!("illegal name {:?}", node.name()));
        }
        if node.is_terminated() {
            if node.parent().is_some() {
                return fail("terminated item still has a parent".to_string());
            }
            if node.as_directory().map_or(false, |dir| !dir.is_empty()) {
                return fail("terminated directory still has children".to_string());
            }
        } else if node.is_root() && node.kind().is_leaf() {
            return fail(format!("live {} without a parent", node.kind()));
        }

        if let Some(parent) = node.parent() {
            let Some(dir) = self.get(parent).and_then(Node::as_directory) else {
                return fail(format!("parent {} is not a directory", parent));
            };
            if dir.is_terminated() {
                return fail(format!("parent {} is terminated", parent));
            }
            let occurrences = dir.children.iter().filter(|&&c| c == id).count();
            if occurrences != 1 {
                return fail(format!("listed {} times by parent {}", occurrences, parent));
            }
        }

        // Walking up from a node in a cycle would never reach a root
        let mut steps = 0;
        let mut current = node.parent();
        while let Some(ancestor) = current {
            steps += 1;
            if ancestor == id || steps > self.nodes.len() {
                return fail("item is its own ancestor".to_string());
            }
            current = self.get(ancestor).and_then(Item::parent);
        }

        match node {
            Node::Directory(dir) => {
                if !self.has_proper_items(id)? {
                    return fail("children are not properly ordered and linked".to_string());
                }
                for pair in dir.children.windows(2) {
                    if names_collide(self.name_of(pair[0]), self.name_of(pair[1])) {
                        return fail(format!("duplicate name {:?}", self.name_of(pair[1])));
                    }
                }
            }
            Node::File(file) => {
                if file.size > self.options.max_file_size {
                    return fail(format!("size {} exceeds the maximum", file.size));
                }
            }
            Node::Link(link) => match self.get(link.target) {
                Some(target) if target.kind() != ItemKind::Link => {}
                _ => return fail(format!("bad link target {}", link.target)),
            },
        }
        Ok(())
    }

    /// Index at which a child named `name` belongs in `dir`
    pub(crate) fn insertion_index_in(&self, dir: &DirectoryNode, name: &str) -> usize {
        dir.children
            .partition_point(|&child| compare_names(self.name_of(child), name).is_le())
    }
}

impl Hierarchy for FileSystem {
    fn parent_of(&self, id: ItemId) -> Option<ItemId> {
        self.get(id).and_then(Item::parent)
    }

    fn children_of(&self, id: ItemId) -> Box<dyn Iterator<Item = ItemId> + '_> {
        match self.get(id).and_then(Node::as_directory) {
            Some(dir) => Box::new(dir.children.iter().copied()),
            None => Box::new(std::iter::empty()),
        }
    }
}
