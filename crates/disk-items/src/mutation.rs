//! Renaming, moving, resizing and writability changes

use log::debug;

use crate::error::{FsError, Result};
use crate::filesystem::FileSystem;
use crate::name::effective_name;
use crate::node::{Item, ItemId, ItemKind, Node};

impl FileSystem {
    /// Give an item a new name
    ///
    /// An illegal name is replaced by the default name. The item keeps its
    /// place in the tree and moves to its new sorted position among its
    /// siblings.
    ///
    /// # Errors
    ///
    /// - `Terminated` if the item is terminated
    /// - `NotWritable` if the item or its parent is not writable
    /// - `NameConflict` if a sibling already has the (effective) name
    pub fn rename(&mut self, id: ItemId, new_name: &str) -> Result<()> {
        let node = self.check_mutable(id)?;
        let name = effective_name(node.kind(), new_name);
        let parent = node.parent();
        if let Some(parent) = parent {
            if self.get_item(parent, &name)?.map_or(false, |other| other != id) {
                return Err(FsError::name_conflict(name));
            }
        }

        let now = self.now();
        debug!("renaming {} from {:?} to {:?}", id, self.name_of(id), name);
        let header = self.node_mut(id).header_mut();
        header.name = name;
        header.modified_at = Some(now);
        if let Some(parent) = parent {
            self.restore_order(parent, id);
        }
        Ok(())
    }

    /// Move an item into the directory `target`
    ///
    /// # Errors
    ///
    /// - `UnknownItem` if either handle is unknown
    /// - `Terminated` if the item is terminated
    /// - `InvalidArgument` if the target is not a live directory, is already
    ///   the item's parent, or is the item itself or one of its descendants
    /// - `NotWritable` if the item, its current parent or the target is not
    ///   writable
    /// - `NameConflict` if the target already holds the item's name
    pub fn move_to(&mut self, id: ItemId, target: ItemId) -> Result<()> {
        let node = self.node(id)?;
        if node.is_terminated() {
            return Err(FsError::Terminated(id));
        }
        let target_dir = self.directory(target)?;
        if target_dir.is_terminated() {
            return Err(FsError::invalid_argument(format!(
                "target {} is terminated",
                target
            )));
        }
        if node.parent() == Some(target) {
            return Err(FsError::invalid_argument(format!(
                "{} is already in {}",
                id, target
            )));
        }
        if !self.can_have_as_parent_directory(id, Some(target)) {
            return Err(FsError::invalid_argument(format!(
                "cannot move {} into its own subtree",
                id
            )));
        }
        let node = self.check_mutable(id)?;
        if !target_dir.writable {
            return Err(FsError::NotWritable(target));
        }
        if self.contains_name(target, node.name())? {
            return Err(FsError::name_conflict(node.name()));
        }

        let old_parent = node.parent();
        let now = self.now();
        if let Some(old_parent) = old_parent {
            self.node_mut(id).header_mut().parent = None;
            self.remove_item(old_parent, id, now);
        }
        let header = self.node_mut(id).header_mut();
        header.parent = Some(target);
        header.modified_at = Some(now);
        self.add_item(target, id, now);
        debug!("moved {} from {:?} to {}", id, old_parent, target);
        Ok(())
    }

    /// Detach a directory from its parent, making it a root
    ///
    /// # Errors
    ///
    /// - `Terminated` if the directory is terminated
    /// - `InvalidArgument` if the item is not a directory or already a root
    /// - `NotWritable` if the directory or its parent is not writable
    pub fn make_root(&mut self, id: ItemId) -> Result<()> {
        let node = self.node(id)?;
        if node.is_terminated() {
            return Err(FsError::Terminated(id));
        }
        if node.kind() != ItemKind::Directory {
            return Err(FsError::invalid_argument(format!(
                "only directories can be roots, {} is a {}",
                id,
                node.kind()
            )));
        }
        let Some(parent) = node.parent() else {
            return Err(FsError::invalid_argument(format!("{} is already a root", id)));
        };
        self.check_mutable(id)?;

        let now = self.now();
        let header = self.node_mut(id).header_mut();
        header.parent = None;
        header.modified_at = Some(now);
        self.remove_item(parent, id, now);
        debug!("{} is now a root", id);
        Ok(())
    }

    /// Change the size of a file by `delta` bytes
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the item is not a file, or the new size would
    ///   fall outside `0..=max_file_size`
    /// - `Terminated` if the file is terminated
    /// - `NotWritable` if the file is not writable
    pub fn resize(&mut self, id: ItemId, delta: i64) -> Result<()> {
        let node = self.node(id)?;
        let Some(file) = node.as_file() else {
            return Err(FsError::invalid_argument(format!("{} is not a file", id)));
        };
        if file.is_terminated() {
            return Err(FsError::Terminated(id));
        }
        if !file.writable {
            return Err(FsError::NotWritable(id));
        }
        let new_size = i128::from(file.size) + i128::from(delta);
        if new_size < 0 || new_size > i128::from(self.options().max_file_size) {
            return Err(FsError::invalid_argument(format!(
                "size {} + {} is out of range",
                file.size, delta
            )));
        }
        let new_size = u64::try_from(new_size)
            .map_err(|_| FsError::invalid_argument(format!("size {} is out of range", new_size)))?;

        let now = self.now();
        let node = self.node_mut(id);
        node.header_mut().modified_at = Some(now);
        if let Node::File(file) = node {
            file.size = new_size;
        }
        Ok(())
    }

    /// Grow a file by `amount` bytes
    pub fn enlarge(&mut self, id: ItemId, amount: u64) -> Result<()> {
        let delta = i64::try_from(amount)
            .map_err(|_| FsError::invalid_argument(format!("cannot enlarge by {}", amount)))?;
        self.resize(id, delta)
    }

    /// Shrink a file by `amount` bytes
    pub fn shorten(&mut self, id: ItemId, amount: u64) -> Result<()> {
        let delta = i64::try_from(amount)
            .map_err(|_| FsError::invalid_argument(format!("cannot shorten by {}", amount)))?;
        self.resize(id, -delta)
    }

    /// Set the writable flag of a file or directory
    ///
    /// Timestamps are left alone.
    pub fn set_writable(&mut self, id: ItemId, writable: bool) -> Result<()> {
        let node = self.node(id)?;
        if node.kind() == ItemKind::Link {
            return Err(FsError::invalid_argument(format!(
                "link {} has no writable flag",
                id
            )));
        }
        if node.is_terminated() {
            return Err(FsError::Terminated(id));
        }
        match self.node_mut(id) {
            Node::Directory(dir) => dir.writable = writable,
            Node::File(file) => file.writable = writable,
            Node::Link(_) => {}
        }
        Ok(())
    }
}
