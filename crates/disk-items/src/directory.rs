//! Directory membership: ordering predicates, lookups and the add/remove
//! primitives that keep both sides of a parent/child edge in step

use std::cmp::Ordering;
use std::time::SystemTime;

use log::trace;

use crate::error::Result;
use crate::filesystem::FileSystem;
use crate::name::{compare_names, names_collide};
use crate::node::{Item, ItemId, ItemKind};
use crate::traversal::Hierarchy;

impl FileSystem {
    /// Returns true if `item` may be held by `dir`
    ///
    /// Both must be live and `dir` must be a directory. No child of `dir`
    /// other than `item` itself may collide with the item's name.
    pub fn can_have_as_item(&self, dir: ItemId, item: ItemId) -> bool {
        let (Some(dir_node), Some(item_node)) = (
            self.get(dir).and_then(|node| node.as_directory()),
            self.get(item),
        ) else {
            return false;
        };
        if dir_node.is_terminated() || item_node.is_terminated() {
            return false;
        }
        let name = item_node.name();
        !dir_node
            .children
            .iter()
            .any(|&child| child != item && names_collide(self.name_of(child), name))
    }

    /// Returns true if `item` may sit at `index` among the children of `dir`
    ///
    /// The neighbours at `index - 1` and `index + 1`, where present, must sort
    /// strictly before and after the item.
    pub fn can_have_as_item_at(&self, dir: ItemId, item: ItemId, index: usize) -> bool {
        if !self.can_have_as_item(dir, item) {
            return false;
        }
        let Ok(children) = self.children(dir) else {
            return false;
        };
        if index >= children.len() {
            return false;
        }
        let name = self.name_of(item);
        let before = index
            .checked_sub(1)
            .map_or(true, |i| compare_names(self.name_of(children[i]), name) == Ordering::Less);
        let after = children
            .get(index + 1)
            .map_or(true, |&next| compare_names(self.name_of(next), name) == Ordering::Greater);
        before && after
    }

    /// Returns true if every child of `dir` is properly placed and points
    /// back at `dir`
    pub fn has_proper_items(&self, dir: ItemId) -> Result<bool> {
        let children = self.children(dir)?;
        Ok(children.iter().enumerate().all(|(index, &child)| {
            self.can_have_as_item_at(dir, child, index) && self.parent_of(child) == Some(dir)
        }))
    }

    /// Returns true if `dir` would be an acceptable parent for `item`
    ///
    /// `None` is always acceptable. A directory may not become its own
    /// ancestor.
    pub fn can_have_as_parent_directory(&self, item: ItemId, dir: Option<ItemId>) -> bool {
        let Some(item_node) = self.get(item) else {
            return false;
        };
        let Some(dir) = dir else {
            return true;
        };
        let Some(dir_node) = self.get(dir).and_then(|node| node.as_directory()) else {
            return false;
        };
        if dir_node.is_terminated() {
            return false;
        }
        match item_node.kind() {
            ItemKind::Directory => dir != item && !self.is_ancestor_of(item, dir),
            ItemKind::File | ItemKind::Link => true,
        }
    }

    /// Children of a directory in case-insensitive name order
    pub fn children(&self, dir: ItemId) -> Result<&[ItemId]> {
        Ok(self.directory(dir)?.children())
    }

    /// Number of children of a directory
    pub fn child_count(&self, dir: ItemId) -> Result<usize> {
        Ok(self.directory(dir)?.child_count())
    }

    /// The child at `index`, if there is one
    pub fn item_at(&self, dir: ItemId, index: usize) -> Result<Option<ItemId>> {
        Ok(self.children(dir)?.get(index).copied())
    }

    /// Position of `item` among the children of `dir`
    pub fn index_of(&self, dir: ItemId, item: ItemId) -> Result<Option<usize>> {
        Ok(self.children(dir)?.iter().position(|&child| child == item))
    }

    /// Returns true if a child of `dir` has `name`, ignoring case
    pub fn contains_name(&self, dir: ItemId, name: &str) -> Result<bool> {
        Ok(self.get_item(dir, name)?.is_some())
    }

    /// Index at which an item named `name` would be inserted into `dir`
    pub fn insertion_index(&self, dir: ItemId, name: &str) -> Result<usize> {
        let dir_node = self.directory(dir)?;
        Ok(self.insertion_index_in(dir_node, name))
    }

    /// The child of `dir` named `name`, ignoring case
    pub fn get_item(&self, dir: ItemId, name: &str) -> Result<Option<ItemId>> {
        let children = self.children(dir)?;
        Ok(children
            .binary_search_by(|&child| compare_names(self.name_of(child), name))
            .ok()
            .map(|index| children[index]))
    }

    /// Insert `item` into the children of `dir` at its sorted position
    ///
    /// The item's parent must already be set to `dir`.
    pub(crate) fn add_item(&mut self, dir: ItemId, item: ItemId, now: SystemTime) {
        debug_assert_eq!(self.parent_of(item), Some(dir));
        debug_assert!(self.can_have_as_item(dir, item));

        let index = match self.get(dir).and_then(|node| node.as_directory()) {
            Some(dir_node) => {
                debug_assert!(!dir_node.children.contains(&item));
                self.insertion_index_in(dir_node, self.name_of(item))
            }
            None => return,
        };
        trace!("inserting {} into {} at index {}", item, dir, index);

        let node = self.node_mut(dir);
        if let Some(dir_node) = node.as_directory_mut() {
            dir_node.children.insert(index, item);
        }
        node.header_mut().modified_at = Some(now);
    }

    /// Remove `item` from the children of `dir`
    ///
    /// The item's parent must already be cleared.
    pub(crate) fn remove_item(&mut self, dir: ItemId, item: ItemId, now: SystemTime) {
        debug_assert_ne!(self.parent_of(item), Some(dir));

        let node = self.node_mut(dir);
        if let Some(dir_node) = node.as_directory_mut() {
            debug_assert!(dir_node.children.contains(&item));
            dir_node.children.retain(|&child| child != item);
        }
        node.header_mut().modified_at = Some(now);
    }

    /// Move a renamed child back into sorted position by shifting it past
    /// its neighbours
    pub(crate) fn restore_order(&mut self, dir: ItemId, item: ItemId) {
        let Some(mut children) = self
            .node_mut(dir)
            .as_directory_mut()
            .map(|dir_node| std::mem::take(&mut dir_node.children))
        else {
            return;
        };

        if let Some(mut index) = children.iter().position(|&child| child == item) {
            let name = self.name_of(item);
            while index > 0 && compare_names(self.name_of(children[index - 1]), name).is_gt() {
                children.swap(index - 1, index);
                index -= 1;
            }
            while index + 1 < children.len()
                && compare_names(self.name_of(children[index + 1]), name).is_lt()
            {
                children.swap(index, index + 1);
                index += 1;
            }
            trace!("{} now at index {} of {}", item, index, dir);
        }

        if let Some(dir_node) = self.node_mut(dir).as_directory_mut() {
            dir_node.children = children;
        }
    }
}
