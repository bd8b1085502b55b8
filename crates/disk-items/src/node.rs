//! Core item types: handles, kinds, per-kind node data and the item traits

use std::fmt;
use std::time::SystemTime;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::file_type::FileType;
use crate::name;

/// Handle of an item inside a [`FileSystem`](crate::FileSystem)
///
/// Internally represented as an index into the arena. Handles are never
/// reused, so a handle to a terminated item stays meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub usize);

impl ItemId {
    /// Create a new ItemId from a usize
    pub const fn new(id: usize) -> Self {
        ItemId(id)
    }

    /// Get the inner usize value
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl From<usize> for ItemId {
    fn from(id: usize) -> Self {
        ItemId(id)
    }
}

impl From<ItemId> for usize {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// The kind of an item in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum ItemKind {
    /// A container of other items
    #[display(fmt = "directory")]
    Directory,
    /// A content leaf with a type and a size
    #[display(fmt = "file")]
    File,
    /// A leaf referring to another file or directory
    #[display(fmt = "link")]
    Link,
}

impl ItemKind {
    /// All item kinds
    pub const ALL: [ItemKind; 3] = [ItemKind::Directory, ItemKind::File, ItemKind::Link];

    /// Returns true if this is a directory
    pub const fn is_directory(self) -> bool {
        matches!(self, ItemKind::Directory)
    }

    /// Returns true if items of this kind can never have children
    pub const fn is_leaf(self) -> bool {
        !self.is_directory()
    }

    /// Returns true if items of this kind carry a writable flag
    pub const fn is_actual(self) -> bool {
        matches!(self, ItemKind::Directory | ItemKind::File)
    }
}

/// State shared by every kind of item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemHeader {
    pub(crate) name: String,
    pub(crate) created_at: SystemTime,
    pub(crate) modified_at: Option<SystemTime>,
    pub(crate) terminated: bool,
    pub(crate) parent: Option<ItemId>,
}

impl ItemHeader {
    pub(crate) fn new(name: String, created_at: SystemTime, parent: Option<ItemId>) -> Self {
        Self {
            name,
            created_at,
            modified_at: None,
            terminated: false,
            parent,
        }
    }

    /// Returns true if the use periods `[created_at, modified_at]` of both
    /// headers intersect
    ///
    /// An item that was never modified has no use period yet.
    pub fn has_overlapping_use_period(&self, other: &ItemHeader) -> bool {
        match (self.modified_at, other.modified_at) {
            (Some(self_end), Some(other_end)) => {
                self.created_at <= other_end && other.created_at <= self_end
            }
            _ => false,
        }
    }
}

/// Operations common to directories, files and links
pub trait Item {
    /// The shared header of this item
    fn header(&self) -> &ItemHeader;

    /// The kind of this item
    fn kind(&self) -> ItemKind;

    /// The item's own name (without extension)
    fn name(&self) -> &str {
        &self.header().name
    }

    /// The name as it appears in paths and listings
    fn display_name(&self) -> String {
        self.name().to_string()
    }

    /// When the item was created
    fn created_at(&self) -> SystemTime {
        self.header().created_at
    }

    /// When the item was last modified, if ever
    fn modified_at(&self) -> Option<SystemTime> {
        self.header().modified_at
    }

    /// Returns true once the item has been terminated
    fn is_terminated(&self) -> bool {
        self.header().terminated
    }

    /// The directory holding this item, if any
    fn parent(&self) -> Option<ItemId> {
        self.header().parent
    }

    /// Returns true if the item has no parent
    fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Returns true if `name` is legal for an item of this kind
    fn can_have_as_name(&self, name: &str) -> bool {
        name::can_have_as_name(self.kind(), name)
    }
}

/// Items that carry a writable flag (files and directories)
pub trait ActualItem: Item {
    /// Returns true if the item may be changed
    fn is_writable(&self) -> bool;
}

/// A directory and its ordered children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub(crate) header: ItemHeader,
    pub(crate) writable: bool,
    pub(crate) children: Vec<ItemId>,
}

impl DirectoryNode {
    /// Children in case-insensitive name order
    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    /// Number of children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the directory holds no items
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Item for DirectoryNode {
    fn header(&self) -> &ItemHeader {
        &self.header
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Directory
    }
}

impl ActualItem for DirectoryNode {
    fn is_writable(&self) -> bool {
        self.writable
    }
}

/// A file with a type and a size in bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub(crate) header: ItemHeader,
    pub(crate) writable: bool,
    pub(crate) file_type: FileType,
    pub(crate) size: u64,
}

impl FileNode {
    /// The kind of content in the file
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Item for FileNode {
    fn header(&self) -> &ItemHeader {
        &self.header
    }

    fn kind(&self) -> ItemKind {
        ItemKind::File
    }

    fn display_name(&self) -> String {
        format!("{}.{}", self.header.name, self.file_type.extension())
    }
}

impl ActualItem for FileNode {
    fn is_writable(&self) -> bool {
        self.writable
    }
}

/// A link to a file or directory
///
/// The target is not owned by the link and may be terminated independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNode {
    pub(crate) header: ItemHeader,
    pub(crate) target: ItemId,
}

impl LinkNode {
    /// The linked file or directory
    pub fn target(&self) -> ItemId {
        self.target
    }
}

impl Item for LinkNode {
    fn header(&self) -> &ItemHeader {
        &self.header
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Link
    }
}

/// A single item in the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A directory
    Directory(DirectoryNode),
    /// A file
    File(FileNode),
    /// A link
    Link(LinkNode),
}

impl Node {
    /// The directory data, if this is a directory
    pub fn as_directory(&self) -> Option<&DirectoryNode> {
        match self {
            Node::Directory(dir) => Some(dir),
            _ => None,
        }
    }

    /// The file data, if this is a file
    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(file) => Some(file),
            _ => None,
        }
    }

    /// The link data, if this is a link
    pub fn as_link(&self) -> Option<&LinkNode> {
        match self {
            Node::Link(link) => Some(link),
            _ => None,
        }
    }

    /// The writable view of this item, if it has one
    pub fn as_actual(&self) -> Option<&dyn ActualItem> {
        match self {
            Node::Directory(dir) => Some(dir),
            Node::File(file) => Some(file),
            Node::Link(_) => None,
        }
    }

    /// The writable flag, or `None` for links
    pub fn writable(&self) -> Option<bool> {
        self.as_actual().map(|item| item.is_writable())
    }

    pub(crate) fn header_mut(&mut self) -> &mut ItemHeader {
        match self {
            Node::Directory(dir) => &mut dir.header,
            Node::File(file) => &mut file.header,
            Node::Link(link) => &mut link.header,
        }
    }

    pub(crate) fn as_directory_mut(&mut self) -> Option<&mut DirectoryNode> {
        match self {
            Node::Directory(dir) => Some(dir),
            _ => None,
        }
    }
}

impl Item for Node {
    fn header(&self) -> &ItemHeader {
        match self {
            Node::Directory(dir) => dir.header(),
            Node::File(file) => file.header(),
            Node::Link(link) => link.header(),
        }
    }

    fn kind(&self) -> ItemKind {
        match self {
            Node::Directory(_) => ItemKind::Directory,
            Node::File(_) => ItemKind::File,
            Node::Link(_) => ItemKind::Link,
        }
    }

    fn display_name(&self) -> String {
        match self {
            Node::Directory(dir) => dir.display_name(),
            Node::File(file) => file.display_name(),
            Node::Link(link) => link.display_name(),
        }
    }
}
