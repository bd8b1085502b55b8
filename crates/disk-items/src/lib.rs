//! Disk Items Library
//!
//! An in-memory model of a hierarchical filesystem made of directories,
//! typed files and links, which keeps its structural invariants intact on
//! every operation.
//!
//! # Core Concepts
//!
//! - **FileSystem**: Arena owning every item, addressed by [`ItemId`] handles
//! - **Node**: A directory, a file or a link, viewed through the [`Item`] and
//!   [`ActualItem`] traits
//! - **Hierarchy**: Parent/child navigation and subtree walks
//!
//! Children of a directory are kept sorted by case-insensitive name, and no
//! two children share a name. Operations either apply completely or fail with
//! an [`FsError`] and leave the tree untouched.
//!
//! # Example
//!
//! ```
//! use disk_items::prelude::*;
//!
//! let mut fs = FileSystem::new();
//! let root = fs.create_root_directory("root").unwrap();
//! let docs = fs.create_directory(Some(root), "docs", true).unwrap();
//! fs.create_file(docs, "report", FileType::Pdf, 2048, true).unwrap();
//!
//! // Walk the tree
//! for id in fs.walk_from(root, TraversalOrder::PreOrder) {
//!     let depth = fs.depth(id);
//!     println!("{:indent$}{}", "", fs.display_name(id).unwrap(), indent = depth * 2);
//! }
//! assert_eq!(fs.total_disk_usage(root).unwrap(), 2048);
//! ```

mod directory;
pub mod error;
pub mod file_type;
mod filesystem;
mod lifecycle;
mod mutation;
pub mod name;
mod node;
pub mod options;
pub mod render;
pub mod traversal;

pub use error::{FsError, Result};
pub use file_type::FileType;
pub use filesystem::FileSystem;
pub use name::DEFAULT_NAME;
pub use node::{ActualItem, DirectoryNode, FileNode, Item, ItemHeader, ItemId, ItemKind, LinkNode, Node};
pub use options::{ClockMode, FileSystemOptions, MAX_FILE_SIZE};
pub use render::render_tree;
pub use traversal::{Ancestors, Hierarchy, TraversalOrder, TreeTraversal, TreeWalker};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        render_tree, ActualItem, ClockMode, FileSystem, FileSystemOptions, FileType, FsError,
        Hierarchy, Item, ItemId, ItemKind, Node, TraversalOrder, TreeTraversal,
    };
}
