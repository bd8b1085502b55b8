//! Error types for filesystem operations

use derive_more::Display;

use crate::node::ItemId;

/// Errors returned by [`FileSystem`](crate::FileSystem) operations
///
/// A failed operation never leaves a partial change behind: every variant is
/// raised before the tree is touched.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FsError {
    /// The handle was never issued by this filesystem
    #[display(fmt = "Unknown item: {}", _0)]
    UnknownItem(ItemId),

    /// An argument is unusable for the operation (bad target, cycle, wrong kind, bad size)
    #[display(fmt = "Invalid argument: {}", _0)]
    InvalidArgument(String),

    /// The item, or a directory the operation goes through, is not writable
    #[display(fmt = "Not writable: {}", _0)]
    NotWritable(ItemId),

    /// The item has already been terminated
    #[display(fmt = "Item is terminated: {}", _0)]
    Terminated(ItemId),

    /// A closed precondition of the operation does not hold
    #[display(fmt = "Invalid state: {}", _0)]
    InvalidState(String),

    /// A sibling already carries this name (compared case-insensitively)
    #[display(fmt = "Name conflict: {}", _0)]
    NameConflict(String),
}

impl FsError {
    /// Create an invalid argument error with message.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an invalid state error with message.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a name conflict error for the given name.
    pub fn name_conflict(name: impl Into<String>) -> Self {
        Self::NameConflict(name.into())
    }

    /// Returns true for errors caused by the state of the item rather than
    /// by the arguments (terminated items included)
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::Terminated(_) | Self::InvalidState(_))
    }
}

impl std::error::Error for FsError {}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FsError>;
