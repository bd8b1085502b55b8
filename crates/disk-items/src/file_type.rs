//! File kinds and their extensions

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The kind of content a file holds
///
/// The kind decides the extension shown in display names and paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum FileType {
    /// Plain text
    #[display(fmt = "Text")]
    Text,
    /// Java source code
    #[display(fmt = "Java")]
    Java,
    /// Portable document
    #[display(fmt = "Pdf")]
    Pdf,
}

impl FileType {
    /// All file kinds, in declaration order
    pub const ALL: [FileType; 3] = [FileType::Text, FileType::Java, FileType::Pdf];

    /// The extension used for files of this kind (without the dot)
    pub const fn extension(self) -> &'static str {
        match self {
            FileType::Text => "txt",
            FileType::Java => "java",
            FileType::Pdf => "pdf",
        }
    }
}
