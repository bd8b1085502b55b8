//! Plain-text listing of a subtree

use log::trace;

use crate::error::Result;
use crate::filesystem::FileSystem;
use crate::node::{Item, ItemId, Node};
use crate::traversal::{Hierarchy, TraversalOrder, TreeTraversal};

/// Render the subtree rooted at `id`, one item per line
///
/// Each level is indented by two spaces. Directories end in `/`, files show
/// their size and ` [ro]` when read-only, and links show the path of their
/// target with ` (stale)` once the link is no longer valid.
pub fn render_tree(fs: &FileSystem, id: ItemId) -> Result<String> {
    let base_depth = fs.node(id).map(|_| fs.depth(id))?;
    let mut lines = Vec::new();

    for item in fs.walk_from(id, TraversalOrder::PreOrder) {
        let indent = "  ".repeat(fs.depth(item) - base_depth);
        let line = match fs.node(item)? {
            Node::Directory(dir) => format!("{}{}/", indent, dir.name()),
            Node::File(file) => {
                let read_only = if file.writable { "" } else { " [ro]" };
                format!(
                    "{}{} ({} B){}",
                    indent,
                    file.display_name(),
                    file.size,
                    read_only
                )
            }
            Node::Link(link) => {
                let stale = if fs.is_valid_link(item)? { "" } else { " (stale)" };
                format!(
                    "{}{} -> {}{}",
                    indent,
                    link.name(),
                    fs.absolute_path(link.target)?,
                    stale
                )
            }
        };
        trace!("{}", line);
        lines.push(line);
    }

    Ok(lines.join("\n"))
}
