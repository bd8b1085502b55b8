//! CLI example that builds a small tree and displays its full hierarchy
//!
//! Usage:
//!   cargo run --example list_tree
//!
//! Set `RUST_LOG=debug` to see every structural change as it happens.

use anyhow::Result;
use disk_items::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let mut fs = FileSystem::new();

    println!("Building tree...");
    let home = fs.create_root_directory("home")?;
    let user = fs.create_directory(Some(home), "user", true)?;
    let projects = fs.create_directory(Some(user), "projects", true)?;
    let main = fs.create_file(projects, "Main", FileType::Java, 2_400, true)?;
    fs.create_file(projects, "notes", FileType::Text, 180, true)?;
    fs.create_file(user, "taxes", FileType::Pdf, 88_000, false)?;
    fs.create_link(home, "current", main)?;
    let scratch = fs.create_directory(Some(user), "scratch", true)?;
    fs.create_empty_file(scratch, "tmp", FileType::Text)?;

    println!("Renaming and moving...");
    fs.rename(projects, "work")?;
    let notes = fs
        .get_item(projects, "NOTES")?
        .ok_or_else(|| anyhow::anyhow!("notes not found"))?;
    fs.move_to(notes, user)?;
    fs.enlarge(notes, 20)?;

    println!("Deleting scratch...");
    fs.delete_recursive(scratch)?;

    println!();
    println!("Directory Structure:");
    println!("═══════════════════════════════");
    println!();
    println!("{}", render_tree(&fs, home)?);

    println!();
    println!("═══════════════════════════════");
    println!("Summary:");
    let live: Vec<ItemId> = fs
        .walk_from(home, TraversalOrder::PreOrder)
        .collect();
    let count = |kind: ItemKind| {
        live.iter()
            .filter(|&&id| fs.kind(id).map_or(false, |k| k == kind))
            .count()
    };
    println!("  Total items: {}", live.len());
    println!("  Directories: {}", count(ItemKind::Directory));
    println!("  Files: {}", count(ItemKind::File));
    println!("  Links: {}", count(ItemKind::Link));
    println!("  Total size: {}", format_size(fs.total_disk_usage(home)?));

    fs.check_invariants()?;
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
