//! Name legality and name ordering
//!
//! Directory names are drawn from `[a-zA-Z_0-9-]+`; file and link names may
//! additionally contain `.`. Names are ordered and compared without regard to
//! ASCII case.

use std::cmp::Ordering;

use crate::node::ItemKind;

/// The name given to an item whose requested name is not legal
pub const DEFAULT_NAME: &str = "new_disk_item";

/// Returns true if `name` is a legal name for an item of the given kind
pub fn can_have_as_name(kind: ItemKind, name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| is_name_byte(kind, b))
}

fn is_name_byte(kind: ItemKind, b: u8) -> bool {
    match b {
        b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'-' => true,
        b'.' => !kind.is_directory(),
        _ => false,
    }
}

/// The name an item actually receives when `requested` is asked for
///
/// Illegal names are replaced by [`DEFAULT_NAME`] instead of being rejected.
pub fn effective_name(kind: ItemKind, requested: &str) -> String {
    if can_have_as_name(kind, requested) {
        requested.to_string()
    } else {
        log::debug!(
            "name {:?} is not legal for a {}, using {:?}",
            requested,
            kind,
            DEFAULT_NAME
        );
        DEFAULT_NAME.to_string()
    }
}

/// Case-insensitive lexicographic ordering of two names
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Returns true if two names may not coexist in one directory
pub fn names_collide(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_names() {
        assert!(can_have_as_name(ItemKind::Directory, "docs"));
        assert!(can_have_as_name(ItemKind::Directory, "my-dir_2"));

        assert!(!can_have_as_name(ItemKind::Directory, ""));
        assert!(!can_have_as_name(ItemKind::Directory, "with.dot"));
        assert!(!can_have_as_name(ItemKind::Directory, "has space"));
        assert!(!can_have_as_name(ItemKind::Directory, "slash/ed"));
    }

    #[test]
    fn test_file_and_link_names() {
        for kind in [ItemKind::File, ItemKind::Link] {
            assert!(can_have_as_name(kind, "archive.tar"));
            assert!(can_have_as_name(kind, "..."));
            assert!(!can_have_as_name(kind, "caf\u{e9}"));
            assert!(!can_have_as_name(kind, "a*b"));
        }
    }

    #[test]
    fn test_default_name_is_legal() {
        for kind in ItemKind::ALL {
            assert!(can_have_as_name(kind, DEFAULT_NAME));
        }
    }

    #[test]
    fn test_effective_name() {
        assert_eq!(effective_name(ItemKind::File, "notes"), "notes");
        assert_eq!(effective_name(ItemKind::Directory, "no.dots"), DEFAULT_NAME);
        assert_eq!(effective_name(ItemKind::Link, ""), DEFAULT_NAME);
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(compare_names("README", "readme"), Ordering::Equal);
        assert_eq!(compare_names("ab", "abc"), Ordering::Less);
        assert!(names_collide("Docs", "dOCS"));
        assert!(!names_collide("docs", "doc"));
    }
}
