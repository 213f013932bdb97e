//! Dotted-path helpers for the arena tree
//!
//! Nodes are addressed by stable dotted paths (`emailGroup.email`,
//! `addresses.0.street1`); the root group lives at the empty path.

/// Joins a parent path and a child key.
pub(crate) fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// The parent of a path; the root's parent is the root itself.
pub(crate) fn parent(path: &str) -> &str {
    match path.rfind('.') {
        Some(i) => &path[..i],
        None => "",
    }
}

/// Whether `path` is `root` or a descendant of it.
pub(crate) fn in_subtree(path: &str, root: &str) -> bool {
    root.is_empty() || path == root || (path.len() > root.len() && path.starts_with(root) && path.as_bytes()[root.len()] == b'.')
}

/// Path rendered for diagnostics; the root shows as `(root)`.
pub(crate) fn display(path: &str) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}
