//! Stateless path helpers.
//!
//! Paths in the project tree are absolute and `/`-separated. These helpers
//! decompose and compose such paths without touching the tree itself.

/// Normalize a path: guarantee a leading `/`, drop empty segments and any
/// trailing separator. The root itself normalizes to `/`.
pub fn normalize(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Split a path into its non-empty segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// The last segment of a path, or empty for the root.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or("")
}

/// The parent of a path. Top-level entries have the implicit root `/` as
/// their parent.
pub fn parent_path(path: &str) -> String {
    let segs = segments(path);
    if segs.len() <= 1 {
        "/".to_string()
    } else {
        format!("/{}", segs[..segs.len() - 1].join("/"))
    }
}

/// Join a parent path and a child name.
pub fn join(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", normalize(parent), name)
    }
}

/// Every prefix of a folder path, shortest first.
///
/// `"/db/data"` yields `["/db", "/db/data"]`; the root yields nothing.
pub fn prefixes(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for seg in segments(path) {
        current.push('/');
        current.push_str(seg);
        out.push(current.clone());
    }
    out
}
