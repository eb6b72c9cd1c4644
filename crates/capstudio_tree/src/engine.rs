//! Tree engine: path-addressed mutation primitives.
//!
//! The engine owns the nested node structure and exposes the only operations
//! that are allowed to mutate it. Every operation is a no-op on paths that do
//! not exist, so stale references (e.g. from a UI that still shows a deleted
//! node) cannot fail the workspace.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::node::{FileSystemNode, NodeKind};
use crate::path;

/// The project tree: an ordered sequence of root nodes under the implicit
/// root `/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectTree {
    roots: Vec<FileSystemNode>,
}

impl ProjectTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The root-level nodes in display order.
    pub fn roots(&self) -> &[FileSystemNode] {
        &self.roots
    }

    /// Whether the tree has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Replace the content of the file at `target`. No-op if the path is
    /// absent or names a folder.
    pub fn set_content_at(&mut self, target: &str, content: &str) {
        let target = path::normalize(target);
        if let Some(node) = find_mut(&mut self.roots, &target) {
            if node.kind == NodeKind::File {
                node.content = Some(content.to_string());
            }
        }
    }

    /// Remove the node at `target` and its entire subtree, wherever it is
    /// nested. No-op if absent.
    pub fn delete_at(&mut self, target: &str) {
        let target = path::normalize(target);
        delete_in(&mut self.roots, &target);
    }

    /// Flip `is_expanded` on the folder at `target`. No-op if absent or not
    /// a folder.
    pub fn toggle_folder(&mut self, target: &str) {
        let target = path::normalize(target);
        if let Some(node) = find_mut(&mut self.roots, &target) {
            if node.kind == NodeKind::Folder {
                node.is_expanded = !node.is_expanded;
            }
        }
    }

    /// Insert `node` under `parent_folder_path` (`/` for the root level).
    ///
    /// If a node with the same path already exists among the target's
    /// children it is replaced in place, keeping its sibling index;
    /// otherwise the node is appended. No-op if the parent folder does not
    /// exist.
    pub fn upsert_at(&mut self, node: FileSystemNode, parent_folder_path: &str) {
        let parent = path::normalize(parent_folder_path);
        if parent == "/" {
            upsert_into(&mut self.roots, node);
            return;
        }
        if let Some(folder) = find_folder_mut(&mut self.roots, &parent) {
            upsert_into(&mut folder.children, node);
        }
    }

    /// Guarantee that every segment of `folder_path` exists as a folder,
    /// creating any missing segment as an initially-expanded empty folder.
    /// Idempotent: existing nodes are never disturbed.
    pub fn ensure_folder_chain(&mut self, folder_path: &str) {
        let folder_path = path::normalize(folder_path);
        if folder_path == "/" {
            return;
        }
        for prefix in path::prefixes(&folder_path) {
            if self.find_folder_by_path(&prefix).is_none() {
                debug!(path = %prefix, "creating missing folder");
                let parent = path::parent_path(&prefix);
                self.upsert_at(FileSystemNode::folder(&prefix), &parent);
            }
        }
    }

    /// Find the node at `target` by depth-first descent.
    pub fn find_by_path(&self, target: &str) -> Option<&FileSystemNode> {
        let target = path::normalize(target);
        find_in(&self.roots, &target)
    }

    /// Find the folder at `target`; files at that path do not match.
    pub fn find_folder_by_path(&self, target: &str) -> Option<&FileSystemNode> {
        self.find_by_path(target).filter(|n| n.is_folder())
    }

    /// Every absolute path currently in the tree, in depth-first order.
    pub fn all_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_paths(&self.roots, &mut out);
        out
    }
}

fn find_in<'a>(nodes: &'a [FileSystemNode], target: &str) -> Option<&'a FileSystemNode> {
    for node in nodes {
        if node.path == target {
            return Some(node);
        }
        if let Some(found) = find_in(&node.children, target) {
            return Some(found);
        }
    }
    None
}

fn find_mut<'a>(nodes: &'a mut [FileSystemNode], target: &str) -> Option<&'a mut FileSystemNode> {
    for node in nodes {
        if node.path == target {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, target) {
            return Some(found);
        }
    }
    None
}

fn find_folder_mut<'a>(
    nodes: &'a mut [FileSystemNode],
    target: &str,
) -> Option<&'a mut FileSystemNode> {
    find_mut(nodes, target).filter(|n| n.kind == NodeKind::Folder)
}

fn delete_in(nodes: &mut Vec<FileSystemNode>, target: &str) {
    nodes.retain(|n| n.path != target);
    for node in nodes {
        delete_in(&mut node.children, target);
    }
}

fn upsert_into(siblings: &mut Vec<FileSystemNode>, node: FileSystemNode) {
    if let Some(index) = siblings.iter().position(|n| n.path == node.path) {
        debug!(path = %node.path, index, "replacing node in place");
        siblings[index] = node;
    } else {
        siblings.push(node);
    }
}

fn collect_paths(nodes: &[FileSystemNode], out: &mut Vec<String>) {
    for node in nodes {
        out.push(node.path.clone());
        collect_paths(&node.children, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn materialize(tree: &mut ProjectTree, file_path: &str, content: &str) {
        let parent = path::parent_path(file_path);
        tree.ensure_folder_chain(&parent);
        tree.upsert_at(FileSystemNode::file(file_path, content), &parent);
    }

    #[test]
    fn test_round_trip_content() {
        let mut tree = ProjectTree::new();
        materialize(&mut tree, "/db/schema.cds", "entity Foo { key ID: UUID; }");

        let node = tree.find_by_path("/db/schema.cds").unwrap();
        assert_eq!(node.content.as_deref(), Some("entity Foo { key ID: UUID; }"));
        assert_eq!(node.name, "schema.cds");
    }

    #[test]
    fn test_ensure_folder_chain_is_idempotent() {
        let mut tree = ProjectTree::new();
        tree.ensure_folder_chain("/app/webapp/view");
        let once = tree.clone();
        tree.ensure_folder_chain("/app/webapp/view");
        assert_eq!(tree, once);
        assert_eq!(
            tree.all_paths(),
            vec!["/app", "/app/webapp", "/app/webapp/view"]
        );
    }

    #[test]
    fn test_paths_stay_unique_under_upserts() {
        let mut tree = ProjectTree::new();
        materialize(&mut tree, "/srv/service.cds", "service A {}");
        materialize(&mut tree, "/srv/handlers.js", "module.exports = {}");
        materialize(&mut tree, "/srv/service.cds", "service B {}");

        let paths = tree.all_paths();
        let mut deduped = paths.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(paths.len(), deduped.len());
    }

    #[test]
    fn test_replace_preserves_sibling_index() {
        let mut tree = ProjectTree::new();
        materialize(&mut tree, "/srv/service.cds", "v1");
        materialize(&mut tree, "/srv/handlers.js", "handlers");
        materialize(&mut tree, "/srv/service.cds", "v2");

        let srv = tree.find_folder_by_path("/srv").unwrap();
        assert_eq!(srv.children.len(), 2);
        assert_eq!(srv.children[0].path, "/srv/service.cds");
        assert_eq!(srv.children[0].content.as_deref(), Some("v2"));
        assert_eq!(srv.children[1].path, "/srv/handlers.js");
    }

    #[test]
    fn test_delete_removes_subtree() {
        let mut tree = ProjectTree::new();
        materialize(&mut tree, "/app/webapp/Component.js", "sap.ui.define()");
        materialize(&mut tree, "/package.json", "{}");

        tree.delete_at("/app");
        assert!(tree.find_by_path("/app").is_none());
        assert!(tree.find_by_path("/app/webapp/Component.js").is_none());
        assert!(tree.find_by_path("/package.json").is_some());
    }

    #[test]
    fn test_set_content_ignores_folders_and_missing_paths() {
        let mut tree = ProjectTree::new();
        tree.ensure_folder_chain("/db");
        let before = tree.clone();

        tree.set_content_at("/db", "not a file");
        tree.set_content_at("/nope.txt", "missing");
        assert_eq!(tree, before);
    }

    #[test]
    fn test_toggle_folder() {
        let mut tree = ProjectTree::new();
        tree.ensure_folder_chain("/db");
        assert!(tree.find_by_path("/db").unwrap().is_expanded);

        tree.toggle_folder("/db");
        assert!(!tree.find_by_path("/db").unwrap().is_expanded);

        // no-op on files and absent paths
        let mut tree = ProjectTree::new();
        materialize(&mut tree, "/a.txt", "x");
        let before = tree.clone();
        tree.toggle_folder("/a.txt");
        tree.toggle_folder("/ghost");
        assert_eq!(tree, before);
    }

    #[test]
    fn test_upsert_into_missing_parent_is_noop() {
        let mut tree = ProjectTree::new();
        tree.upsert_at(FileSystemNode::file("/db/schema.cds", "x"), "/db");
        assert!(tree.is_empty());
    }

    #[test]
    fn test_folder_chain_replaces_conflicting_file() {
        // A file occupying a folder's path gives way to the folder, keeping
        // paths unique.
        let mut tree = ProjectTree::new();
        materialize(&mut tree, "/db", "not really a file path");
        tree.ensure_folder_chain("/db/data");

        let db = tree.find_by_path("/db").unwrap();
        assert!(db.is_folder());
        assert!(tree.find_folder_by_path("/db/data").is_some());
    }

    #[test]
    fn test_find_is_depth_first() {
        let mut tree = ProjectTree::new();
        materialize(&mut tree, "/a/b/c.txt", "deep");
        let node = tree.find_by_path("/a/b/c.txt").unwrap();
        assert_eq!(node.content.as_deref(), Some("deep"));
    }
}
