//! File system node types.

use serde::{Deserialize, Serialize};

use crate::path;

/// Kind of a tree node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// A single file or folder in the project tree.
///
/// Invariants maintained by the engine:
/// - `path` is absolute, normalized and unique across the tree
/// - `path` equals the parent's path joined with `name`
/// - File nodes never have children
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileSystemNode {
    /// Unique node ID (UUID), assigned at creation and never reused
    pub id: String,
    /// The node's own segment, without separators
    pub name: String,
    /// File or folder
    pub kind: NodeKind,
    /// Absolute `/`-separated path
    pub path: String,
    /// File content; `None` or empty means an empty file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Ordered children; insertion order is the canonical display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileSystemNode>,
    /// Folder-only UI flag; toggled, not structural
    #[serde(rename = "isExpanded", default)]
    pub is_expanded: bool,
}

impl FileSystemNode {
    /// Create a file node at the given path.
    pub fn file(node_path: impl Into<String>, content: impl Into<String>) -> Self {
        let node_path = path::normalize(&node_path.into());
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: path::file_name(&node_path).to_string(),
            kind: NodeKind::File,
            path: node_path,
            content: Some(content.into()),
            children: Vec::new(),
            is_expanded: false,
        }
    }

    /// Create an empty, initially-expanded folder node at the given path.
    pub fn folder(node_path: impl Into<String>) -> Self {
        let node_path = path::normalize(&node_path.into());
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: path::file_name(&node_path).to_string(),
            kind: NodeKind::Folder,
            path: node_path,
            content: None,
            children: Vec::new(),
            is_expanded: true,
        }
    }

    /// Whether this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Whether this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}
