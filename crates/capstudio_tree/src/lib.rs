//! # capstudio_tree - Virtual project tree for CAPM Studio
//!
//! This crate owns the canonical in-memory project structure:
//! - Path-addressed CRUD over a nested file/folder tree
//! - Auto-creation of missing folder chains
//! - Stateless path decomposition helpers
//!
//! All mutation operations are synchronous and total: they never fail on a
//! well-formed tree and are no-ops on paths that do not exist. Paths are
//! absolute, `/`-separated and unique across the whole tree at any instant.

pub mod engine;
pub mod node;
pub mod path;

pub use engine::ProjectTree;
pub use node::{FileSystemNode, NodeKind};
