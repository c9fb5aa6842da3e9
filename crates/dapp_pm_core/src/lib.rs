//! Core utilities for dapp-pm.
//!
//! This crate resolves import dependencies inside a vendored Solidity tree:
//! - Parsing dependency specifiers (`owner/repo@version`)
//! - Collecting source files from a tree's `src`, `contracts` and `libs` dirs
//! - Scanning lines for import statements
//! - Resolving imports to tree-relative paths
//! - Building the import graph and computing dependency closures
//! - Locating the project root

mod closure;
mod collector;
mod config;
mod constants;
mod dependency;
mod graph;
mod parser;
mod resolver;
mod types;

// Re-export public API
pub use closure::closure;
pub use collector::collect_sources;
pub use config::{find_project_root, is_project_root};
pub use constants::{CACHE_DIR_NAME, PROJECT_MARKER, SOL_EXTENSION, SOURCE_DIRS};
pub use dependency::DependencySpec;
pub use graph::ImportGraph;
pub use parser::{imports_for, scan_line};
pub use resolver::{normalize, resolve};
pub use types::{DiscoveredFile, NodeId, SourceFile, Specifier};
