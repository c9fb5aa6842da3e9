use std::{fmt, path::PathBuf};

/// Index of a [`SourceFile`] inside an [`ImportGraph`](crate::ImportGraph) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A file found by discovery, before any import scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub name: String,
    /// Path relative to the tree root
    pub path: PathBuf,
}

impl DiscoveredFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), path: path.into() }
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
    pub deps: Vec<NodeId>,
}

/// A raw import found on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub request: String,
    /// 1-based line number the import was found on
    pub line: usize,
}
