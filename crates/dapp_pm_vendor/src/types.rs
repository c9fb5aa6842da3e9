use serde::Serialize;
use std::path::PathBuf;

use dapp_pm_core::DependencySpec;

#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub selected: bool,
    /// Tree-relative paths of the direct imports, in import order
    pub deps: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub dependency: DependencySpec,
    pub tree: PathBuf,
    pub files: Vec<FileEntry>,
    pub edges: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstallResult {
    pub dependency: DependencySpec,
    pub destination: PathBuf,
    pub selected: Vec<String>,
    /// Tree-relative paths of every file in the closure
    pub files: Vec<PathBuf>,
    pub dry_run: bool,
}
