use anyhow::{Context, Result, anyhow};
use log::{debug, trace};
use rayon::prelude::*;
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use dapp_pm_core::{DependencySpec, ImportGraph, NodeId};

/// Where a dependency's files land inside the project: `<root>/<lib_dir>/<owner>/<repo>@<version>`.
pub fn destination(project_root: &Path, lib_dir: &Path, dep: &DependencySpec) -> PathBuf {
    project_root.join(lib_dir).join(dep.cache_key())
}

/// Copies each file in `files` from `tree_root` to the same relative path under `dest`.
///
/// Returns the relative paths in node order. With `dry_run` nothing is written.
pub fn export_files(
    tree_root: &Path,
    dest: &Path,
    graph: &ImportGraph,
    files: &BTreeSet<NodeId>,
    dry_run: bool,
) -> Result<Vec<PathBuf>> {
    let rel_paths: Vec<PathBuf> = files
        .iter()
        .map(|id| {
            graph
                .node(*id)
                .map(|n| n.path.clone())
                .ok_or_else(|| anyhow!("Node {} is not part of the graph", id))
        })
        .collect::<Result<_>>()?;

    if dry_run {
        debug!("Dry run, skipping copy of {} files", rel_paths.len());
        return Ok(rel_paths);
    }

    debug!("Copying {} files into {}", rel_paths.len(), dest.display());
    rel_paths.par_iter().try_for_each(|rel| copy_file(tree_root, dest, rel))?;

    Ok(rel_paths)
}

fn copy_file(tree_root: &Path, dest: &Path, rel: &Path) -> Result<()> {
    let from = tree_root.join(rel);
    let to = dest.join(rel);
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(&from, &to)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
    trace!("Copied {}", rel.display());
    Ok(())
}
