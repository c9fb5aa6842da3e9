use anyhow::{Result, anyhow};
use log::{debug, trace};
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::constants::PROJECT_MARKER;

/// Returns true when `dir` looks like the root of a dapp project.
pub fn is_project_root(dir: &Path) -> bool {
    let marker = dir.join(PROJECT_MARKER);
    trace!("Checking for {} at: {:?}", PROJECT_MARKER, marker);
    marker.is_file()
}

/// Uses `root` if given, otherwise the current directory, and checks that it
/// is a project root.
pub fn find_project_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match root {
        Some(r) => {
            debug!("Using provided project root: {:?}", r);
            r.canonicalize().unwrap_or(r)
        }
        None => env::current_dir()?,
    };

    if !is_project_root(&dir) {
        debug!("No {} found in {:?}", PROJECT_MARKER, dir);
        return Err(anyhow!(
            "{} is not a project root (no {}), try executing from your project's root directory",
            dir.display(),
            PROJECT_MARKER
        ));
    }
    debug!("Found project root at: {:?}", dir);
    Ok(dir)
}
