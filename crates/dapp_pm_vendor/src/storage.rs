use anyhow::{Context, Result, anyhow};
use dashmap::DashMap;
use log::{debug, info, trace, warn};
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
    sync::{Arc, Mutex},
};

use dapp_pm_core::{CACHE_DIR_NAME, DependencySpec};

/// Retrieves a dependency's source tree into `dest`.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, dep: &DependencySpec, dest: &Path) -> Result<()>;
}

/// Shallow-clones the tagged GitHub repository with the `git` binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitFetcher;

impl Fetcher for GitFetcher {
    fn fetch(&self, dep: &DependencySpec, dest: &Path) -> Result<()> {
        let url = dep.clone_url();
        info!("Cloning {} at {} into {}", url, dep.version, dest.display());
        let status = Command::new("git")
            .arg("clone")
            .args(["--depth", "1", "--single-branch"])
            .args(["--branch", &dep.version])
            .args(["--recurse-submodules", "--shallow-submodules"])
            .arg(&url)
            .arg(dest)
            .status()
            .context("Failed to run git, is it installed?")?;

        if !status.success() {
            return Err(anyhow!("git clone of {} at {} failed ({})", url, dep.version, status));
        }
        Ok(())
    }
}

/// On-disk cache of fetched dependency trees, laid out as `<root>/<owner>/<repo>@<version>`.
pub struct Storage<F = GitFetcher> {
    root: PathBuf,
    fetcher: F,
    fetch_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Storage<GitFetcher> {
    /// Opens the cache at `cache_dir`, or `~/.dapp-pm` when none is given.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let root = match cache_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine the home directory"))?
                .join(CACHE_DIR_NAME),
        };
        Self::with_fetcher(root, GitFetcher)
    }
}

impl<F: Fetcher> Storage<F> {
    pub fn with_fetcher(root: PathBuf, fetcher: F) -> Result<Self> {
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create cache directory {}", root.display()))?;
        debug!("Using dependency cache at {}", root.display());
        Ok(Self { root, fetcher, fetch_locks: DashMap::new() })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn tree_path(&self, dep: &DependencySpec) -> PathBuf {
        self.root.join(dep.cache_key())
    }

    /// Sibling of the tree path that fetches write into before being moved in place.
    fn staging_path(&self, dep: &DependencySpec) -> PathBuf {
        let tree = self.tree_path(dep);
        let name = tree.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        tree.with_file_name(format!(".{}.partial", name))
    }

    pub fn is_cached(&self, dep: &DependencySpec) -> bool {
        self.tree_path(dep).is_dir()
    }

    /// Fetches `dep` unless it is already cached.
    ///
    /// Concurrent calls for the same dependency are serialized; only the first
    /// one fetches. The fetch writes into a staging directory that is renamed to
    /// the tree path only on success, so an interrupted fetch is never taken for
    /// a cached tree.
    pub fn fetch(&self, dep: &DependencySpec) -> Result<PathBuf> {
        let lock = self.fetch_locks.entry(dep.path.clone()).or_default().clone();
        let _guard = lock.lock().map_err(|_| anyhow!("Fetch lock for {} is poisoned", dep))?;

        let dest = self.tree_path(dep);
        if dest.is_dir() {
            trace!("{} was fetched while waiting for the lock", dep);
            return Ok(dest);
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let staging = self.staging_path(dep);
        if staging.exists() {
            debug!("Removing leftover staging directory {}", staging.display());
            fs::remove_dir_all(&staging)
                .with_context(|| format!("Failed to remove {}", staging.display()))?;
        }

        if let Err(e) = self.fetcher.fetch(dep, &staging) {
            if staging.exists()
                && let Err(rm) = fs::remove_dir_all(&staging)
            {
                warn!("Failed to clean up {}: {}", staging.display(), rm);
            }
            return Err(e.context(format!("Failed to fetch {}", dep)));
        }

        fs::rename(&staging, &dest).with_context(|| {
            format!("Failed to move {} to {}", staging.display(), dest.display())
        })?;

        info!("Initialized dependency {}", dep);
        Ok(dest)
    }

    /// Parses `text` and makes sure its tree is available locally.
    pub fn get_dependency(&self, text: &str) -> Result<(DependencySpec, PathBuf)> {
        let dep = DependencySpec::parse(text)?;
        let tree = if self.is_cached(&dep) {
            info!("Using existing dependency {}", dep);
            self.tree_path(&dep)
        } else {
            self.fetch(&dep)?
        };
        Ok((dep, tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FakeFetcher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Fetcher for FakeFetcher {
        fn fetch(&self, _dep: &DependencySpec, dest: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            fs::create_dir_all(dest.join("src"))?;
            if self.fail {
                return Err(anyhow!("remote tag not found"));
            }
            fs::write(dest.join("src/Lib.sol"), "library Lib {}\n")?;
            Ok(())
        }
    }

    fn storage(root: &Path, fail: bool) -> Storage<FakeFetcher> {
        Storage::with_fetcher(
            root.join("cache"),
            FakeFetcher { calls: AtomicUsize::new(0), fail },
        )
        .unwrap()
    }

    #[test]
    fn test_tree_path_layout() {
        let temp_dir = TempDir::new().unwrap();
        let store = storage(temp_dir.path(), false);
        let dep = DependencySpec::parse("dapphub/ds-test@1.0.0").unwrap();
        assert_eq!(
            store.tree_path(&dep),
            temp_dir.path().join("cache").join("dapphub").join("ds-test@1.0.0")
        );
        assert!(store.root().is_dir());
    }

    #[test]
    fn test_get_dependency_fetches_once() {
        let temp_dir = TempDir::new().unwrap();
        let store = storage(temp_dir.path(), false);

        let (dep, tree) = store.get_dependency("dapphub/ds-test@1.0.0").unwrap();
        assert!(tree.join("src/Lib.sol").is_file());
        assert!(store.is_cached(&dep));

        store.get_dependency("dapphub/ds-test@1.0.0").unwrap();
        assert_eq!(store.fetcher().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_get_dependency_bad_spec_does_not_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let store = storage(temp_dir.path(), false);
        assert!(store.get_dependency("dapphub/ds-test").is_err());
        assert_eq!(store.fetcher().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_concurrent_fetches_are_serialized() {
        let temp_dir = TempDir::new().unwrap();
        let store = storage(temp_dir.path(), false);
        let dep = DependencySpec::parse("dapphub/ds-test@1.0.0").unwrap();

        (0..8).into_par_iter().for_each(|_| {
            store.fetch(&dep).unwrap();
        });
        assert_eq!(store.fetcher().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_fetch_leaves_no_tree() {
        let temp_dir = TempDir::new().unwrap();
        let store = storage(temp_dir.path(), true);
        let dep = DependencySpec::parse("dapphub/ds-test@9.9.9").unwrap();

        let err = store.fetch(&dep).unwrap_err();
        assert!(format!("{:#}", err).contains("remote tag not found"));
        assert!(!store.is_cached(&dep));
        assert!(!store.staging_path(&dep).exists());
    }

    #[test]
    fn test_interrupted_fetch_is_refetched() {
        let temp_dir = TempDir::new().unwrap();
        let store = storage(temp_dir.path(), false);
        let dep = DependencySpec::parse("dapphub/ds-test@1.0.0").unwrap();

        // A killed clone leaves only the staging directory behind
        let staging = store.staging_path(&dep);
        fs::create_dir_all(staging.join("src")).unwrap();
        fs::write(staging.join("src/Half.sol"), "contract Ha").unwrap();
        assert!(!store.is_cached(&dep));

        let (_, tree) = store.get_dependency("dapphub/ds-test@1.0.0").unwrap();
        assert_eq!(store.fetcher().calls.load(Ordering::SeqCst), 1);
        assert!(tree.join("src/Lib.sol").is_file());
        assert!(!tree.join("src/Half.sol").exists());
        assert!(!staging.exists());
    }

    #[test]
    fn test_staging_path_is_sibling_of_tree() {
        let temp_dir = TempDir::new().unwrap();
        let store = storage(temp_dir.path(), false);
        let dep = DependencySpec::parse("dapphub/ds-test@1.0.0").unwrap();
        assert_eq!(
            store.staging_path(&dep),
            temp_dir.path().join("cache").join("dapphub").join(".ds-test@1.0.0.partial")
        );
    }
}
