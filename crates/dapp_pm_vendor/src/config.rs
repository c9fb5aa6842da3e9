use anyhow::{Result, anyhow};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

use dapp_pm_core::DependencySpec;

#[derive(Debug, Clone, Parser)]
#[command(name = "dapp-pm")]
#[command(about = "Vendor Solidity files and their imports from a tagged GitHub repository")]
pub struct Config {
    /// Dependency to vendor, as [user]/[repo]@[version]
    #[arg(value_name = "USER/REPO@VERSION")]
    pub dependency: String,

    /// Root directory of the project (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Directory holding fetched dependencies (defaults to ~/.dapp-pm)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Directory, relative to the project root, that vendored files are copied into
    #[arg(long, default_value = "src/lib")]
    pub lib_dir: PathBuf,

    /// File to select, by path inside the dependency or by unique file name
    #[arg(long = "select", short = 's', value_name = "PATH|NAME")]
    pub select: Vec<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Compute what would be copied without writing anything
    #[arg(long)]
    pub dry_run: bool,

    #[clap(skip)]
    pub spec: Option<DependencySpec>,
}

impl Config {
    /// Initialize the config by parsing the dependency and resolving the project root
    pub fn initialize(&mut self) -> Result<()> {
        // A malformed specifier fails before any filesystem access
        let spec = DependencySpec::parse(&self.dependency)?;
        debug!("Dependency: name={}, version={}", spec.name, spec.version);

        let root = dapp_pm_core::find_project_root(self.root.take())?;
        info!("Using project root: {}", root.display());

        self.spec = Some(spec);
        self.root = Some(root);
        Ok(())
    }

    /// Get the project root, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }

    /// Get the parsed dependency, returning an error if not initialized
    pub fn spec(&self) -> Result<&DependencySpec> {
        self.spec
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }
}
