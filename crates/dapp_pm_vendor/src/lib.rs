//! Vendoring of Solidity dependencies into a dapp project.
//!
//! This crate fetches a tagged GitHub repository into a local cache, builds the
//! import graph of its sources and copies a selection of files, together with
//! everything they import, into the project's lib directory.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use dapp_pm_vendor::{Config, run_install};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     dependency: "OpenZeppelin/openzeppelin-contracts@v4.9.3".to_string(),
//!     root: Some(std::path::PathBuf::from("/path/to/project")),
//!     cache_dir: None,
//!     lib_dir: std::path::PathBuf::from("src/lib"),
//!     select: vec!["contracts/token/ERC20/ERC20.sol".to_string()],
//!     json: false,
//!     dry_run: false,
//!     spec: None,
//! };
//!
//! let result = run_install(cfg)?;
//!
//! // Use buffered output for better performance
//! let mut stdout = BufWriter::new(std::io::stdout());
//! dapp_pm_vendor::print_install_summary(&mut stdout, &result)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod export;
mod installer;
mod reporter;
mod storage;
mod types;

// Re-export public API
pub use config::Config;
pub use export::{destination, export_files};
pub use installer::{Resolution, resolve_dependency, run_install, run_list, select};
pub use reporter::{print_file_list, print_install_summary, print_json};
pub use storage::{Fetcher, GitFetcher, Storage};
pub use types::{FileEntry, InstallResult, ListResult};
