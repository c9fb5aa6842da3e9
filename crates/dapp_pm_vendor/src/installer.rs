use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use std::{collections::BTreeSet, path::PathBuf};

use dapp_pm_core::{ImportGraph, NodeId, closure, collect_sources};

use crate::{
    config::Config,
    export::{destination, export_files},
    storage::{Fetcher, Storage},
    types::{FileEntry, InstallResult, ListResult},
};

/// A fetched dependency together with its import graph.
pub struct Resolution {
    pub tree: PathBuf,
    pub graph: ImportGraph,
}

/// Fetches the configured dependency if needed, then discovers and scans its sources.
pub fn resolve_dependency<F: Fetcher>(storage: &Storage<F>, cfg: &Config) -> Result<Resolution> {
    let (dep, tree) = storage.get_dependency(&cfg.dependency)?;
    debug!("Resolving imports of {} in {}", dep, tree.display());

    let files = collect_sources(&tree)?;
    if files.is_empty() {
        warn!("No source files found in {}", tree.display());
    }
    let graph = ImportGraph::build(&tree, files)?;
    Ok(Resolution { tree, graph })
}

/// Maps each selection query to a node; any unknown or ambiguous query fails.
pub fn select(graph: &ImportGraph, queries: &[String]) -> Result<BTreeSet<NodeId>> {
    queries.iter().map(|q| graph.find(q)).collect()
}

pub fn run_list(mut cfg: Config) -> Result<ListResult> {
    info!("Listing source files of {}", cfg.dependency);
    cfg.initialize()?;
    let storage = Storage::new(cfg.cache_dir.clone())?;
    list_with(&storage, &cfg)
}

pub fn run_install(mut cfg: Config) -> Result<InstallResult> {
    info!("Installing from {}", cfg.dependency);
    cfg.initialize()?;
    let storage = Storage::new(cfg.cache_dir.clone())?;
    install_with(&storage, &cfg)
}

pub(crate) fn list_with<F: Fetcher>(storage: &Storage<F>, cfg: &Config) -> Result<ListResult> {
    let dependency = cfg.spec()?.clone();
    let Resolution { tree, graph } = resolve_dependency(storage, cfg)?;
    let selected = select(&graph, &cfg.select)?;

    let files = graph
        .nodes()
        .map(|(id, node)| FileEntry {
            name: node.name.clone(),
            path: node.path.display().to_string(),
            selected: selected.contains(&id),
            deps: graph
                .deps(id)
                .iter()
                .filter_map(|d| graph.node(*d))
                .map(|d| d.path.display().to_string())
                .collect(),
        })
        .collect();

    Ok(ListResult { dependency, tree, files, edges: graph.edge_count() })
}

pub(crate) fn install_with<F: Fetcher>(
    storage: &Storage<F>,
    cfg: &Config,
) -> Result<InstallResult> {
    let dependency = cfg.spec()?.clone();
    if cfg.select.is_empty() {
        return Err(anyhow!("Nothing selected, pass at least one --select <PATH|NAME>"));
    }

    let Resolution { tree, graph } = resolve_dependency(storage, cfg)?;
    let selected = select(&graph, &cfg.select)?;
    let files = closure(&graph, selected.iter().copied());
    info!("{} selected files pull in {} files", selected.len(), files.len());

    let dest = destination(cfg.root()?, &cfg.lib_dir, &dependency);
    let copied = export_files(&tree, &dest, &graph, &files, cfg.dry_run)?;

    let selected = selected
        .iter()
        .filter_map(|id| graph.node(*id))
        .map(|n| n.path.display().to_string())
        .collect();

    Ok(InstallResult {
        dependency,
        destination: dest,
        selected,
        files: copied,
        dry_run: cfg.dry_run,
    })
}
