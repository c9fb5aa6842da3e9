use anyhow::{Context, Result, anyhow};
use log::{debug, info, trace, warn};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::{
    parser::imports_for,
    resolver::{normalize, resolve},
    types::{DiscoveredFile, NodeId, SourceFile},
};

/// Directed import graph over the files of one vendored tree.
///
/// Nodes live in an arena in discovery order; edges are [`NodeId`]s into it, so
/// cycles between files need no shared ownership.
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    nodes: Vec<SourceFile>,
    index: HashMap<PathBuf, NodeId>,
}

impl ImportGraph {
    /// Builds the graph by reading every discovered file from under `root`.
    pub fn build(root: &Path, files: Vec<DiscoveredFile>) -> Result<Self> {
        debug!("Building import graph for tree at {}", root.display());
        Self::build_with(files, |rel| {
            let full = root.join(rel);
            let file = File::open(&full)
                .with_context(|| format!("Failed to open {}", full.display()))?;
            Ok(BufReader::new(file))
        })
    }

    /// Builds the graph using `open` to obtain line access to each file.
    ///
    /// Any error from `open` or from reading a line aborts the whole build.
    pub fn build_with<F, R>(files: Vec<DiscoveredFile>, mut open: F) -> Result<Self>
    where
        F: FnMut(&Path) -> Result<R>,
        R: BufRead,
    {
        let mut graph = Self::with_files(files);

        for idx in 0..graph.nodes.len() {
            let path = graph.nodes[idx].path.clone();
            let reader = open(path.as_path())?;
            let specs = imports_for(&path, reader)?;

            let mut deps = Vec::new();
            for spec in specs {
                let candidate = resolve(&path, &spec.request);
                match graph.index.get(&candidate) {
                    Some(&target) => {
                        trace!("Edge {} -> {}", path.display(), candidate.display());
                        deps.push(target);
                    }
                    None => {
                        trace!(
                            "Dropping unresolved import '{}' at {}:{}",
                            spec.request,
                            path.display(),
                            spec.line
                        );
                    }
                }
            }
            graph.nodes[idx].deps = deps;
        }

        info!(
            "Built import graph with {} files and {} edges",
            graph.nodes.len(),
            graph.edge_count()
        );
        Ok(graph)
    }

    fn with_files(files: Vec<DiscoveredFile>) -> Self {
        let mut graph = Self::default();
        for file in files {
            let path = normalize(&file.path);
            if graph.index.contains_key(&path) {
                warn!("Skipping duplicate discovered file: {}", path.display());
                continue;
            }
            let id = NodeId(graph.nodes.len());
            graph.index.insert(path.clone(), id);
            graph.nodes.push(SourceFile { name: file.name, path, deps: Vec::new() });
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.deps.len()).sum()
    }

    pub fn node(&self, id: NodeId) -> Option<&SourceFile> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SourceFile)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Direct dependencies of `id`, in import order, duplicates included.
    pub fn deps(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map(|n| n.deps.as_slice()).unwrap_or(&[])
    }

    /// Looks a node up by its tree-relative path.
    pub fn lookup(&self, path: &Path) -> Option<NodeId> {
        self.index.get(&normalize(path)).copied()
    }

    /// Finds the node named by `query`: a tree-relative path, or a file name
    /// that only one node carries.
    pub fn find(&self, query: &str) -> Result<NodeId> {
        if let Some(id) = self.lookup(Path::new(query)) {
            return Ok(id);
        }

        let matches: Vec<NodeId> =
            self.nodes().filter(|(_, n)| n.name == query).map(|(id, _)| id).collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(anyhow!("No source file matches '{}'", query)),
            many => {
                let paths: Vec<String> = many
                    .iter()
                    .filter_map(|id| self.node(*id))
                    .map(|n| n.path.display().to_string())
                    .collect();
                Err(anyhow!(
                    "'{}' is ambiguous, use one of the paths: {}",
                    query,
                    paths.join(", ")
                ))
            }
        }
    }
}
