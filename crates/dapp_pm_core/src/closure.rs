use log::{debug, trace};
use std::collections::BTreeSet;

use crate::{graph::ImportGraph, types::NodeId};

/// Computes every node reachable from `seeds` by following import edges,
/// seeds included.
///
/// The walk keeps an explicit visited set and an explicit stack, so cyclic
/// graphs terminate and deep import chains cannot overflow the call stack.
/// Seeds that do not belong to `graph` are ignored.
pub fn closure<I>(graph: &ImportGraph, seeds: I) -> BTreeSet<NodeId>
where
    I: IntoIterator<Item = NodeId>,
{
    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    let mut stack: Vec<NodeId> =
        seeds.into_iter().filter(|id| graph.node(*id).is_some()).collect();

    while let Some(cur) = stack.pop() {
        if !visited.insert(cur) {
            continue;
        }
        trace!("Visiting node {}", cur);

        for &next in graph.deps(cur) {
            if !visited.contains(&next) {
                stack.push(next);
            }
        }
    }

    debug!("Closure contains {} files", visited.len());
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiscoveredFile;
    use anyhow::anyhow;
    use std::{collections::HashMap, io::Cursor, path::PathBuf};

    /// Builds a graph from `(name, "Dep1 Dep2")` pairs; every file lives in `src/`.
    fn graph_of(spec: &[(&str, &str)]) -> ImportGraph {
        let contents: HashMap<PathBuf, String> = spec
            .iter()
            .map(|(name, imports)| {
                let body: String = imports
                    .split_whitespace()
                    .map(|i| format!("import \"./{}.sol\";\n", i))
                    .collect();
                (PathBuf::from(format!("src/{}.sol", name)), body)
            })
            .collect();
        let files = spec
            .iter()
            .map(|(name, _)| {
                DiscoveredFile::new(format!("{}.sol", name), format!("src/{}.sol", name))
            })
            .collect();
        ImportGraph::build_with(files, |rel| {
            contents
                .get(rel)
                .cloned()
                .map(Cursor::new)
                .ok_or_else(|| anyhow!("missing {}", rel.display()))
        })
        .unwrap()
    }

    fn id(graph: &ImportGraph, name: &str) -> NodeId {
        graph.find(&format!("{}.sol", name)).unwrap()
    }

    fn names(graph: &ImportGraph, set: &BTreeSet<NodeId>) -> Vec<String> {
        let mut names: Vec<String> = set
            .iter()
            .map(|i| graph.node(*i).unwrap().name.trim_end_matches(".sol").to_string())
            .collect();
        names.sort();
        names
    }

    /// Plain recursive reachability, used as the reference result.
    fn reference_reachable(graph: &ImportGraph, seed: NodeId) -> BTreeSet<NodeId> {
        fn dfs(graph: &ImportGraph, cur: NodeId, seen: &mut BTreeSet<NodeId>) {
            if seen.insert(cur) {
                for &next in graph.deps(cur) {
                    dfs(graph, next, seen);
                }
            }
        }
        let mut seen = BTreeSet::new();
        dfs(graph, seed, &mut seen);
        seen
    }

    #[test]
    fn test_closure_diamond_scenario() {
        let graph = graph_of(&[("X", "A B"), ("A", "D"), ("B", ""), ("D", "")]);
        let result = closure(&graph, [id(&graph, "X")]);
        assert_eq!(result.len(), 4);
        assert_eq!(names(&graph, &result), vec!["A", "B", "D", "X"]);
    }

    #[test]
    fn test_closure_leaf_is_singleton() {
        let graph = graph_of(&[("X", "A"), ("A", "")]);
        let result = closure(&graph, [id(&graph, "A")]);
        assert_eq!(names(&graph, &result), vec!["A"]);
    }

    #[test]
    fn test_closure_two_level_tree() {
        let graph = graph_of(&[
            ("X", "A B C"),
            ("A", "D E"),
            ("B", "F"),
            ("C", "G"),
            ("D", ""),
            ("E", ""),
            ("F", ""),
            ("G", ""),
        ]);
        let result = closure(&graph, [id(&graph, "X")]);
        assert_eq!(result.len(), 8);
    }

    #[test]
    fn test_closure_direct_cycle_terminates() {
        let graph = graph_of(&[("A", "B"), ("B", "A C"), ("C", "")]);
        let result = closure(&graph, [id(&graph, "A")]);
        assert_eq!(names(&graph, &result), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_closure_self_import() {
        let graph = graph_of(&[("A", "A")]);
        let result = closure(&graph, [id(&graph, "A")]);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_closure_long_cycle() {
        let graph = graph_of(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")]);
        for name in ["A", "B", "C", "D"] {
            assert_eq!(closure(&graph, [id(&graph, name)]).len(), 4);
        }
    }

    #[test]
    fn test_closure_deep_chain_does_not_overflow() {
        let count = 20_000;
        let spec: Vec<(String, String)> = (0..count)
            .map(|i| {
                let next = if i + 1 < count { format!("N{}", i + 1) } else { String::new() };
                (format!("N{}", i), next)
            })
            .collect();
        let spec: Vec<(&str, &str)> = spec.iter().map(|(n, d)| (n.as_str(), d.as_str())).collect();
        let graph = graph_of(&spec);
        assert_eq!(closure(&graph, [id(&graph, "N0")]).len(), count);
    }

    #[test]
    fn test_closure_matches_reference_reachability() {
        let graph = graph_of(&[
            ("Root", "Token Access"),
            ("Token", "Math Context"),
            ("Access", "Context"),
            ("Math", ""),
            ("Context", ""),
            ("Unused", "Math"),
        ]);
        for (node, _) in graph.nodes() {
            assert_eq!(closure(&graph, [node]), reference_reachable(&graph, node));
        }
    }

    #[test]
    fn test_closure_is_union_of_seed_closures() {
        let graph = graph_of(&[
            ("A", "C"),
            ("B", "D E"),
            ("C", "E"),
            ("D", "B"),
            ("E", ""),
            ("F", ""),
        ]);
        let a = id(&graph, "A");
        let b = id(&graph, "B");
        let both = closure(&graph, [a, b]);
        let union: BTreeSet<NodeId> =
            closure(&graph, [a]).union(&closure(&graph, [b])).copied().collect();
        assert_eq!(both, union);
        assert_eq!(names(&graph, &both), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_closure_repeated_seed() {
        let graph = graph_of(&[("A", "B"), ("B", "")]);
        let a = id(&graph, "A");
        assert_eq!(closure(&graph, [a, a]).len(), 2);
    }

    #[test]
    fn test_closure_empty_and_foreign_seeds() {
        let graph = graph_of(&[("A", "")]);
        assert!(closure(&graph, Vec::new()).is_empty());
        assert!(closure(&graph, [NodeId(42)]).is_empty());
    }
}
