//! Shared fixtures and a brute-force reference for path tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;

use routegraph_lib::{Graph, GraphStore};

/// Path to the fixtures directory shared by the workspace.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Store loaded from a fixture file.
pub fn fixture_store(name: &str) -> GraphStore {
    let store = GraphStore::new();
    store
        .replace_from_path(&fixtures_dir().join(name))
        .unwrap_or_else(|err| panic!("fixture {name} loads: {err}"));
    store
}

/// Minimum total time over every simple path from `origin` to `destination`.
pub fn brute_force_time(graph: &Graph, origin: &str, destination: &str) -> Option<u64> {
    if !graph.contains_node(origin) || !graph.contains_node(destination) {
        return None;
    }
    let mut visited = HashSet::new();
    visited.insert(origin.to_string());
    explore(graph, origin, destination, 0, &mut visited)
}

fn explore(
    graph: &Graph,
    current: &str,
    destination: &str,
    cost: u64,
    visited: &mut HashSet<String>,
) -> Option<u64> {
    if current == destination {
        return Some(cost);
    }
    let mut best: Option<u64> = None;
    for edge in graph.outgoing(current) {
        if !visited.insert(edge.destination.clone()) {
            continue;
        }
        let found = explore(
            graph,
            &edge.destination,
            destination,
            cost + u64::from(edge.time),
            visited,
        );
        visited.remove(&edge.destination);
        best = match (best, found) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }
    best
}

/// Sum of the cheapest edge between each consecutive pair of `path`, or
/// `None` when some hop has no edge at all.
pub fn path_cost(graph: &Graph, path: &[String]) -> Option<u64> {
    path.windows(2).try_fold(0u64, |total, hop| {
        graph
            .outgoing(&hop[0])
            .iter()
            .filter(|edge| edge.destination == hop[1])
            .map(|edge| u64::from(edge.time))
            .min()
            .map(|time| total + time)
    })
}
