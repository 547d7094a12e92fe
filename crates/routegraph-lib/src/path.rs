use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::graph::{Graph, LocationId};

/// Fastest route between two locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortestPath {
    /// Locations from origin to destination, both inclusive.
    pub path: Vec<LocationId>,
    /// Sum of edge times along `path`.
    pub total_time: u64,
}

impl ShortestPath {
    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Find the minimum-time path from `origin` to `destination`.
///
/// Returns `None` when either location is unknown to the graph or when the
/// destination is unreachable. A location routed to itself yields a single
/// step path with zero time, even if it has no outgoing edges.
pub fn shortest_path(graph: &Graph, origin: &str, destination: &str) -> Option<ShortestPath> {
    if !graph.contains_node(origin) || !graph.contains_node(destination) {
        debug!(origin, destination, "path query references unknown location");
        return None;
    }

    if origin == destination {
        return Some(ShortestPath {
            path: vec![origin.to_string()],
            total_time: 0,
        });
    }

    let mut distances: HashMap<&str, u64> = HashMap::with_capacity(graph.node_count());
    let mut parents: HashMap<&str, &str> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(origin, 0);
    queue.push(QueueEntry::new(origin, 0));

    while let Some(entry) = queue.pop() {
        if entry.cost > distance_of(&distances, entry.node) {
            continue;
        }

        if entry.node == destination {
            break;
        }

        for edge in graph.outgoing(entry.node) {
            let next = edge.destination.as_str();
            let next_cost = entry.cost + u64::from(edge.time);
            match distances.entry(next) {
                Entry::Occupied(mut known) if next_cost < *known.get() => {
                    known.insert(next_cost);
                }
                Entry::Vacant(slot) => {
                    slot.insert(next_cost);
                }
                Entry::Occupied(_) => continue,
            }
            parents.insert(next, entry.node);
            queue.push(QueueEntry::new(next, next_cost));
        }
    }

    let total_time = *distances.get(destination)?;
    let path = reconstruct_path(&parents, origin, destination);
    debug!(
        origin,
        destination,
        total_time,
        hops = path.len() - 1,
        "shortest path resolved"
    );

    Some(ShortestPath { path, total_time })
}

/// Unvisited locations are treated as infinitely far away.
fn distance_of(distances: &HashMap<&str, u64>, node: &str) -> u64 {
    distances.get(node).copied().unwrap_or(u64::MAX)
}

fn reconstruct_path(parents: &HashMap<&str, &str>, start: &str, goal: &str) -> Vec<LocationId> {
    let mut path = vec![goal.to_string()];
    let mut current = goal;
    while current != start {
        match parents.get(current) {
            Some(&parent) => {
                path.push(parent.to_string());
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry<'a> {
    node: &'a str,
    cost: u64,
}

impl<'a> QueueEntry<'a> {
    fn new(node: &'a str, cost: u64) -> Self {
        Self { node, cost }
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(self.node))
    }
}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
