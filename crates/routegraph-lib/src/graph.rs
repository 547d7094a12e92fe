use std::collections::{HashMap, HashSet};

use serde::Serialize;

/// Opaque, case-sensitive location token.
pub type LocationId = String;

/// Directed, weighted connection between two locations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub origin: LocationId,
    pub destination: LocationId,
    /// Travel time; never negative.
    pub time: u32,
}

impl Edge {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, time: u32) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            time,
        }
    }
}

/// Immutable adjacency snapshot keyed by origin location.
///
/// Origins are kept in first-seen order so listings are deterministic. The
/// node set (origins plus every destination) is computed once at build time
/// because a graph is never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    origins: Vec<LocationId>,
    adjacency: HashMap<LocationId, Vec<Edge>>,
    nodes: HashSet<LocationId>,
}

impl Graph {
    /// Build a graph from edges, preserving their order per origin.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut builder = GraphBuilder::default();
        for edge in edges {
            builder.push(edge);
        }
        builder.finish()
    }

    /// Distinct origin keys in first-seen order. Destination-only locations are
    /// not listed.
    pub fn origins(&self) -> &[LocationId] {
        &self.origins
    }

    /// Every edge, grouped by origin in first-seen order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.origins
            .iter()
            .flat_map(move |origin| self.outgoing(origin).iter())
    }

    /// Outgoing edges for `location`; empty for unknown or destination-only
    /// locations.
    pub fn outgoing(&self, location: &str) -> &[Edge] {
        self.adjacency
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `true` when `location` appears as an origin or as any edge destination.
    pub fn contains_node(&self, location: &str) -> bool {
        self.nodes.contains(location)
    }

    /// Full node set: origins and destination-only locations.
    pub fn nodes(&self) -> &HashSet<LocationId> {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

/// Incremental constructor used by ingestion.
#[derive(Debug, Default)]
pub(crate) struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub(crate) fn push(&mut self, edge: Edge) {
        let graph = &mut self.graph;
        if !graph.adjacency.contains_key(&edge.origin) {
            graph.origins.push(edge.origin.clone());
        }
        graph.nodes.insert(edge.origin.clone());
        graph.nodes.insert(edge.destination.clone());
        graph
            .adjacency
            .entry(edge.origin.clone())
            .or_default()
            .push(edge);
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(crate) fn finish(self) -> Graph {
        self.graph
    }
}
