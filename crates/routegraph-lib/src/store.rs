//! Process-wide graph ownership.
//!
//! The store keeps the current graph behind an `Arc` and only ever swaps the
//! pointer. Readers take a snapshot (an `Arc` clone) and run to completion on
//! it, so a concurrent [`GraphStore::replace`] can never be observed half way.

use std::io::Read;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{info, warn};

use crate::dataset::load_default_source;
use crate::error::Result;
use crate::graph::{Edge, Graph, LocationId};
use crate::ingest::{ingest, ingest_file, IngestSummary, Ingestion};
use crate::path::{shortest_path, ShortestPath};

/// Shape of the loaded graph, as reported to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStatus {
    pub total_edges: usize,
    pub total_origins: usize,
    pub origins: Vec<LocationId>,
    pub edges: Vec<Edge>,
}

/// Shared owner of the current graph snapshot.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Debug, Default)]
pub struct GraphStore {
    current: RwLock<Arc<Graph>>,
}

impl GraphStore {
    /// Create an empty store. Every query answers "no path" until a graph is
    /// loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store populated from the bundled default graph.
    pub fn with_default() -> Result<Self> {
        let store = Self::new();
        store.load_default()?;
        Ok(store)
    }

    /// Populate the store from the bundled default source.
    pub fn load_default(&self) -> Result<IngestSummary> {
        let ingestion = load_default_source()?;
        Ok(self.install(ingestion))
    }

    /// Ingest `reader` and swap it in. On failure the previous graph stays
    /// authoritative.
    pub fn replace<R: Read>(&self, source_name: &str, reader: R) -> Result<IngestSummary> {
        match ingest(source_name, reader) {
            Ok(ingestion) => Ok(self.install(ingestion)),
            Err(err) => {
                warn!(source = source_name, error = %err, "keeping previous graph");
                Err(err)
            }
        }
    }

    /// Like [`GraphStore::replace`] but reads from a file on disk.
    pub fn replace_from_path(&self, path: &Path) -> Result<IngestSummary> {
        match ingest_file(path) {
            Ok(ingestion) => Ok(self.install(ingestion)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "keeping previous graph");
                Err(err)
            }
        }
    }

    /// Swap in an already built graph.
    pub fn replace_graph(&self, graph: Graph) {
        let graph = Arc::new(graph);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = graph;
    }

    /// The graph as of now. Later replacements do not affect the returned
    /// snapshot.
    pub fn snapshot(&self) -> Arc<Graph> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    pub fn all_edges(&self) -> Vec<Edge> {
        self.snapshot().edges().cloned().collect()
    }

    /// Origin locations only; destination-only locations are omitted.
    pub fn all_origins(&self) -> Vec<LocationId> {
        self.snapshot().origins().to_vec()
    }

    pub fn contains_node(&self, location: &str) -> bool {
        self.snapshot().contains_node(location)
    }

    pub fn outgoing(&self, location: &str) -> Vec<Edge> {
        self.snapshot().outgoing(location).to_vec()
    }

    pub fn shortest_path(&self, origin: &str, destination: &str) -> Option<ShortestPath> {
        shortest_path(&self.snapshot(), origin, destination)
    }

    /// Edge and origin listings taken from one snapshot.
    pub fn status(&self) -> GraphStatus {
        let graph = self.snapshot();
        let edges: Vec<Edge> = graph.edges().cloned().collect();
        let origins = graph.origins().to_vec();
        GraphStatus {
            total_edges: edges.len(),
            total_origins: origins.len(),
            origins,
            edges,
        }
    }

    fn install(&self, ingestion: Ingestion) -> IngestSummary {
        let Ingestion { graph, summary, .. } = ingestion;
        self.replace_graph(graph);
        info!(
            source = %summary.source_name,
            edges = summary.records,
            origins = summary.origins,
            "graph replaced"
        );
        summary
    }
}
