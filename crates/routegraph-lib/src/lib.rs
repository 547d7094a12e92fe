//! routegraph library entry points.
//!
//! This crate ingests semicolon-delimited travel-time tables into an in-memory
//! directed graph, keeps the current graph in a [`GraphStore`] that can be
//! replaced atomically, and answers fastest-route queries with Dijkstra's
//! algorithm. Front ends (CLI, HTTP handlers) should only depend on the items
//! exported here.
//!

#![deny(warnings)]

pub mod dataset;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod path;
pub mod store;

pub use dataset::{load_default_source, DEFAULT_SOURCE_NAME};
pub use error::{Error, Result};
pub use graph::{Edge, Graph, LocationId};
pub use ingest::{
    ingest, ingest_file, IngestSummary, Ingestion, MalformedReason, MalformedRecord,
};
pub use path::{shortest_path, ShortestPath};
pub use store::{GraphStatus, GraphStore};
