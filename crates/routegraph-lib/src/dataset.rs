//! Default graph source compiled into the library.

use crate::error::{Error, Result};
use crate::ingest::{ingest, Ingestion};

/// Name reported in logs and summaries for the bundled source.
pub const DEFAULT_SOURCE_NAME: &str = "default_graph.csv";

/// Raw contents of the bundled default graph.
pub const DEFAULT_SOURCE: &str = include_str!("../data/default_graph.csv");

/// Ingest the bundled default graph.
///
/// Any failure is wrapped in [`Error::DefaultSourceUnusable`]; callers should
/// refuse to serve queries when this returns an error.
pub fn load_default_source() -> Result<Ingestion> {
    ingest(DEFAULT_SOURCE_NAME, DEFAULT_SOURCE.as_bytes())
        .map_err(|err| Error::DefaultSourceUnusable(Box::new(err)))
}
