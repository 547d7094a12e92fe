//! Command handlers. `main.rs` parses arguments and dispatches here.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing::info;

use routegraph_lib::GraphStore;

use crate::output::{
    render_load, render_route, render_status, LoadReport, OutputFormat, RouteReport,
};

/// Extension required for uploaded graph files.
const GRAPH_FILE_EXTENSION: &str = "csv";

/// Check that `path` looks like a graph upload: a `.csv` file with content.
///
/// Returns the file size in bytes.
pub fn validate_graph_file(path: &Path) -> Result<u64> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(GRAPH_FILE_EXTENSION));
    if !is_csv {
        bail!("graph file {} must have a .csv extension", path.display());
    }

    let metadata = fs::metadata(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    if metadata.len() == 0 {
        bail!("graph file {} is empty", path.display());
    }
    Ok(metadata.len())
}

/// Build the store the commands run against: the bundled default graph,
/// optionally replaced by `graph_file`.
pub fn prepare_store(graph_file: Option<&Path>) -> Result<GraphStore> {
    let store = GraphStore::with_default().context("failed to load the bundled default graph")?;

    if let Some(path) = graph_file {
        validate_graph_file(path)?;
        store
            .replace_from_path(path)
            .with_context(|| format!("failed to load graph file {}", path.display()))?;
    }

    Ok(store)
}

pub fn handle_status<W: Write>(
    store: &GraphStore,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let status = store.status();
    render_status(out, format, &status).context("failed to write graph status")
}

/// Print the fastest route. An unknown or unreachable destination is a normal
/// answer, not an error.
pub fn handle_route<W: Write>(
    store: &GraphStore,
    from: &str,
    to: &str,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let report = RouteReport::new(from, to, store.shortest_path(from, to));
    info!(
        from,
        to,
        found = report.route.is_some(),
        total_time = report.total_time,
        "route query answered"
    );
    render_route(out, format, &report).context("failed to write route")
}

/// Replace the store contents with `path` and report the outcome. Fails when
/// the file is rejected so the process exits non-zero.
pub fn handle_load<W: Write>(
    store: &GraphStore,
    path: &Path,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let file_size = validate_graph_file(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let started = Instant::now();
    let outcome = store.replace_from_path(path);
    let processing_ms = started.elapsed().as_millis();

    let report = match &outcome {
        Ok(summary) => LoadReport {
            success: true,
            message: "graph file processed".to_string(),
            file_name,
            file_size,
            processing_ms,
            summary: Some(summary.clone()),
        },
        Err(err) => LoadReport {
            success: false,
            message: err.to_string(),
            file_name,
            file_size,
            processing_ms,
            summary: None,
        },
    };
    render_load(out, format, &report).context("failed to write load report")?;

    outcome
        .map(|_| ())
        .with_context(|| format!("failed to load graph file {}", path.display()))
}
