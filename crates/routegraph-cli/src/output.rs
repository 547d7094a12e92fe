//! Rendering of command results as text or JSON.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use routegraph_lib::{GraphStatus, IngestSummary, ShortestPath};

/// Message reported when two locations are not connected.
pub const NO_ROUTE_MESSAGE: &str = "no route exists between the given locations";

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Answer to a route query, echoing the requested endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteReport {
    pub origin: String,
    pub destination: String,
    pub route: Option<Vec<String>>,
    pub total_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RouteReport {
    pub fn new(origin: &str, destination: &str, result: Option<ShortestPath>) -> Self {
        match result {
            Some(found) => Self {
                origin: origin.to_string(),
                destination: destination.to_string(),
                route: Some(found.path),
                total_time: Some(found.total_time),
                message: None,
            },
            None => Self {
                origin: origin.to_string(),
                destination: destination.to_string(),
                route: None,
                total_time: None,
                message: Some(NO_ROUTE_MESSAGE.to_string()),
            },
        }
    }
}

/// Outcome of loading a graph file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub success: bool,
    pub message: String,
    pub file_name: String,
    pub file_size: u64,
    pub processing_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<IngestSummary>,
}

pub fn render_status<W: Write>(
    out: &mut W,
    format: OutputFormat,
    status: &GraphStatus,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, status),
        OutputFormat::Text => {
            writeln!(out, "Connections: {}", status.total_edges)?;
            writeln!(out, "Origin locations: {}", status.total_origins)?;
            writeln!(out)?;
            writeln!(out, "Origins:")?;
            for origin in &status.origins {
                writeln!(out, "- {origin}")?;
            }
            writeln!(out)?;
            writeln!(out, "Edges:")?;
            for edge in &status.edges {
                writeln!(out, "- {} -> {} ({})", edge.origin, edge.destination, edge.time)?;
            }
            Ok(())
        }
    }
}

pub fn render_route<W: Write>(
    out: &mut W,
    format: OutputFormat,
    report: &RouteReport,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Text => match (&report.route, report.total_time) {
            (Some(route), Some(total_time)) => {
                writeln!(out, "Route: {}", route.join(" -> "))?;
                writeln!(out, "Total time: {total_time}")
            }
            _ => writeln!(
                out,
                "No route from {} to {}: {}",
                report.origin,
                report.destination,
                report.message.as_deref().unwrap_or(NO_ROUTE_MESSAGE)
            ),
        },
    }
}

pub fn render_load<W: Write>(
    out: &mut W,
    format: OutputFormat,
    report: &LoadReport,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Text => {
            writeln!(out, "{}: {}", report.file_name, report.message)?;
            if let Some(summary) = &report.summary {
                writeln!(out, "Connections: {}", summary.records)?;
                writeln!(out, "Malformed lines: {}", summary.malformed)?;
                writeln!(out, "Origin locations: {}", summary.origins)?;
            }
            writeln!(
                out,
                "File size: {} bytes, processed in {}ms",
                report.file_size, report.processing_ms
            )
        }
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
