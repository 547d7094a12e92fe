//! Delimited-text ingestion.
//!
//! A source is UTF-8 text: one header line, then `origin;destination;time`
//! records. Bad records are skipped and counted; only a source with no usable
//! record at all (or one that cannot be read) fails.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, Trim};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, GraphBuilder};

/// Field separator used by graph sources.
pub const FIELD_DELIMITER: u8 = b';';

const FIELDS_PER_RECORD: usize = 3;

/// The first line of every source is a header and never becomes an edge.
const HEADER_LINE: u64 = 1;

/// Why a single line was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MalformedReason {
    /// The line did not split into exactly three fields.
    FieldCount { found: usize },
    /// The time field is not a base-10 integer.
    InvalidTime { value: String },
    /// The time field parsed but is below zero.
    NegativeTime { value: i64 },
    /// The time field does not fit the supported weight range.
    TimeOutOfRange { value: i64 },
    /// The line is not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount { found } => {
                write!(f, "expected {FIELDS_PER_RECORD} fields, found {found}")
            }
            Self::InvalidTime { value } => write!(f, "time '{value}' is not an integer"),
            Self::NegativeTime { value } => write!(f, "time {value} is negative"),
            Self::TimeOutOfRange { value } => write!(f, "time {value} is out of range"),
            Self::InvalidUtf8 => write!(f, "line is not valid UTF-8"),
        }
    }
}

/// A skipped line and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedRecord {
    /// 1-based line number in the source, when known.
    pub line: Option<u64>,
    pub reason: MalformedReason,
}

/// Outcome counters for one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub source_name: String,
    /// Valid records turned into edges.
    pub records: usize,
    /// Lines skipped as malformed.
    pub malformed: usize,
    /// Distinct origin locations in the new graph.
    pub origins: usize,
    /// Distinct locations (origins and destinations) in the new graph.
    pub locations: usize,
}

/// A freshly built graph together with its diagnostics.
#[derive(Debug)]
pub struct Ingestion {
    pub graph: Graph,
    pub summary: IngestSummary,
    pub rejected: Vec<MalformedRecord>,
}

/// Parse `reader` into a brand-new graph.
///
/// Line 1 is the header and is dropped whatever it holds. Every later line,
/// blank ones included, is either an edge or a malformed record.
///
/// Fails with [`Error::NoValidRecords`] when nothing usable was found and with
/// [`Error::SourceUnreadable`] when the stream itself errors.
pub fn ingest<R: Read>(source_name: &str, reader: R) -> Result<Ingestion> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .terminator(Terminator::Any(b'\n'))
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(LineTerminated::new(reader));

    let mut builder = GraphBuilder::default();
    let mut rejected = Vec::new();
    let mut record = StringRecord::new();
    // Line of the previous record, 0 before the first one.
    let mut last_line = 0;

    loop {
        let read = csv_reader.read_record(&mut record);
        // Every record consumes its own line feed, so the reader now sits on
        // the line after it.
        let next_line = csv_reader.position().line();
        let parsed = match read {
            Ok(true) => parse_record(&record),
            Ok(false) => {
                reject_blank_lines(source_name, last_line, next_line, &mut rejected);
                break;
            }
            Err(err) if err.is_io_error() => {
                return Err(Error::SourceUnreadable {
                    source_name: source_name.to_string(),
                    source: err,
                });
            }
            Err(_) => Err(MalformedReason::InvalidUtf8),
        };

        let line = next_line.saturating_sub(1);
        reject_blank_lines(source_name, last_line, line, &mut rejected);
        last_line = line;
        if line <= HEADER_LINE {
            continue;
        }

        match parsed {
            Ok(edge) => builder.push(edge),
            Err(reason) => reject(
                source_name,
                MalformedRecord {
                    line: Some(line),
                    reason,
                },
                &mut rejected,
            ),
        }
    }

    let records = builder.edge_count();
    if records == 0 {
        warn!(
            source = source_name,
            malformed = rejected.len(),
            "graph source yielded no valid records"
        );
        return Err(Error::NoValidRecords {
            source_name: source_name.to_string(),
            malformed: rejected.len(),
        });
    }

    let graph = builder.finish();
    let summary = IngestSummary {
        source_name: source_name.to_string(),
        records,
        malformed: rejected.len(),
        origins: graph.origins().len(),
        locations: graph.node_count(),
    };

    info!(
        source = source_name,
        records = summary.records,
        malformed = summary.malformed,
        origins = summary.origins,
        "graph source ingested"
    );

    Ok(Ingestion {
        graph,
        summary,
        rejected,
    })
}

/// Open `path` and ingest it; failure to open is reported as an unreadable
/// source.
pub fn ingest_file(path: &Path) -> Result<Ingestion> {
    let source_name = path.display().to_string();
    debug!(path = %source_name, "opening graph source");
    let file = File::open(path).map_err(|err| Error::SourceUnreadable {
        source_name: source_name.clone(),
        source: csv::Error::from(err),
    })?;
    ingest(&source_name, file)
}

fn reject(source_name: &str, malformed: MalformedRecord, rejected: &mut Vec<MalformedRecord>) {
    warn!(
        source = source_name,
        line = malformed.line,
        reason = %malformed.reason,
        "skipping malformed record"
    );
    rejected.push(malformed);
}

/// The reader skips empty lines, so the lines strictly between two records
/// were blank. A blank line splits into a single empty field.
fn reject_blank_lines(
    source_name: &str,
    after: u64,
    before: u64,
    rejected: &mut Vec<MalformedRecord>,
) {
    for line in (after + 1).max(HEADER_LINE + 1)..before {
        reject(
            source_name,
            MalformedRecord {
                line: Some(line),
                reason: MalformedReason::FieldCount { found: 1 },
            },
            rejected,
        );
    }
}

fn parse_record(record: &StringRecord) -> std::result::Result<Edge, MalformedReason> {
    if record.len() != FIELDS_PER_RECORD {
        return Err(MalformedReason::FieldCount {
            found: record.len(),
        });
    }

    let time = parse_time(&record[2])?;
    Ok(Edge::new(&record[0], &record[1], time))
}

fn parse_time(field: &str) -> std::result::Result<u32, MalformedReason> {
    let value: i64 = field.parse().map_err(|_| MalformedReason::InvalidTime {
        value: field.to_string(),
    })?;
    if value < 0 {
        return Err(MalformedReason::NegativeTime { value });
    }
    u32::try_from(value).map_err(|_| MalformedReason::TimeOutOfRange { value })
}

/// Appends a line feed to a stream that does not end with one, so the last
/// record consumes a terminator like every other.
struct LineTerminated<R> {
    inner: R,
    last_byte: Option<u8>,
    finished: bool,
}

impl<R> LineTerminated<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            last_byte: None,
            finished: false,
        }
    }
}

impl<R: Read> Read for LineTerminated<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished || buf.is_empty() {
            return Ok(0);
        }
        let read = self.inner.read(buf)?;
        if read > 0 {
            self.last_byte = Some(buf[read - 1]);
            return Ok(read);
        }
        self.finished = true;
        match self.last_byte {
            Some(byte) if byte != b'\n' => {
                buf[0] = b'\n';
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingest_str(input: &str) -> Result<Ingestion> {
        ingest("test", input.as_bytes())
    }

    #[test]
    fn header_line_is_always_skipped() {
        let ingestion = ingest_str("A;B;5\nC;D;1\n").expect("one record survives");
        assert_eq!(ingestion.summary.records, 1);
        assert_eq!(ingestion.graph.origins(), ["C".to_string()]);
    }

    #[test]
    fn fields_are_trimmed() {
        let ingestion = ingest_str("h\n  A ;\tB ;  5 \n").expect("valid");
        let edge = &ingestion.graph.outgoing("A")[0];
        assert_eq!(edge, &Edge::new("A", "B", 5));
    }

    #[test]
    fn empty_location_ids_are_accepted() {
        let ingestion = ingest_str("h\n;B;2\nA;;3\n").expect("valid");
        assert_eq!(ingestion.summary.records, 2);
        assert!(ingestion.graph.contains_node(""));
        assert_eq!(ingestion.graph.outgoing("")[0].destination, "B");
    }

    #[test]
    fn wrong_field_counts_are_skipped_and_counted() {
        let ingestion = ingest_str("h\nA;B\nA;B;1\nA;B;2;3\n").expect("one valid");
        assert_eq!(ingestion.summary.records, 1);
        assert_eq!(ingestion.summary.malformed, 2);
        assert_eq!(
            ingestion.rejected[0],
            MalformedRecord {
                line: Some(2),
                reason: MalformedReason::FieldCount { found: 2 },
            }
        );
        assert_eq!(
            ingestion.rejected[1].reason,
            MalformedReason::FieldCount { found: 4 }
        );
    }

    #[test]
    fn time_parse_failures_are_skipped() {
        let ingestion = ingest_str("h\nA;B;x\nA;B;1.5\nA;B;7\n").expect("one valid");
        assert_eq!(ingestion.summary.records, 1);
        assert_eq!(
            ingestion.rejected[0].reason,
            MalformedReason::InvalidTime {
                value: "x".to_string()
            }
        );
    }

    #[test]
    fn negative_and_oversized_times_are_rejected() {
        let ingestion = ingest_str("h\nA;B;-4\nA;C;99999999999\nA;D;+3\n").expect("one valid");
        assert_eq!(ingestion.summary.records, 1);
        assert_eq!(
            ingestion.rejected[0].reason,
            MalformedReason::NegativeTime { value: -4 }
        );
        assert_eq!(
            ingestion.rejected[1].reason,
            MalformedReason::TimeOutOfRange { value: 99_999_999_999 }
        );
        assert_eq!(ingestion.graph.outgoing("A")[0].time, 3);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let ingestion = ingest_str("h\r\nA;B;5\r\nB;C;10\r\n").expect("valid");
        assert_eq!(ingestion.summary.records, 2);
        assert_eq!(ingestion.graph.outgoing("B")[0].destination, "C");
    }

    #[test]
    fn blank_first_line_is_the_header() {
        let ingestion = ingest_str("\nA;B;5\nB;C;10\n").expect("two records");
        assert_eq!(ingestion.summary.records, 2);
        assert_eq!(ingestion.summary.malformed, 0);
        assert_eq!(ingestion.graph.origins(), ["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn blank_data_lines_are_malformed() {
        let ingestion = ingest_str("H\nA;B;5\n\nB;C;10\n").expect("two records");
        assert_eq!(ingestion.summary.records, 2);
        assert_eq!(ingestion.summary.malformed, 1);
        assert_eq!(
            ingestion.rejected,
            vec![MalformedRecord {
                line: Some(3),
                reason: MalformedReason::FieldCount { found: 1 },
            }]
        );
    }

    #[test]
    fn leading_and_trailing_blank_lines_are_counted() {
        let ingestion = ingest_str("\n\nA;B;5\nB;C;10\n\n").expect("two records");
        assert_eq!(ingestion.summary.records, 2);
        let lines: Vec<_> = ingestion.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![Some(2), Some(5)]);
    }

    #[test]
    fn blank_crlf_line_is_malformed() {
        let ingestion = ingest_str("h\r\nA;B;5\r\n\r\nB;C;10\r\n").expect("two records");
        assert_eq!(ingestion.summary.records, 2);
        assert_eq!(
            ingestion.rejected,
            vec![MalformedRecord {
                line: Some(3),
                reason: MalformedReason::FieldCount { found: 1 },
            }]
        );
    }

    #[test]
    fn last_line_without_line_feed_keeps_its_number() {
        let ingestion = ingest_str("h\nA;B;5\n\nB;C;x").expect("one record");
        let lines: Vec<_> = ingestion.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![Some(3), Some(4)]);
    }

    #[test]
    fn only_blank_lines_fail_with_count() {
        let err = ingest_str("\n\n\n").expect_err("nothing valid");
        assert!(matches!(
            err,
            Error::NoValidRecords { malformed: 2, .. }
        ));
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let mut input = b"h\nA;B;1\n".to_vec();
        input.extend_from_slice(b"\xff;B;2\n");
        let ingestion = ingest("bytes", input.as_slice()).expect("one valid");
        assert_eq!(ingestion.summary.records, 1);
        assert_eq!(ingestion.rejected[0].reason, MalformedReason::InvalidUtf8);
    }

    #[test]
    fn header_only_source_fails() {
        let err = ingest_str("H\n").expect_err("no data rows");
        assert!(matches!(
            err,
            Error::NoValidRecords { malformed: 0, .. }
        ));
    }

    #[test]
    fn all_malformed_source_fails_with_count() {
        let err = ingest_str("H\nA;B\nC;D;z\n").expect_err("nothing valid");
        assert!(matches!(
            err,
            Error::NoValidRecords { malformed: 2, .. }
        ));
    }

    #[test]
    fn empty_source_fails() {
        let err = ingest_str("").expect_err("empty");
        assert!(err.is_no_valid_records());
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = ingest_file(Path::new("/definitely/not/here.csv")).expect_err("missing");
        assert!(matches!(err, Error::SourceUnreadable { .. }));
        assert!(!err.is_no_valid_records());
    }

    #[test]
    fn summary_counts_locations() {
        let ingestion = ingest_str("h\nA;B;1\nB;C;1\n").expect("valid");
        assert_eq!(ingestion.summary.origins, 2);
        assert_eq!(ingestion.summary.locations, 3);
    }
}
