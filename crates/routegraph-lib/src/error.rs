use thiserror::Error;

/// Convenient result alias for the routegraph library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Malformed lines never surface here; they are skipped during ingestion and
/// reported through [`crate::IngestSummary`].
#[derive(Debug, Error)]
pub enum Error {
    /// The byte source could not be read at all.
    #[error("failed to read graph source {source_name}")]
    SourceUnreadable {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// The source was readable but yielded no usable edge.
    #[error(
        "graph source {source_name} contained no valid records ({malformed} malformed line{})",
        plural(.malformed)
    )]
    NoValidRecords {
        source_name: String,
        malformed: usize,
    },

    /// The bundled default graph could not be loaded at startup.
    #[error("bundled default graph is unusable")]
    DefaultSourceUnusable(#[source] Box<Error>),
}

impl Error {
    /// `true` when the failure means the input held nothing recoverable, as
    /// opposed to a stream that could not be read.
    pub fn is_no_valid_records(&self) -> bool {
        match self {
            Error::NoValidRecords { .. } => true,
            Error::DefaultSourceUnusable(inner) => inner.is_no_valid_records(),
            Error::SourceUnreadable { .. } => false,
        }
    }
}

fn plural(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}
