//! Error types for goldspan.

use thiserror::Error;

use crate::span::Span;

/// Result type for goldspan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which span list a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanOrigin {
    /// The enumerated candidate spans.
    Candidate,
    /// The ground-truth gold spans.
    Gold,
}

impl std::fmt::Display for SpanOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpanOrigin::Candidate => write!(f, "candidate"),
            SpanOrigin::Gold => write!(f, "gold"),
        }
    }
}

/// Error type for goldspan operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// One or more gold spans had no matching candidate span.
    ///
    /// This indicates inconsistent upstream data (the candidate set was
    /// supposed to contain every gold span), so the whole resolution is
    /// aborted rather than returning a truncated mapping.
    #[error("{unmatched} of {gold_total} gold spans have no matching candidate")]
    UnmatchedGold {
        /// Number of gold spans without a candidate match.
        unmatched: usize,
        /// Total number of gold spans in the call.
        gold_total: usize,
    },

    /// A span list contains two entries with identical boundaries.
    ///
    /// Only raised when duplicate checking is explicitly enabled.
    #[error("duplicate {origin} span {span}")]
    DuplicateSpan {
        /// Which list the duplicate was found in.
        origin: SpanOrigin,
        /// The repeated boundary pair.
        span: Span,
    },

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Corpus parsing error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }
}
