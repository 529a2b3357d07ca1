//! Crate-wide error types.

use thiserror::Error;

/// Errors raised while reading a semicolon-separated pairing stream.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: malformed {field}")]
    MalformedDate { line: usize, field: &'static str },

    #[error("line {line}: pairId {pair_id} is not monotonic (previous was {previous})")]
    NonMonotonicPairId {
        line: usize,
        pair_id: u32,
        previous: u32,
    },

    #[error("leg claims pairId {found} but its pairing is {expected}")]
    PairIdMismatch { expected: u32, found: u32 },
}

/// Top-level error type returned by the binary.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to ingest pairings: {0}")]
    Ingest(#[from] IngestError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid schedule window date: {0}")]
    InvalidDate(#[from] chrono::ParseError),

    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}
