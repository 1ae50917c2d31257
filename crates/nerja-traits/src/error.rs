//! Error types for the Nerja simulator.
//!
//! This module defines the error taxonomy used throughout the workspace.
//! Malformed input is rejected before the first state transition executes;
//! numeric degeneracies inside the per-date loop are handled locally and
//! never surface here. A non-finite value committed into portfolio state
//! is the one fatal case, reported as [`NerjaError::NumericInvariant`].

use thiserror::Error;

/// The main error type for Nerja operations.
#[derive(Debug, Error)]
pub enum NerjaError {
    /// A required column is missing from the input table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The input table is malformed beyond a missing column, e.g. the
    /// date or instrument axis cannot be constructed from it.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A non-finite value leaked into committed portfolio state. The
    /// per-date guards substitute zero for every degenerate division, so
    /// this indicates an internal invariant violation and aborts the run.
    #[error("Numeric invariant violated: {0}")]
    NumericInvariant(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// A date value could not be parsed or is out of range.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for NerjaError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for NerjaError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Nerja operations.
///
/// This is a convenience type that uses [`NerjaError`] as the error type.
pub type Result<T> = std::result::Result<T, NerjaError>;
