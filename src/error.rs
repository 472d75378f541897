//! Error types shared across the library.
//!
//! Errors are raised at the point of detection and propagated to the caller;
//! the library performs no local recovery. Failing to converge within the
//! iteration cap of the iterative aligner is a status, not an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Eigensolver or SVD reported an illegal argument or did not converge.
    /// Carries the solver status code.
    #[error("numerical failure in {routine}: solver returned status {status}")]
    NumericalFailure { routine: &'static str, status: i32 },

    /// Positional correspondence requires equal cardinality.
    #[error("cardinality mismatch: expected {expected} atoms, found {found}")]
    CardinalityMismatch { expected: usize, found: usize },

    /// Input cannot support the requested computation
    /// (zero total mass, too few atoms, empty ensemble).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Error::DegenerateInput(msg.into())
    }
}
