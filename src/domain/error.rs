//! Domain-level errors

use thiserror::Error;

/// Errors raised while composing or rewriting a variable tree.
#[derive(Error, Debug)]
pub enum VariableError {
    #[error("data sequence too short: needed {needed} handles, got {available}")]
    OutOfBounds { needed: usize, available: usize },

    #[error("length mismatch for {name}: expected {expected} handles, got {actual}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("cycle detected: {0} would contain itself")]
    CycleDetected(String),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for variable operations.
pub type VariableResult<T> = Result<T, VariableError>;
