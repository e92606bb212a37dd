//! Error types for the Lucidia kernel.
//!
//! Metric functions are total and never return errors; only the
//! persistence layer (ledger, continuity store, contradiction log) and
//! configuration can fail.

use std::path::PathBuf;

/// Kernel error types covering all fallible operations.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record in {} at line {line}: {reason}", .path.display())]
    Decode {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Ledger chain mismatch: expected head {expected}, recomputed {actual}")]
    ChainMismatch { expected: String, actual: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, KernelError>;
