//! Error types for prior pool construction and queries.

use thiserror::Error;

/// Result type alias for prior pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;

/// Prior pool error types.
#[derive(Debug, Error)]
pub enum PoolError {
    /// I/O error from the pool file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted pool is malformed or unreadable.
    #[error("corrupted pool file: {message}")]
    Corrupted { message: String },

    /// Persisted pool was written by an incompatible format version.
    #[error("pool schema version mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: u32, found: u32 },

    /// Persisted encodings do not match the configured architecture shape.
    #[error(
        "pool shape mismatch: expected {expected_layers}x{expected_width}, \
         found {found_layers}x{found_width}"
    )]
    ShapeMismatch {
        expected_layers: usize,
        expected_width: usize,
        found_layers: usize,
        found_width: usize,
    },

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rejection sampling exhausted its attempt budget for a target.
    #[error("no architecture within tolerance of target {target} after {attempts} attempts")]
    SearchExhausted { target: u64, attempts: usize },

    /// Query issued against a pool with no entries.
    #[error("prior pool is empty")]
    EmptyPool,

    /// Failure reported by the architecture space or cost evaluator.
    #[error("architecture space error: {0}")]
    Space(String),
}

impl PoolError {
    /// Create a corrupted pool file error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        PoolError::Corrupted {
            message: message.into(),
        }
    }

    /// Create a collaborator failure error.
    pub fn space(message: impl Into<String>) -> Self {
        PoolError::Space(message.into())
    }
}
