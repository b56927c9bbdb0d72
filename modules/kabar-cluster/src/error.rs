use thiserror::Error;

/// Errors from the de-duplication core. All are fatal for the batch that
/// raised them; no partial result is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterError {
    #[error("embedding dimension mismatch at index {index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("similarity threshold {0} is outside [-1, 1]")]
    InvalidThreshold(f64),

    #[error("empty input: at least one label is required")]
    EmptyInput,
}
