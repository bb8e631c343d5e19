//! Error types for semiring operations.

use thiserror::Error;

/// Result type alias for semiring operations.
pub type Result<T> = std::result::Result<T, SemiringError>;

/// Precondition violations reported by the semirings.
///
/// Shape and broadcast mismatches inside the tensor layer are not reported
/// here; they panic like any other tensor indexing error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemiringError {
    /// Reduction requested over an axis the semiring cannot reduce.
    #[error("{semiring}: cannot reduce over dim {dim} of a {ndim}-d value, only the last axis is supported")]
    UnsupportedAxis {
        /// Semiring name
        semiring: &'static str,
        /// Requested axis
        dim: isize,
        /// Rank of the value
        ndim: usize,
    },

    /// Reduction requested over the leading component axis of a composite value.
    #[error("{semiring}: dim {dim} is the component axis and cannot be reduced")]
    ComponentAxis {
        /// Semiring name
        semiring: &'static str,
        /// Requested axis
        dim: isize,
    },

    /// Operation intentionally left undefined for this semiring.
    #[error("{semiring}: `{op}` is not defined")]
    Unsupported {
        /// Semiring name
        semiring: &'static str,
        /// Operation name
        op: &'static str,
    },

    /// Input to `convert` has the wrong number of stacked streams.
    #[error("{semiring}: expected {expected} stacked potential streams, got {actual}")]
    ComponentCount {
        /// Semiring name
        semiring: &'static str,
        /// Expected leading length
        expected: usize,
        /// Actual leading length
        actual: usize,
    },

    /// Invalid semiring parameter (k, alpha).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration names a semiring that does not exist.
    #[error("Unknown semiring: {0}")]
    UnknownSemiring(String),
}
