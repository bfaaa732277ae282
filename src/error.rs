use thiserror::Error;

use crate::models::ClusterId;

/// Errors returned by the segment model and the dataset loaders.
#[derive(Debug, Error)]
pub enum Error {
    /// Input content failed to parse or failed structural validation.
    #[error("malformed input: {message}")]
    MalformedInput {
        /// Human-readable explanation, including the offending row where known.
        message: String,
    },

    /// A sample index or range bound falls outside the loaded signal.
    #[error("index {index} out of range for signal of {len} samples")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Number of samples in the signal.
        len: usize,
    },

    /// A boundary move would leave the donor segment below the minimum length.
    #[error(
        "segment for cluster {cluster_id} would be left with {remaining} samples (minimum {min})"
    )]
    MinSegmentLength {
        /// Cluster id of the donor segment.
        cluster_id: ClusterId,
        /// Samples the donor would keep if the move applied.
        remaining: usize,
        /// Configured minimum segment length.
        min: usize,
    },
}

/// Result type used by this crate's core operations.
pub type Result<T> = std::result::Result<T, Error>;
