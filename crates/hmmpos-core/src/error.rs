use thiserror::Error;

/// Errors that can occur during HMM estimation, decoding, and persistence.
#[derive(Debug, Error)]
pub enum HmmError {
    /// The caller supplied unusable input (empty corpus, empty sentence,
    /// empty token sequence, bad configuration).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The parameter set is missing a table or its tables disagree with the
    /// tagset / vocabulary dimensions.
    #[error("malformed model: {0}")]
    ModelError(String),

    /// A probability row does not sum to one after normalization.
    #[error("{table} row {row} sums to {sum}, expected 1.0")]
    NumericDegeneracy {
        /// Which table the row belongs to.
        table: &'static str,
        /// Row index (tag index; 0 for the initial distribution).
        row: usize,
        /// The offending sum.
        sum: f64,
    },

    /// Reading or writing a stored model failed.
    #[error("model store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored model could not be encoded or decoded.
    #[error("model serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A tokenizer pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for hmmpos operations.
pub type Result<T> = std::result::Result<T, HmmError>;
