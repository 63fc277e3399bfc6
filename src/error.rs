use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Errors returned by clustering and validity routines in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A mean or clustering was requested over zero vectors.
    #[error("empty input")]
    EmptyInput,

    /// Requested cluster count is outside `0 < k < n`.
    #[error("invalid cluster count: requested {k}, but dataset has {n_items} items")]
    InvalidK {
        /// Requested number of clusters.
        k: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Two vectors of different length were compared.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// Two label sequences that must be parallel have different lengths.
    #[error("label length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// Length of the ground-truth labels.
        expected: usize,
        /// Length of the predicted labels.
        found: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// A cell could not be parsed by the data-loading collaborator.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<ParseFloatError> for Error {
    fn from(e: ParseFloatError) -> Self {
        Error::Parse(e.to_string())
    }
}

impl From<ParseIntError> for Error {
    fn from(e: ParseIntError) -> Self {
        Error::Parse(e.to_string())
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
