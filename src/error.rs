//! Error taxonomy shared by the catalog, the aggregator and the compositor.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// Unknown dataset, variable or land cover class.
    #[error("not found: {0}")]
    NotFound(String),

    /// Out of range threshold, empty region selection and similar caller mistakes.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Remote source unreachable or payload malformed.
    #[error("fetch failed for `{key}`: {reason}")]
    Fetch { key: String, reason: String },
}

impl EngineError {
    pub fn fetch(key: impl Into<String>, reason: impl ToString) -> Self {
        EngineError::Fetch {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

// -- Tests -------------------------------------------------------------------
