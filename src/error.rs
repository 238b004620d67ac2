use std::fmt;

/// Errors raised by the data container, the value model and the translator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    /// A path holds a value that cannot satisfy the requested shape, or a
    /// value could not be constructed from the supplied parts.
    #[error("invalid data at '{path}': {reason}")]
    InvalidData { path: String, reason: String },

    /// An argument was rejected before any mutation took place.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// A tree node could not be classified as a map, list, view or scalar.
    #[error("structurally ambiguous node at '{path}': {reason}")]
    StructuralAmbiguity { path: String, reason: String },
}

impl DataError {
    pub fn invalid_data(path: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::PreconditionViolation(reason.into())
    }

    pub fn ambiguity(path: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::StructuralAmbiguity {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

pub type DataResult<T> = Result<T, DataError>;
