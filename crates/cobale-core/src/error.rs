use thiserror::Error;

#[derive(Debug, Error)]
pub enum CobaleError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic inconsistency: {0}")]
    ArithmeticInconsistency(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CobaleError {
    /// Shorthand for the most common rejection.
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CobaleError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CobaleError {
    fn from(e: serde_json::Error) -> Self {
        CobaleError::SerializationError(e.to_string())
    }
}
