use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgriLoanError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AgriLoanError {
    fn from(e: serde_json::Error) -> Self {
        AgriLoanError::SerializationError(e.to_string())
    }
}
