use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetireError {
    /// A flag or payload field failed validation.
    #[error("{0}")]
    InvalidInput(String),

    #[error("invalid date for {field}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RetireError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
