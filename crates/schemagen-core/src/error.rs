use thiserror::Error;

/// Errors raised while loading axes or generating statements.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Malformed axis declarations or a clause that does not match the
    /// documented grammar. Authoring defect; never retried.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// A raw axis value cannot be coerced to the shape its axis expects.
    #[error("invalid value '{value}' for axis '{axis}': {reason}")]
    Format {
        axis: &'static str,
        value: String,
        reason: String,
    },
    /// A key clause names a key type outside the supported set.
    #[error("unsupported key type: {text}, expect one of {supported}")]
    UnsupportedKeyType { text: String, supported: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    pub fn format(axis: &'static str, value: &str, reason: impl Into<String>) -> Self {
        GenerationError::Format {
            axis,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for results returned by schemagen crates.
pub type Result<T> = std::result::Result<T, GenerationError>;
