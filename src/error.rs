use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    // Rejected by the forum API; carries the body's `message` when it had one
    #[error("Remote error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Remote {
        status: u16,
        message: Option<String>,
    },

    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Message suitable for display in a state error slot.
    ///
    /// Remote rejections surface the API's own message; everything else
    /// (transport failures, missing message) falls back to the per-operation
    /// default.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Remote {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            AppError::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// Validation helper
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut error_messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    format!(
                        "{}: {}",
                        field,
                        error.message.as_ref().unwrap_or(&"Invalid value".into())
                    )
                })
            })
            .collect();
        error_messages.sort();

        AppError::Validation(error_messages.join(", "))
    }
}
