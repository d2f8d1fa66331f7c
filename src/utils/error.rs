use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{message}")]
    BadInput { message: String },

    #[error("HTTP status {status}; body: {body}")]
    RemoteError { status: u16, body: String },

    #[error("Failed to decode bid response: {0}")]
    DecodeError(#[source] serde_json::Error),

    #[error("Bad server response: {message}")]
    BadServerResponse { message: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    #[error("Bid request task failed: {message}")]
    TaskFailed { message: String },

    #[error("Failed to encode bid request: {0}")]
    SerializationError(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl AdapterError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn bad_input(message: impl Into<String>) -> Self {
        Self::BadInput {
            message: message.into(),
        }
    }

    pub fn bad_server_response(message: impl Into<String>) -> Self {
        Self::BadServerResponse {
            message: message.into(),
        }
    }

    pub fn is_bad_input(&self) -> bool {
        matches!(self, Self::BadInput { .. })
    }

    /// Connection, timeout and cancellation failures of a single call.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Cancelled | Self::DeadlineExceeded
        )
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_message_embeds_status_and_body() {
        let err = AdapterError::RemoteError {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP status 500; body: boom");
    }

    #[test]
    fn test_error_classification() {
        assert!(AdapterError::bad_input("No supported impressions").is_bad_input());
        assert!(!AdapterError::invalid_input("x").is_bad_input());
        assert!(AdapterError::Cancelled.is_transport());
        assert!(AdapterError::DeadlineExceeded.is_transport());
        assert!(!AdapterError::bad_server_response("x").is_transport());
    }
}
