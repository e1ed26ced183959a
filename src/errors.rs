// src/errors.rs
use thiserror::Error;

pub const RETRIES_EXHAUSTED_MESSAGE: &str = "Failed to connect to the LLM after multiple retries.";
pub const MALFORMED_RESPONSE_MESSAGE: &str = "LLM response was empty or malformed.";
pub const CANCELLED_MESSAGE: &str = "Evaluation was interrupted before it finished.";
pub const UNPARSEABLE_RESPONSE_MESSAGE: &str =
    "LLM returned an unparseable response. Try modifying your prompt.";

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to parse JSON config: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Response body is not valid JSON: {0}")]
    InvalidBody(String),

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<EvalError>,
    },

    #[error("Unexpected response structure: {0}")]
    MalformedResponse(String),

    #[error("Could not extract text from candidate: {0}")]
    UnparseableResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EvalError {
    /// Transport failures and non-success statuses are worth another attempt.
    /// Anything that came back with a success status is final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EvalError::Request(_) | EvalError::ApiError { .. })
    }

    /// The message shown in the error panel.
    pub fn user_message(&self) -> String {
        match self {
            EvalError::RetriesExhausted { .. } | EvalError::Request(_) | EvalError::ApiError { .. } => {
                RETRIES_EXHAUSTED_MESSAGE.to_string()
            }
            EvalError::MalformedResponse(_) => MALFORMED_RESPONSE_MESSAGE.to_string(),
            EvalError::UnparseableResponse(_) | EvalError::InvalidBody(_) => {
                UNPARSEABLE_RESPONSE_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_and_status_errors_retry() {
        let status = EvalError::ApiError { status: 503, body: "busy".to_string() };
        assert!(status.is_retryable());
        assert!(!EvalError::InvalidBody("eof".to_string()).is_retryable());
        assert!(!EvalError::MalformedResponse("{}".to_string()).is_retryable());
        assert!(!EvalError::Config("bad".to_string()).is_retryable());
    }

    #[test]
    fn user_messages_follow_the_taxonomy() {
        let exhausted = EvalError::RetriesExhausted {
            attempts: 5,
            last: Box::new(EvalError::ApiError { status: 500, body: String::new() }),
        };
        assert_eq!(exhausted.user_message(), RETRIES_EXHAUSTED_MESSAGE);
        assert!(exhausted.to_string().contains("5 attempts"));
        assert_eq!(
            EvalError::MalformedResponse("{}".to_string()).user_message(),
            MALFORMED_RESPONSE_MESSAGE
        );
        assert_eq!(
            EvalError::InvalidBody("expected value".to_string()).user_message(),
            UNPARSEABLE_RESPONSE_MESSAGE
        );
    }
}
