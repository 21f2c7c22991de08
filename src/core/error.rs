use std::io;
use thiserror::Error;

/// Unified error type for the coding assistant
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Completion provider answered with a non-success status
    #[error("API error: {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never produced a usable response
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Speech recognizer failures
    #[error("Dictation error: {0}")]
    Dictation(String),
}

impl AssistantError {
    /// HTTP-style status for provider failures, if the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AssistantError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            AssistantError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_timeout() {
            AssistantError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            AssistantError::Network(format!("Connection failed: {}", err))
        } else {
            AssistantError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(err: serde_json::Error) -> Self {
        AssistantError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for AssistantError {
    fn from(err: serde_yml::Error) -> Self {
        AssistantError::Serialization(format!("YAML error: {}", err))
    }
}

impl From<rustyline::error::ReadlineError> for AssistantError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        AssistantError::Input(format!("Line editor error: {}", err))
    }
}
