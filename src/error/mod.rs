//! Error types for Drover.

use thiserror::Error;

/// Primary error type for all Drover operations.
#[derive(Error, Debug)]
pub enum DroverError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Guardrail(#[from] GuardrailError),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Tool execution error: {tool}: {message}")]
    ToolExecution { tool: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl DroverError {
    /// Create an API error from a status code and body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a tool execution error.
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Whether this error originated at the transport boundary.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api { .. } | Self::Stream(_))
    }
}

/// Which guardrail chain rejected the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum GuardrailStage {
    Input,
    Output,
}

/// A guardrail rejection. Aborts the entire run; never converted to a
/// turn continuation.
#[derive(Error, Debug, Clone)]
#[error("{stage} guardrail '{guard}' rejected content: {reason}")]
pub struct GuardrailError {
    pub stage: GuardrailStage,
    pub guard: String,
    pub reason: String,
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DroverError>;
