//! Chat transport trait and request/response types.
//!
//! The transport is the only seam between the orchestration core and the
//! model provider's HTTP API. The core never retries transport failures;
//! they surface to the caller of `Runner::run` unmodified.

pub mod openai;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::DroverError;
use crate::types::{AssistantReply, Message};

/// A chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            top_p: None,
            tools: None,
            tool_choice: None,
            response_format: None,
        }
    }
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Requested response format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
    JsonSchema {
        schema: serde_json::Value,
        name: String,
    },
}

/// A delta emitted during streaming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamDelta {
    /// The incremental text chunk.
    pub text: String,
    /// True on the final delta.
    #[serde(default)]
    pub finished: bool,
}

/// A text-to-speech request.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub model: String,
    pub voice: String,
    pub input: String,
    pub format: String,
}

impl SpeechRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            input: input.into(),
            format: "mp3".to_string(),
        }
    }
}

/// A speech-to-text request.
#[derive(Debug, Clone)]
pub struct TranscribeRequest {
    pub model: String,
    pub audio: Vec<u8>,
    pub filename: String,
}

impl TranscribeRequest {
    pub fn new(audio: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            model: "whisper-1".to_string(),
            audio,
            filename: filename.into(),
        }
    }
}

/// The model-provider collaborator.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Produce one assistant reply for the accumulated messages.
    async fn create_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<AssistantReply, DroverError>;

    /// Stream incremental reply fragments as they arrive.
    async fn stream_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<BoxStream<'static, Result<StreamDelta, DroverError>>, DroverError>;

    /// Synthesize speech for the given text.
    async fn speech(&self, request: &SpeechRequest) -> Result<Vec<u8>, DroverError>;

    /// Transcribe audio to text.
    async fn transcribe(&self, request: &TranscribeRequest) -> Result<String, DroverError>;
}
