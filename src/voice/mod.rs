//! Voice pipeline: transcribe, reply, speak.

use std::sync::Arc;

use tracing::debug;

use crate::agent::Agent;
use crate::error::DroverError;
use crate::transport::{ChatTransport, SpeechRequest, TranscribeRequest};

/// Transcribes audio input, runs one agent reply, and synthesizes the reply
/// as speech.
pub struct VoicePipeline {
    transport: Arc<dyn ChatTransport>,
    agent: Agent,
    speech_model: String,
    voice: String,
    format: String,
}

impl VoicePipeline {
    pub fn new(transport: Arc<dyn ChatTransport>, agent: Agent) -> Self {
        Self {
            transport,
            agent,
            speech_model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            format: "mp3".to_string(),
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self
    }

    /// Run one audio exchange: audio in, synthesized reply audio out.
    pub async fn run(&mut self, audio: Vec<u8>, filename: &str) -> Result<Vec<u8>, DroverError> {
        let transcript = self
            .transport
            .transcribe(&TranscribeRequest::new(audio, filename))
            .await?;

        debug!(chars = transcript.len(), "transcribed audio input");

        let reply = self.agent.reply(&transcript, &[], None).await?;

        let mut request = SpeechRequest::new(reply.text());
        request.model = self.speech_model.clone();
        request.voice = self.voice.clone();
        request.format = self.format.clone();

        self.transport.speech(&request).await
    }
}
