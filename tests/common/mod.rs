//! Shared test helpers and mock transport.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::BoxStream;

use drover::error::DroverError;
use drover::transport::{
    ChatTransport, CompletionRequest, SpeechRequest, StreamDelta, TranscribeRequest,
};
use drover::types::{AssistantReply, ToolCall};

/// A mock transport that returns queued replies and captures requests.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<Vec<QueuedReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
    transcripts: Mutex<Vec<String>>,
    speech_requests: Mutex<Vec<SpeechRequest>>,
}

enum QueuedReply {
    Reply(AssistantReply),
    Error(DroverError),
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain text reply.
    pub fn queue_text(&self, text: &str) {
        self.replies
            .lock()
            .unwrap()
            .push(QueuedReply::Reply(AssistantReply {
                content: Some(text.to_string()),
                tool_calls: vec![],
            }));
    }

    /// Queue a reply carrying one native tool call and no visible content.
    pub fn queue_tool_call(&self, id: &str, name: &str, arguments: &str) {
        self.replies
            .lock()
            .unwrap()
            .push(QueuedReply::Reply(AssistantReply {
                content: None,
                tool_calls: vec![ToolCall {
                    id: Some(id.to_string()),
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                }],
            }));
    }

    /// Queue an arbitrary reply.
    pub fn queue_reply(&self, reply: AssistantReply) {
        self.replies.lock().unwrap().push(QueuedReply::Reply(reply));
    }

    /// Queue a transport failure.
    pub fn queue_error(&self, status: u16, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push(QueuedReply::Error(DroverError::api(status, message)));
    }

    /// Queue a transcription result.
    pub fn queue_transcript(&self, text: &str) {
        self.transcripts.lock().unwrap().push(text.to_string());
    }

    /// All captured completion requests.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// All captured speech requests.
    pub fn speech_requests(&self) -> Vec<SpeechRequest> {
        self.speech_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn create_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<AssistantReply, DroverError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Ok(AssistantReply {
                content: Some("Mock reply".to_string()),
                tool_calls: vec![],
            });
        }
        match replies.remove(0) {
            QueuedReply::Reply(reply) => Ok(reply),
            QueuedReply::Error(err) => Err(err),
        }
    }

    async fn stream_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<BoxStream<'static, Result<StreamDelta, DroverError>>, DroverError> {
        self.requests.lock().unwrap().push(request.clone());
        let text = {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                "Mock streamed reply".to_string()
            } else {
                match replies.remove(0) {
                    QueuedReply::Reply(reply) => reply.content.unwrap_or_default(),
                    QueuedReply::Error(err) => return Err(err),
                }
            }
        };

        let stream = async_stream::stream! {
            for chunk in text.chars().collect::<Vec<_>>().chunks(5) {
                let text: String = chunk.iter().collect();
                yield Ok(StreamDelta { text, finished: false });
            }
            yield Ok(StreamDelta { text: String::new(), finished: true });
        };

        Ok(Box::pin(stream))
    }

    async fn speech(&self, request: &SpeechRequest) -> Result<Vec<u8>, DroverError> {
        self.speech_requests.lock().unwrap().push(request.clone());
        Ok(b"audio-data".to_vec())
    }

    async fn transcribe(&self, _request: &TranscribeRequest) -> Result<String, DroverError> {
        let mut transcripts = self.transcripts.lock().unwrap();
        if transcripts.is_empty() {
            Ok(String::new())
        } else {
            Ok(transcripts.remove(0))
        }
    }
}
