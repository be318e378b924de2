//! OpenAI-style HTTP transport (Chat Completions + audio endpoints).

use std::sync::OnceLock;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::debug;

use crate::error::DroverError;
use crate::types::{AssistantReply, Message, ToolCall};

use super::{
    ChatTransport, CompletionRequest, ResponseFormat, SpeechRequest, StreamDelta,
    TranscribeRequest,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Build default headers for a Bearer-token API.
fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Parse an SSE "data:" line, returning None for "[DONE]".
fn parse_sse_data(line: &str) -> Option<&str> {
    let data = line.strip_prefix("data: ")?;
    if data == "[DONE]" {
        return None;
    }
    Some(data)
}

/// Transport speaking the OpenAI wire format.
pub struct OpenAiTransport {
    api_key: String,
    base_url: String,
}

impl OpenAiTransport {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn build_request_body(&self, request: &CompletionRequest, stream: bool) -> serde_json::Value {
        let messages = request
            .messages
            .iter()
            .map(message_to_wire)
            .collect::<Vec<_>>();

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
            "stream": stream,
        });

        let obj = body.as_object_mut().unwrap();

        if let Some(temp) = request.temperature {
            obj.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = request.top_p {
            obj.insert("top_p".into(), top_p.into());
        }

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let tool_defs: Vec<serde_json::Value> = tools
                    .iter()
                    .map(|t| {
                        serde_json::json!({
                            "type": "function",
                            "function": {
                                "name": t.name,
                                "description": t.description,
                                "parameters": t.parameters,
                            }
                        })
                    })
                    .collect();
                obj.insert("tools".into(), tool_defs.into());
                if let Some(ref choice) = request.tool_choice {
                    obj.insert("tool_choice".into(), choice.clone().into());
                }
            }
        }

        if let Some(ref fmt) = request.response_format {
            match fmt {
                ResponseFormat::JsonObject => {
                    obj.insert(
                        "response_format".into(),
                        serde_json::json!({"type": "json_object"}),
                    );
                }
                ResponseFormat::JsonSchema { schema, name } => {
                    obj.insert(
                        "response_format".into(),
                        serde_json::json!({
                            "type": "json_schema",
                            "json_schema": {
                                "name": name,
                                "schema": schema,
                                "strict": true,
                            }
                        }),
                    );
                }
                ResponseFormat::Text => {}
            }
        }

        body
    }
}

#[async_trait]
impl ChatTransport for OpenAiTransport {
    async fn create_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<AssistantReply, DroverError> {
        let body = self.build_request_body(request, false);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %request.model, "create_completion");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(DroverError::api(status, body_text));
        }

        let data: WireChatResponse = resp.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DroverError::api(200, "No choices in completion response"))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        Ok(AssistantReply {
            content: choice.message.content,
            tool_calls,
        })
    }

    async fn stream_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<BoxStream<'static, Result<StreamDelta, DroverError>>, DroverError> {
        let body = self.build_request_body(request, true);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %request.model, "stream_completion");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(DroverError::api(status, body_text));
        }

        let byte_stream = resp.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer = String::new();
            futures::pin_mut!(byte_stream);

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(DroverError::Network(e));
                        break;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim().to_string();
                    buffer = buffer[line_end + 1..].to_string();

                    if line.is_empty() || line.starts_with(':') {
                        continue;
                    }

                    if let Some(data) = parse_sse_data(&line) {
                        if let Ok(chunk) = serde_json::from_str::<WireStreamChunk>(data) {
                            if let Some(choice) = chunk.choices.into_iter().next() {
                                yield Ok(StreamDelta {
                                    text: choice.delta.content.unwrap_or_default(),
                                    finished: choice.finish_reason.is_some(),
                                });
                            }
                        }
                        // unparseable chunks are skipped
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }

    async fn speech(&self, request: &SpeechRequest) -> Result<Vec<u8>, DroverError> {
        let url = format!("{}/audio/speech", self.base_url);
        let body = serde_json::json!({
            "model": request.model,
            "voice": request.voice,
            "input": request.input,
            "response_format": request.format,
        });

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(DroverError::api(status, body_text));
        }

        Ok(resp.bytes().await?.to_vec())
    }

    async fn transcribe(&self, request: &TranscribeRequest) -> Result<String, DroverError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let part = reqwest::multipart::Part::bytes(request.audio.clone())
            .file_name(request.filename.clone());
        let form = reqwest::multipart::Form::new()
            .text("model", request.model.clone())
            .part("file", part);

        let mut headers = HeaderMap::new();
        if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, val);
        }

        let resp = shared_client()
            .post(&url)
            .headers(headers)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(DroverError::api(status, body_text));
        }

        let data: WireTranscription = resp.json().await?;
        Ok(data.text)
    }
}

fn message_to_wire(msg: &Message) -> serde_json::Value {
    if let Some(ref calls) = msg.tool_calls {
        let tc_json: Vec<serde_json::Value> = calls
            .iter()
            .map(|tc| {
                serde_json::json!({
                    "id": tc.id,
                    "type": "function",
                    "function": {
                        "name": tc.name,
                        "arguments": tc.arguments,
                    }
                })
            })
            .collect();
        return serde_json::json!({
            "role": msg.role.to_string(),
            "content": if msg.content.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::Value::String(msg.content.clone())
            },
            "tool_calls": tc_json,
        });
    }

    serde_json::json!({ "role": msg.role.to_string(), "content": msg.content })
}

// Wire response types (internal)

#[derive(Deserialize)]
struct WireChatResponse {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: Option<String>,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct WireStreamChunk {
    choices: Vec<WireStreamChoice>,
}

#[derive(Deserialize)]
struct WireStreamChoice {
    delta: WireStreamDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireStreamDelta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireTranscription {
    text: String,
}
