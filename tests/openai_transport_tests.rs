//! Wire-level tests for the OpenAI transport against a mock HTTP server.

use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drover::error::DroverError;
use drover::transport::openai::OpenAiTransport;
use drover::transport::{
    ChatTransport, CompletionRequest, ResponseFormat, SpeechRequest, ToolDefinition,
    TranscribeRequest,
};
use drover::types::Message;

fn transport_for(server: &MockServer) -> OpenAiTransport {
    OpenAiTransport::new("test-key", Some(server.uri()))
}

#[tokio::test]
async fn completion_sends_expected_body_and_parses_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "stream": false,
            "temperature": 0.3,
            "messages": [{"role": "user", "content": "hi"}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "hello"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = CompletionRequest::new("gpt-4o", vec![Message::user("hi")]);
    request.temperature = Some(0.3);

    let reply = transport_for(&server)
        .create_completion(&request)
        .await
        .unwrap();

    assert_eq!(reply.text(), "hello");
    assert!(reply.tool_calls.is_empty());
}

#[tokio::test]
async fn completion_parses_native_tool_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "tools": [{"type": "function", "function": {"name": "lookup"}}],
            "tool_choice": "auto",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "lookup", "arguments": "{\"q\":\"x\"}"}
                }]
            }}]
        })))
        .mount(&server)
        .await;

    let mut request = CompletionRequest::new("gpt-4o", vec![Message::user("find x")]);
    request.tools = Some(vec![ToolDefinition {
        name: "lookup".into(),
        description: "Look things up".into(),
        parameters: json!({"type": "object"}),
    }]);
    request.tool_choice = Some("auto".into());

    let reply = transport_for(&server)
        .create_completion(&request)
        .await
        .unwrap();

    assert!(!reply.has_content());
    assert_eq!(reply.tool_calls.len(), 1);
    assert_eq!(reply.tool_calls[0].name, "lookup");
    assert_eq!(reply.tool_calls[0].arguments, "{\"q\":\"x\"}");
}

#[tokio::test]
async fn json_object_hint_is_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "response_format": {"type": "json_object"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "{}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = CompletionRequest::new("gpt-4o", vec![Message::user("hi")]);
    request.response_format = Some(ResponseFormat::JsonObject);

    transport_for(&server)
        .create_completion(&request)
        .await
        .unwrap();
}

#[tokio::test]
async fn non_200_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let request = CompletionRequest::new("gpt-4o", vec![Message::user("hi")]);
    let err = transport_for(&server)
        .create_completion(&request)
        .await
        .unwrap_err();

    match err {
        DroverError::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "rate limited");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn stream_parses_sse_deltas() {
    let server = MockServer::start().await;

    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
        "data: [DONE]\n\n",
    );

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let request = CompletionRequest::new("gpt-4o", vec![Message::user("hi")]);
    let stream = transport_for(&server)
        .stream_completion(&request)
        .await
        .unwrap();

    let deltas: Vec<_> = stream.map(|d| d.unwrap()).collect().await;

    let text: String = deltas.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(text, "Hello");
    assert!(deltas.last().unwrap().finished);
}

#[tokio::test]
async fn speech_returns_audio_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .and(body_partial_json(json!({
            "model": "tts-1",
            "voice": "alloy",
            "input": "hello",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"mp3-bytes".to_vec(), "audio/mpeg"),
        )
        .mount(&server)
        .await;

    let audio = transport_for(&server)
        .speech(&SpeechRequest::new("hello"))
        .await
        .unwrap();

    assert_eq!(audio, b"mp3-bytes".to_vec());
}

#[tokio::test]
async fn transcribe_parses_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "hello world"})))
        .mount(&server)
        .await;

    let text = transport_for(&server)
        .transcribe(&TranscribeRequest::new(b"wav".to_vec(), "in.wav"))
        .await
        .unwrap();

    assert_eq!(text, "hello world");
}
