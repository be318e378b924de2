//! Conversation agent: one persona's configuration plus its transcript.

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::debug;

use crate::config::DEFAULT_MODEL;
use crate::error::DroverError;
use crate::transport::{
    ChatTransport, CompletionRequest, ResponseFormat, StreamDelta, ToolDefinition,
};
use crate::types::{AssistantReply, Message};

use super::options::AgentOptions;

/// A conversational agent bound to a transport.
///
/// The transcript is append-only for the agent's lifetime. Deriving a
/// variant configuration goes through [`Agent::clone_with`]; an existing
/// transcript is never rewritten by a clone or handoff.
pub struct Agent {
    transport: Arc<dyn ChatTransport>,
    options: AgentOptions,
    messages: Vec<Message>,
}

impl Agent {
    /// Create an agent; the system prompt (when set) seeds the transcript.
    pub fn new(transport: Arc<dyn ChatTransport>, options: AgentOptions) -> Self {
        let mut messages = Vec::new();
        if let Some(ref prompt) = options.system_prompt {
            messages.push(Message::system(prompt.clone()));
        }
        Self {
            transport,
            options,
            messages,
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> Arc<dyn ChatTransport> {
        Arc::clone(&self.transport)
    }

    /// This agent's configuration.
    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    /// The accumulated transcript.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Derive a new agent on the same transport with deep-merged options
    /// and a fresh transcript.
    pub fn clone_with(&self, overrides: AgentOptions) -> Agent {
        let options = self.options.merged_with(&overrides);
        Agent::new(Arc::clone(&self.transport), options)
    }

    /// Produce the next assistant reply for `input`.
    ///
    /// The user message is appended before the call. Afterward the reply is
    /// echoed into the transcript only if it carries visible content; a pure
    /// tool invocation is recorded as a tool_calls payload instead, since
    /// the tool result becomes the next turn's input.
    pub async fn reply(
        &mut self,
        input: &str,
        tools: &[ToolDefinition],
        output_schema: Option<&serde_json::Value>,
    ) -> Result<AssistantReply, DroverError> {
        self.messages.push(Message::user(input));

        let request = self.build_request(tools, output_schema);

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = tools.len(),
            "agent reply"
        );

        let reply = self.transport.create_completion(&request).await?;

        if reply.has_content() {
            self.messages.push(Message::assistant(reply.text()));
        } else if !reply.tool_calls.is_empty() {
            self.messages
                .push(Message::assistant_tool_calls(reply.tool_calls.clone()));
        }

        Ok(reply)
    }

    /// Stream the next reply's text fragments.
    ///
    /// Raw pass-through: no tool or handoff resolution applies to streamed
    /// content, and the streamed text is not appended to the transcript.
    pub async fn reply_streamed(
        &mut self,
        input: &str,
    ) -> Result<BoxStream<'static, Result<String, DroverError>>, DroverError> {
        self.messages.push(Message::user(input));

        let request = self.build_request(&[], None);
        let stream = self.transport.stream_completion(&request).await?;

        Ok(stream
            .filter_map(|delta| async move {
                match delta {
                    Ok(StreamDelta { text, .. }) if text.is_empty() => None,
                    Ok(StreamDelta { text, .. }) => Some(Ok(text)),
                    Err(e) => Some(Err(e)),
                }
            })
            .boxed())
    }

    fn build_request(
        &self,
        tools: &[ToolDefinition],
        output_schema: Option<&serde_json::Value>,
    ) -> CompletionRequest {
        let mut request = CompletionRequest::new(
            self.options
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            self.messages.clone(),
        );
        request.temperature = self.options.temperature;
        request.top_p = self.options.top_p;

        if !tools.is_empty() {
            request.tools = Some(tools.to_vec());
            // One candidate action at a time; no parallel tool fan-out.
            request.tool_choice = Some("auto".to_string());
        }

        if output_schema.is_some() {
            // Satisfaction is checked by the Runner; this only hints the
            // transport toward machine-parseable output.
            request.response_format = Some(ResponseFormat::JsonObject);
        }

        request
    }
}
