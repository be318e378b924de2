//! The turn-loop orchestrator.
//!
//! `Runner` drives one logical conversation: per turn it guards the input,
//! asks the current agent for a reply, guards the output, mirrors the turn
//! to the tracing span, then classifies the reply into exactly one of the
//! continue/terminate transitions. The turn cap is a hard bound; when it is
//! reached the current text is returned as-is, even when a requested output
//! schema was never satisfied.
//!
//! One Runner instance drives one conversation. Concurrent reuse of a
//! single Runner is unsupported; create one Runner per concurrent
//! conversation.

pub mod directive;
pub mod schema;

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::BoxStream;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::agent::{Agent, AgentOptions};
use crate::config::DEFAULT_MAX_TURNS;
use crate::error::{DroverError, GuardrailStage};
use crate::guardrail::{self, Guardrail};
use crate::tools::{Tool, ToolArguments, ToolRegistry};
use crate::trace::{NoopTraceSink, SpanId, TraceSink};
use crate::types::RunOutput;

use self::directive::Directive;

/// Turn-loop orchestrator over a single agent conversation.
pub struct Runner {
    agent: Agent,
    max_turns: u32,
    tools: ToolRegistry,
    input_guards: Vec<Arc<dyn Guardrail>>,
    output_guards: Vec<Arc<dyn Guardrail>>,
    handoffs: HashMap<String, Agent>,
    output_schema: Option<serde_json::Value>,
    trace: Arc<dyn TraceSink>,
}

impl Runner {
    /// Create a runner for `agent`. The target output schema defaults to
    /// the agent's configured one.
    pub fn new(agent: Agent) -> Self {
        let output_schema = agent.options().output_schema.clone();
        Self {
            agent,
            max_turns: DEFAULT_MAX_TURNS,
            tools: ToolRegistry::new(),
            input_guards: Vec::new(),
            output_guards: Vec::new(),
            handoffs: HashMap::new(),
            output_schema,
            trace: Arc::new(NoopTraceSink),
        }
    }

    /// Set the turn cap.
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Register a tool.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.register(tool);
        self
    }

    /// Append an input guardrail.
    pub fn with_input_guardrail(mut self, guard: Arc<dyn Guardrail>) -> Self {
        self.input_guards.push(guard);
        self
    }

    /// Append an output guardrail.
    pub fn with_output_guardrail(mut self, guard: Arc<dyn Guardrail>) -> Self {
        self.output_guards.push(guard);
        self
    }

    /// Register a named handoff target.
    pub fn with_handoff(mut self, name: impl Into<String>, agent: Agent) -> Self {
        self.handoffs.insert(name.into(), agent);
        self
    }

    /// Set the target output schema.
    pub fn with_output_schema(mut self, schema: serde_json::Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Set the tracing sink.
    pub fn with_trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace = sink;
        self
    }

    /// The agent currently driving the conversation.
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Run to completion, starting from `message`.
    pub async fn run(&mut self, message: impl Into<String>) -> Result<RunOutput, DroverError> {
        let span = self.trace.start_span(
            "agent_run",
            json!({
                "max_turns": self.max_turns,
                "structured": self.output_schema.is_some(),
            }),
        );
        let result = self.drive(span, message.into()).await;
        self.trace.end_span(span);
        result
    }

    /// Run on a spawned task, returning a joinable handle.
    pub fn run_detached(mut self, message: impl Into<String>) -> RunHandle {
        let message = message.into();
        let task = tokio::spawn(async move { self.run(message).await });
        RunHandle { task }
    }

    /// Stream the reply to `message` as raw text fragments.
    ///
    /// Pass-through only: guardrails and directive parsing do not apply to
    /// streamed content.
    pub async fn run_streamed(
        &mut self,
        message: impl Into<String>,
    ) -> Result<BoxStream<'static, Result<String, DroverError>>, DroverError> {
        self.agent.reply_streamed(&message.into()).await
    }

    async fn drive(&mut self, span: SpanId, message: String) -> Result<RunOutput, DroverError> {
        let definitions = self.tools.definitions();
        let mut turn: u32 = 0;
        let mut input = message;
        let mut text = String::new();

        while turn < self.max_turns {
            input = match guardrail::run_chain(GuardrailStage::Input, &self.input_guards, input) {
                Ok(content) => content,
                Err(err) => {
                    self.trace
                        .record_event(span, json!({"turn": turn + 1, "error": err.to_string()}));
                    return Err(err.into());
                }
            };

            let reply = self
                .agent
                .reply(&input, &definitions, self.output_schema.as_ref())
                .await?;

            text = match guardrail::run_chain(
                GuardrailStage::Output,
                &self.output_guards,
                reply.text().to_string(),
            ) {
                Ok(content) => content,
                Err(err) => {
                    self.trace
                        .record_event(span, json!({"turn": turn + 1, "error": err.to_string()}));
                    return Err(err.into());
                }
            };

            self.trace.record_event(
                span,
                json!({
                    "turn": turn + 1,
                    "input": input.as_str(),
                    "output": text.as_str(),
                }),
            );

            match directive::classify(&reply.tool_calls, &text, &self.tools) {
                Directive::NativeTool(call) => {
                    debug!(tool = %call.name, turn, "native tool call");
                    input = self.invoke_tool(&call.name, &call.arguments).await?;
                    turn += 1;
                }
                Directive::InlineTool { name, argument } => {
                    debug!(tool = %name, turn, "inline tool tag");
                    input = self.invoke_tool(&name, &argument).await?;
                    turn += 1;
                }
                Directive::Handoff { target } => {
                    debug!(%target, turn, "handoff");
                    let next = self.resolve_handoff(&target);
                    self.agent = next;
                    // The new agent opens the exchange from its own system
                    // prompt; the prior input is not repeated.
                    input = String::new();
                    turn += 1;
                }
                Directive::Text => match self.output_schema.as_ref() {
                    Some(target) => {
                        if let Some(value) = schema::satisfies(target, &text) {
                            return Ok(RunOutput::structured(text, value, turn + 1));
                        }
                        debug!(turn, "output schema unsatisfied; retrying");
                        input = String::new();
                        turn += 1;
                    }
                    None => return Ok(RunOutput::text(text, turn + 1)),
                },
            }
        }

        // Cap reached: the cap wins over convergence.
        Ok(RunOutput::text(text, turn))
    }

    async fn invoke_tool(&self, name: &str, raw_argument: &str) -> Result<String, DroverError> {
        let Some(tool) = self.tools.get(name) else {
            // Classification only routes registered names here.
            return Err(DroverError::tool(name, "tool is not registered"));
        };

        let args = match tool.parameters() {
            Some(_) => match serde_json::from_str(raw_argument) {
                Ok(value) => ToolArguments::Json(value),
                // Undecodable argument text degrades to raw text.
                Err(_) => ToolArguments::Text(raw_argument.to_string()),
            },
            None => ToolArguments::Text(raw_argument.to_string()),
        };

        tool.invoke(args).await
    }

    fn resolve_handoff(&mut self, target: &str) -> Agent {
        if let Some(agent) = self.handoffs.remove(target) {
            return agent;
        }

        // Unmapped target: synthesize a fresh agent on the same transport,
        // with the captured text verbatim as its system prompt.
        let mut options = AgentOptions::default().with_system_prompt(target);
        options.output_schema = self.output_schema.clone();
        Agent::new(self.agent.transport(), options)
    }
}

/// Handle for a detached run. No mid-turn cancellation exists; the turn cap
/// is the only bound.
pub struct RunHandle {
    task: JoinHandle<Result<RunOutput, DroverError>>,
}

impl RunHandle {
    /// Block until the run completes.
    pub async fn wait(self) -> Result<RunOutput, DroverError> {
        self.task
            .await
            .map_err(|e| DroverError::Runtime(format!("detached run failed: {e}")))?
    }
}
