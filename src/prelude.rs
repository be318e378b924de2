//! Convenience re-exports for common use.

pub use crate::agent::{Agent, AgentManager, AgentOptions};
pub use crate::config::DroverConfig;
pub use crate::error::{DroverError, GuardrailError, GuardrailStage, Result};
pub use crate::guardrail::{FnGuardrail, Guardrail, GuardrailViolation};
pub use crate::runner::{RunHandle, Runner};
pub use crate::tools::{FnTool, Tool, ToolArguments, ToolRegistry};
pub use crate::trace::{MemoryTraceSink, NoopTraceSink, ProcessorTraceSink, TraceSink};
pub use crate::transport::{ChatTransport, CompletionRequest, StreamDelta, ToolDefinition};
pub use crate::types::{AssistantReply, Message, Role, RunOutput, ToolCall};
