//! Drover: agent orchestration for chat models.
//!
//! Drives multi-turn conversations against a chat-completions transport,
//! adding bounded tool invocation, single-hop agent handoff, guardrail
//! validation chains, structured-output convergence, and a tracing-span
//! protocol.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use drover::prelude::*;
//! use drover::transport::openai::OpenAiTransport;
//!
//! # async fn example() -> drover::error::Result<()> {
//! let transport = Arc::new(OpenAiTransport::new("sk-...", None));
//! let agent = Agent::new(transport, AgentOptions::default().with_model("gpt-4o"));
//! let mut runner = Runner::new(agent).with_max_turns(5);
//! let output = runner.run("Hello!").await?;
//! println!("{}", output.text);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod guardrail;
pub mod prelude;
pub mod runner;
pub mod tools;
pub mod trace;
pub mod transport;
pub mod types;
pub mod voice;
