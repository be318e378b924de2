//! Core types shared across the crate.

pub mod message;
pub mod run;

pub use self::message::{AssistantReply, Message, Role, ToolCall};
pub use self::run::RunOutput;
