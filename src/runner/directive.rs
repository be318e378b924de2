//! Single-pass directive classification.
//!
//! A reply is parsed into exactly one of the variants below, in the fixed
//! priority order: native tool call, inline tool tag, inline handoff tag,
//! plain text. A tool reference that does not resolve in the registry is
//! not a directive at all; the surrounding text falls through to the next
//! interpretation.

use std::sync::OnceLock;

use regex::Regex;

use crate::tools::ToolRegistry;
use crate::types::ToolCall;

/// Inline tool tag: `[[tool:<name> <optional-argument-text>]]`.
fn tool_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\[tool:(\w+)(?:\s+([^\]]+))?\]\]").unwrap())
}

/// Inline handoff tag: `[[handoff:<target>]]`.
fn handoff_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\[handoff:([^\]]+)\]\]").unwrap())
}

/// One interpretation of an assistant reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Structured tool call returned by the provider.
    NativeTool(ToolCall),
    /// Inline tag naming a registered tool.
    InlineTool { name: String, argument: String },
    /// Inline handoff tag; `target` is the captured text verbatim.
    Handoff { target: String },
    /// No directive; the text is terminal content (or a structured-output
    /// candidate).
    Text,
}

/// Classify one turn's reply.
///
/// `tool_calls` are the provider's native calls; `text` is the guarded
/// visible output.
pub fn classify(tool_calls: &[ToolCall], text: &str, registry: &ToolRegistry) -> Directive {
    if let Some(call) = tool_calls.first() {
        if registry.contains(&call.name) {
            return Directive::NativeTool(call.clone());
        }
    }

    if let Some(captures) = tool_tag().captures(text) {
        let name = captures[1].to_string();
        if registry.contains(&name) {
            return Directive::InlineTool {
                name,
                argument: captures
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            };
        }
    }

    if let Some(captures) = handoff_tag().captures(text) {
        return Directive::Handoff {
            target: captures[1].to_string(),
        };
    }

    Directive::Text
}
