//! Run result types.

use serde::{Deserialize, Serialize};

/// Final result of a run.
///
/// `structured` is populated only when an output schema was configured and
/// the final reply satisfied it; a run that hits the turn cap returns the
/// raw text unconverted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<serde_json::Value>,
    pub turns: u32,
}

impl RunOutput {
    pub fn text(text: impl Into<String>, turns: u32) -> Self {
        Self {
            text: text.into(),
            structured: None,
            turns,
        }
    }

    pub fn structured(text: impl Into<String>, value: serde_json::Value, turns: u32) -> Self {
        Self {
            text: text.into(),
            structured: Some(value),
            turns,
        }
    }

    /// Whether the run converged on the requested output shape.
    pub fn is_structured(&self) -> bool {
        self.structured.is_some()
    }
}
