//! Agent configuration and deep-override merging.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration for one agent persona.
///
/// Immutable once the Agent is constructed; a changed configuration means
/// deriving a new Agent via [`crate::agent::Agent::clone_with`], never
/// mutating in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentOptions {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub system_prompt: Option<String>,
    /// Target output schema (opaque JSON-Schema-like structure).
    pub output_schema: Option<Value>,
    /// Opaque key→value map passed through to callers, never interpreted
    /// by the core.
    #[serde(default)]
    pub context: Map<String, Value>,
}

impl AgentOptions {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_maybe_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_maybe_top_p(mut self, top_p: Option<f64>) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn with_context_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Merge `overrides` over these options.
    ///
    /// Scalar override keys win; the `context` maps merge key-by-key,
    /// recursively, so a nested override replaces only the keys it names.
    pub fn merged_with(&self, overrides: &AgentOptions) -> AgentOptions {
        let mut context = Value::Object(self.context.clone());
        deep_merge(&mut context, Value::Object(overrides.context.clone()));

        AgentOptions {
            model: overrides.model.clone().or_else(|| self.model.clone()),
            temperature: overrides.temperature.or(self.temperature),
            top_p: overrides.top_p.or(self.top_p),
            system_prompt: overrides
                .system_prompt
                .clone()
                .or_else(|| self.system_prompt.clone()),
            output_schema: overrides
                .output_schema
                .clone()
                .or_else(|| self.output_schema.clone()),
            context: match context {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }
}

/// Recursive key-by-key merge of `overlay` into `base`.
///
/// Object values merge per key (overlay keys win, nested objects recurse);
/// any other pairing replaces `base` wholesale.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_value) if base_value.is_object() && overlay_value.is_object() => {
                        deep_merge(base_value, overlay_value);
                    }
                    _ => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
        }
        (base_slot, overlay_value) => *base_slot = overlay_value,
    }
}
