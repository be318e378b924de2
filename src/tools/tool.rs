//! Tool trait, arguments, and the closure-based tool wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DroverError;

/// Arguments handed to a tool at invocation time.
///
/// Schema-bearing tools receive `Json` when the model's argument text parses;
/// on parse failure the raw text is passed through unparsed rather than
/// aborting the turn. Untyped tools always receive `Text`.
#[derive(Debug, Clone)]
pub enum ToolArguments {
    Text(String),
    Json(serde_json::Value),
}

impl ToolArguments {
    /// The arguments as raw text (JSON values are re-serialized).
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(raw) => raw.clone(),
            Self::Json(value) => match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        }
    }

    /// The parsed JSON value, if any.
    pub fn json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, DroverError> {
        self.json()
            .and_then(|v| v.get(key))
            .and_then(|v| v.as_str())
            .ok_or_else(|| DroverError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an integer argument by key.
    pub fn get_i64(&self, key: &str) -> Result<i64, DroverError> {
        self.json()
            .and_then(|v| v.get(key))
            .and_then(|v| v.as_i64())
            .ok_or_else(|| DroverError::InvalidArgument(format!("Missing integer argument: {key}")))
    }

    /// Get a boolean argument by key.
    pub fn get_bool(&self, key: &str) -> Result<bool, DroverError> {
        self.json()
            .and_then(|v| v.get(key))
            .and_then(|v| v.as_bool())
            .ok_or_else(|| DroverError::InvalidArgument(format!("Missing boolean argument: {key}")))
    }
}

/// Core tool trait. Implement to expose an invocable action to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (unique within a registry).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema for arguments. `None` marks an untyped text tool, which
    /// is reachable only through inline tags and is never offered to the
    /// model as a function definition.
    fn parameters(&self) -> Option<&serde_json::Value>;

    /// Execute the tool. The returned text becomes the next turn's input.
    async fn invoke(&self, args: ToolArguments) -> Result<String, DroverError>;
}

/// Type alias for the tool handler function.
type ToolHandler = dyn Fn(ToolArguments) -> Pin<Box<dyn Future<Output = Result<String, DroverError>> + Send>>
    + Send
    + Sync;

/// Closure-based tool for quick tool creation.
pub struct FnTool {
    name: String,
    description: String,
    parameters: Option<serde_json::Value>,
    handler: Arc<ToolHandler>,
}

impl FnTool {
    /// Create an untyped text tool.
    pub fn text<F, Fut>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, DroverError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: None,
            handler: Arc::new(move |args| Box::pin(handler(args))),
        }
    }

    /// Create a schema-bearing tool.
    pub fn typed<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, DroverError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Some(parameters),
            handler: Arc::new(move |args| Box::pin(handler(args))),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Option<&serde_json::Value> {
        self.parameters.as_ref()
    }

    async fn invoke(&self, args: ToolArguments) -> Result<String, DroverError> {
        (self.handler)(args).await
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("typed", &self.parameters.is_some())
            .finish()
    }
}
