//! Tool registry: name → invocable action.

use std::collections::HashMap;
use std::sync::Arc;

use crate::transport::ToolDefinition;

use super::tool::Tool;

/// Registry mapping tool names to actions.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name. A later registration replaces an
    /// earlier one with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Whether a name resolves to a registered tool.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions for the schema-bearing tools, for the transport call.
    ///
    /// Untyped text tools are reachable only via inline tags and are not
    /// advertised to the model.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self
            .tools
            .values()
            .filter_map(|tool| {
                tool.parameters().map(|schema| ToolDefinition {
                    name: tool.name().to_string(),
                    description: tool.description().to_string(),
                    parameters: schema.clone(),
                })
            })
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tool::FnTool;
    use serde_json::json;

    #[test]
    fn definitions_exclude_untyped_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FnTool::text("echo", "Echo", |args| async move {
            Ok(args.as_text())
        })));
        registry.register(Arc::new(FnTool::typed(
            "add",
            "Add two numbers",
            json!({"type": "object", "properties": {"a": {"type": "number"}, "b": {"type": "number"}}, "required": ["a", "b"]}),
            |args| async move { Ok((args.get_i64("a")? + args.get_i64("b")?).to_string()) },
        )));

        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "add");
        assert!(registry.contains("echo"));
    }

    #[test]
    fn unknown_name_does_not_resolve() {
        let registry = ToolRegistry::new();
        assert!(registry.get("missing").is_none());
    }
}
