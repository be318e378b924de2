//! Tools: trait, closure wrapper, and registry.

mod registry;
mod tool;

pub use self::registry::ToolRegistry;
pub use self::tool::{FnTool, Tool, ToolArguments};
