//! Tool Registry — stores and retrieves tool definitions

use std::collections::HashMap;
use tracing::info;

use crate::proto::tools::ToolDefinition;

/// In-memory tool registry
pub struct Registry {
    tools: HashMap<String, ToolDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool definition
    pub fn register_tool(&mut self, tool: ToolDefinition) {
        info!("Registered tool: {} (ns: {})", tool.name, tool.namespace);
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<ToolDefinition> {
        self.tools.get(name).cloned()
    }

    /// List tools, optionally filtered by namespace
    pub fn list_tools(&self, namespace: &str) -> Vec<ToolDefinition> {
        if namespace.is_empty() {
            self.tools.values().cloned().collect()
        } else {
            self.tools
                .values()
                .filter(|t| t.namespace == namespace)
                .cloned()
                .collect()
        }
    }

    /// Get total tool count
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to create a ToolDefinition
pub fn make_tool(
    name: &str,
    namespace: &str,
    description: &str,
    input_schema: Vec<u8>,
    risk_level: &str,
    requires_confirmation: bool,
    idempotent: bool,
    timeout_ms: i32,
) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        namespace: namespace.to_string(),
        version: "1.0.0".to_string(),
        description: description.to_string(),
        input_schema,
        risk_level: risk_level.to_string(),
        requires_confirmation,
        idempotent,
        timeout_ms,
    }
}
