//! ToolExecutor - the tool set a pipeline stage may call

use std::collections::BTreeMap;
use tracing::debug;

use crate::llm::{ToolCall, ToolDefinition};

use super::builtin::{ListFilesTool, ReadFileTool};
use super::{Tool, ToolContext, ToolError, ToolResult};

/// Which repository tools a stage receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolProfile {
    /// List and read (repository analysis)
    #[default]
    Repository,
    /// Read only (code review)
    FilesOnly,
    /// No tools (writing and formatting)
    None,
}

/// Dispatches tool calls by name
pub struct ToolExecutor {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolExecutor {
    /// Create executor with the tools of a profile
    pub fn with_profile(profile: ToolProfile) -> Self {
        debug!(?profile, "ToolExecutor::with_profile: called");
        let mut executor = Self::empty();

        match profile {
            ToolProfile::Repository => {
                executor.add_tool(Box::new(ListFilesTool));
                executor.add_tool(Box::new(ReadFileTool));
            }
            ToolProfile::FilesOnly => {
                executor.add_tool(Box::new(ReadFileTool));
            }
            ToolProfile::None => {}
        }

        executor
    }

    pub fn empty() -> Self {
        Self { tools: BTreeMap::new() }
    }

    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        debug!(tool_name = %tool.name(), "ToolExecutor::add_tool: called");
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Tool definitions for the LLM, in name order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition::new(t.name(), t.description(), t.input_schema()))
            .collect()
    }

    /// Execute a tool call; unknown names yield an error result
    pub async fn execute(&self, tool_call: &ToolCall, ctx: &ToolContext) -> ToolResult {
        debug!(tool_name = %tool_call.name, tool_id = %tool_call.id, run_id = %ctx.run_id(), "ToolExecutor::execute: called");
        match self.tools.get(&tool_call.name) {
            Some(tool) => tool.execute(tool_call.input.clone(), ctx).await,
            None => ToolError::UnknownTool {
                name: tool_call.name.clone(),
            }
            .into_result(&tool_call.name),
        }
    }

    /// Execute tool calls one after another, in request order
    pub async fn execute_all(&self, tool_calls: &[ToolCall], ctx: &ToolContext) -> Vec<(String, ToolResult)> {
        debug!(count = %tool_calls.len(), "ToolExecutor::execute_all: called");
        let mut results = Vec::with_capacity(tool_calls.len());
        for call in tool_calls {
            let result = self.execute(call, ctx).await;
            results.push((call.id.clone(), result));
        }
        results
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repobrowser::BrowserConfig;
    use tempfile::tempdir;

    #[test]
    fn test_profiles() {
        let repo = ToolExecutor::with_profile(ToolProfile::Repository);
        assert_eq!(repo.tool_names(), vec!["list_files", "read_file"]);

        let files = ToolExecutor::with_profile(ToolProfile::FilesOnly);
        assert!(files.has_tool("read_file"));
        assert!(!files.has_tool("list_files"));

        let none = ToolExecutor::with_profile(ToolProfile::None);
        assert!(none.is_empty());
        assert!(none.definitions().is_empty());
    }

    #[test]
    fn test_definitions_carry_schema() {
        let executor = ToolExecutor::with_profile(ToolProfile::Repository);
        let defs = executor.definitions();

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "list_files");
        assert_eq!(defs[0].input_schema["required"][0], "directory");
        assert_eq!(defs[1].input_schema["required"][0], "file_path");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_result() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::from_config(BrowserConfig::new(temp.path())).unwrap();
        let executor = ToolExecutor::with_profile(ToolProfile::FilesOnly);

        let call = ToolCall {
            id: "toolu_1".to_string(),
            name: "list_files".to_string(),
            input: serde_json::json!({"directory": "."}),
        };
        let result = executor.execute(&call, &ctx).await;

        assert!(result.is_error);
        assert_eq!(result.content, "Error: Unknown tool: list_files");
    }

    #[tokio::test]
    async fn test_execute_all_preserves_order() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("a.txt"), "a").unwrap();
        let ctx = ToolContext::from_config(BrowserConfig::new(temp.path())).unwrap();
        let executor = ToolExecutor::with_profile(ToolProfile::Repository);

        let calls = vec![
            ToolCall {
                id: "1".to_string(),
                name: "read_file".to_string(),
                input: serde_json::json!({"file_path": "a.txt"}),
            },
            ToolCall {
                id: "2".to_string(),
                name: "read_file".to_string(),
                input: serde_json::json!({"file_path": "a.txt"}),
            },
        ];
        let results = executor.execute_all(&calls, &ctx).await;

        assert_eq!(results[0].0, "1");
        assert!(!results[0].1.content.contains("(cached)"));
        assert_eq!(results[1].0, "2");
        assert!(results[1].1.content.contains("(cached)"));
    }
}
