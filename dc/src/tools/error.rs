//! Tool error types

use repobrowser::BrowseError;
use thiserror::Error;

/// Errors raised while handling a tool call
///
/// Never crosses the tool boundary: [`ToolError::into_result`] turns it
/// into the text the LLM sees.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error(transparent)]
    Browse(#[from] BrowseError),
}

impl ToolError {
    /// Short kind label for structured logs
    pub fn kind(&self) -> String {
        match self {
            ToolError::InvalidArgument(_) => "invalid-argument".to_string(),
            ToolError::UnknownTool { .. } => "unknown-tool".to_string(),
            ToolError::Browse(err) => err.kind().to_string(),
        }
    }

    /// Render as an error tool result, logging the kind
    pub fn into_result(self, tool: &str) -> super::ToolResult {
        tracing::info!(tool, kind = %self.kind(), error = %self, "Tool call failed");
        super::ToolResult::error(format!("Error: {}", self))
    }
}
