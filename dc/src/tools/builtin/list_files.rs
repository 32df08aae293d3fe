//! list_files tool - recursive listing with ignored directory names pruned

use async_trait::async_trait;
use repobrowser::IgnoreSet;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::parse_args;
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Arguments accepted by `list_files`
#[derive(Debug, Clone, Deserialize)]
pub struct ListFilesArgs {
    /// Directory to list, relative to the repository root or absolute inside it
    pub directory: String,

    /// Directory names to prune; the run's configured set when absent
    #[serde(default, alias = "ignoreDirs")]
    pub ignore_dirs: Option<Vec<String>>,
}

/// Recursively list every file below a directory
pub struct ListFilesTool;

impl ListFilesTool {
    async fn list(&self, args: ListFilesArgs, ctx: &ToolContext) -> Result<String, ToolError> {
        let browser = ctx.browser().lock().await;
        let files = match args.ignore_dirs {
            Some(names) => browser.list(&args.directory, &IgnoreSet::from_names(names))?,
            None => browser.list(&args.directory, browser.ignore_dirs())?,
        };
        debug!(directory = %args.directory, count = files.len(), "ListFilesTool::list: listed");
        Ok(render(&files))
    }
}

fn render(files: &[String]) -> String {
    if files.is_empty() {
        return "File paths: (none)".to_string();
    }
    format!("File paths: \n- {}", files.join("\n- "))
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &'static str {
        "list_files"
    }

    fn description(&self) -> &'static str {
        "Recursively list every file under a directory of the repository. Directories named in \
         ignore_dirs are skipped at any depth; when omitted, the configured ignore list applies."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Directory to list, relative to the repository root"
                },
                "ignore_dirs": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Directory names to skip (e.g. .git, node_modules)"
                }
            },
            "required": ["directory"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "ListFilesTool::execute: called");
        let result = match parse_args::<ListFilesArgs>(input) {
            Ok(args) => self.list(args, ctx).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(text) => ToolResult::success(text),
            Err(e) => e.into_result(self.name()),
        }
    }
}
