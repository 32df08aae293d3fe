//! read_file tool - sandboxed, size-limited, cached file reads

use async_trait::async_trait;
use repobrowser::Encoding;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::parse_args;
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Arguments accepted by `read_file`
#[derive(Debug, Clone, Deserialize)]
pub struct ReadFileArgs {
    #[serde(alias = "filePath")]
    pub file_path: String,

    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    Encoding::default().label().to_string()
}

/// Read a repository file as text
pub struct ReadFileTool;

impl ReadFileTool {
    async fn read(&self, args: ReadFileArgs, ctx: &ToolContext) -> Result<String, ToolError> {
        let encoding: Encoding = args
            .encoding
            .parse()
            .map_err(|e: repobrowser::UnsupportedEncoding| ToolError::InvalidArgument(e.to_string()))?;

        let file = ctx.browser().lock().await.read(&args.file_path, encoding)?;
        debug!(path = %file.path.display(), cached = file.cached, "ReadFileTool::read: read");

        let marker = if file.cached { " (cached)" } else { "" };
        Ok(format!("Content of {}{}:\n\n{}", file.path.display(), marker, file.content))
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        "Read the full text of a file in the repository. Provide the path relative to the repository \
         root. Optionally pass an encoding (utf-8, ascii, latin-1, utf-16, utf-16le, utf-16be)."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "File path relative to the repository root"
                },
                "encoding": {
                    "type": "string",
                    "description": "Text encoding (default: utf-8)"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "ReadFileTool::execute: called");
        let result = match parse_args::<ReadFileArgs>(input) {
            Ok(args) => self.read(args, ctx).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(text) => ToolResult::success(text),
            Err(e) => e.into_result(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repobrowser::BrowserConfig;
    use std::fs;
    use tempfile::tempdir;

    fn setup(max_file_size: u64) -> (tempfile::TempDir, ToolContext) {
        let temp = tempdir().unwrap();
        let repo = temp.path().join("repo");
        fs::create_dir_all(repo.join("src")).unwrap();
        fs::write(repo.join("src/a.py"), "print('a')\n").unwrap();
        fs::write(repo.join("latin.txt"), [b'c', b'a', b'f', 0xE9]).unwrap();
        fs::write(temp.path().join("secret.txt"), "hunter2").unwrap();
        let ctx = ToolContext::from_config(BrowserConfig::new(&repo).with_max_file_size(max_file_size)).unwrap();
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_read_returns_header_and_content() {
        let (_temp, ctx) = setup(1024);

        let result = ReadFileTool
            .execute(serde_json::json!({"file_path": "src/a.py"}), &ctx)
            .await;

        let expected = format!("Content of {}:\n\nprint('a')\n", ctx.root().join("src/a.py").display());
        assert!(!result.is_error);
        assert_eq!(result.content, expected);
    }

    #[tokio::test]
    async fn test_second_read_is_marked_cached() {
        let (_temp, ctx) = setup(1024);
        let input = serde_json::json!({"filePath": "src/a.py", "encoding": "UTF-8"});

        ReadFileTool.execute(input.clone(), &ctx).await;
        let result = ReadFileTool.execute(input, &ctx).await;

        assert!(result.content.contains("(cached):\n\n"));
    }

    #[tokio::test]
    async fn test_read_escape_is_error_text() {
        let (_temp, ctx) = setup(1024);

        let result = ReadFileTool
            .execute(serde_json::json!({"file_path": "../secret.txt"}), &ctx)
            .await;

        assert!(result.is_error);
        assert!(result.content.starts_with("Error: Access denied."));
        assert!(!result.content.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_read_decode_error_then_correct_encoding() {
        let (_temp, ctx) = setup(1024);

        let result = ReadFileTool
            .execute(serde_json::json!({"file_path": "latin.txt"}), &ctx)
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("Try a different encoding"));

        let result = ReadFileTool
            .execute(serde_json::json!({"file_path": "latin.txt", "encoding": "latin-1"}), &ctx)
            .await;
        assert!(!result.is_error);
        assert!(result.content.ends_with("café"));
    }

    #[tokio::test]
    async fn test_read_too_large() {
        let (_temp, ctx) = setup(4);

        let result = ReadFileTool
            .execute(serde_json::json!({"file_path": "src/a.py"}), &ctx)
            .await;

        assert!(result.is_error);
        assert!(result.content.contains("exceeds the maximum allowed size of 4 bytes"));
    }

    #[tokio::test]
    async fn test_unknown_encoding_is_invalid_argument() {
        let (_temp, ctx) = setup(1024);

        let result = ReadFileTool
            .execute(serde_json::json!({"file_path": "../secret.txt", "encoding": "klingon"}), &ctx)
            .await;

        // Rejected before the sandbox is consulted
        assert!(result.is_error);
        assert!(result.content.starts_with("Error: Invalid argument"));
        assert!(result.content.contains("klingon"));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found_text() {
        let (_temp, ctx) = setup(1024);

        let result = ReadFileTool
            .execute(serde_json::json!({"file_path": "src/missing.py"}), &ctx)
            .await;

        assert!(result.is_error);
        assert!(result.content.contains("missing.py"));
    }
}
