//! Built-in repository tools

mod list_files;
mod read_file;

pub use list_files::{ListFilesArgs, ListFilesTool};
pub use read_file::{ReadFileArgs, ReadFileTool};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ToolError;

/// Deserialize tool input into its argument struct
pub(crate) fn parse_args<T: DeserializeOwned>(input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| ToolError::InvalidArgument(e.to_string()))
}
