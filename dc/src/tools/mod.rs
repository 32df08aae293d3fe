//! Tool system for documentation stages
//!
//! Tools expose the repository browser to LLM stages. Each run gets one
//! `ToolContext` holding a browser confined to the repository root; tools
//! always answer with text, never with a propagated error.

mod context;
mod error;
mod executor;
mod traits;

pub mod builtin;

pub use context::ToolContext;
pub use error::ToolError;
pub use executor::{ToolExecutor, ToolProfile};
pub use traits::{Tool, ToolResult};
