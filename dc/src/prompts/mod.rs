//! Prompt templates for documentation stages
//!
//! Templates are `.pmt` files rendered with Handlebars. Loading order:
//! 1. `{prompts-dir}/{name}.pmt` when `pipeline.prompts-dir` is configured
//! 2. Embedded fallback compiled into the binary

pub mod embedded;
mod loader;

pub use loader::{PriorOutput, PromptContext, PromptLoader};
