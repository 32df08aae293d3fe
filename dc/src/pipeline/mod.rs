//! Sequential documentation pipeline
//!
//! Stages run strictly in order against one repository: analysis, code
//! review, writing, and optionally formatting. Each stage is an LLM tool
//! loop over the run's `ToolContext`.

mod agent;
mod output;
mod runner;
mod stage;

pub use agent::{StageAgent, StageOutcome};
pub use output::{output_file_name, write_document};
pub use runner::{DocumentationPipeline, RunReport, StageReport};
pub use stage::Stage;
