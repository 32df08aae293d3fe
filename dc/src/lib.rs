//! Docrew - document a repository with a sequential crew of LLM agents
//!
//! A run walks three stages (analysis, code review, writing) and an
//! optional formatting stage. The analysis and review stages explore the
//! repository through sandboxed `list_files` / `read_file` tools backed by
//! [`repobrowser`]; the writer's output lands in a timestamped markdown file.
//!
//! # Example
//!
//! ```ignore
//! use docrew::config::Config;
//! use docrew::llm::create_client;
//! use docrew::pipeline::DocumentationPipeline;
//!
//! let config = Config::load(None)?;
//! let llm = create_client(&config.llm)?;
//! let pipeline = DocumentationPipeline::new(llm, "/srv/repo", config.repository, config.pipeline);
//! let report = pipeline.run().await?;
//! println!("{:?}", report.final_document());
//! ```

pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod tools;
