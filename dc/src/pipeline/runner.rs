//! DocumentationPipeline - runs the stages in order for one repository

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use eyre::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Stage, StageAgent, write_document};
use crate::config::{PipelineConfig, RepositoryConfig};
use crate::llm::{LlmClient, TokenUsage};
use crate::prompts::{PriorOutput, PromptContext, PromptLoader};
use crate::tools::ToolContext;

/// Result of one stage within a run
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub output: String,
    pub usage: TokenUsage,
    pub tool_calls: usize,
}

/// Everything a documentation run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub stages: Vec<StageReport>,
    pub output_files: Vec<PathBuf>,
    pub usage: TokenUsage,
}

impl RunReport {
    pub fn output(&self, stage: Stage) -> Option<&str> {
        self.stages
            .iter()
            .find(|report| report.stage == stage)
            .map(|report| report.output.as_str())
    }

    /// Path of the last document written
    pub fn final_document(&self) -> Option<&Path> {
        self.output_files.last().map(PathBuf::as_path)
    }
}

/// Sequential agent pipeline documenting one repository
pub struct DocumentationPipeline {
    llm: Arc<dyn LlmClient>,
    repo_path: PathBuf,
    repository: RepositoryConfig,
    pipeline: PipelineConfig,
    prompts: PromptLoader,
}

impl DocumentationPipeline {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        repo_path: impl Into<PathBuf>,
        repository: RepositoryConfig,
        pipeline: PipelineConfig,
    ) -> Self {
        let repo_path = repo_path.into();
        debug!(repo_path = %repo_path.display(), "DocumentationPipeline::new: called");
        let prompts = PromptLoader::new(pipeline.prompts_dir.clone());
        Self {
            llm,
            repo_path,
            repository,
            pipeline,
            prompts,
        }
    }

    pub fn stages(&self) -> Vec<Stage> {
        Stage::sequence(self.pipeline.format_stage)
    }

    /// Run every stage in order
    ///
    /// A repository root that cannot be opened aborts before any LLM call.
    /// Tool failures never abort; LLM and output failures do.
    pub async fn run(&self) -> Result<RunReport> {
        let ctx = ToolContext::from_config(self.repository.browser_config(&self.repo_path))
            .context(format!("Cannot open repository {}", self.repo_path.display()))?;
        let run_id = ctx.run_id();
        info!(%run_id, repo = %ctx.root().display(), "Documentation run started");

        let ignore_dirs = ctx.browser().lock().await.ignore_dirs().to_string();
        let mut outputs: HashMap<Stage, String> = HashMap::new();
        let mut report = RunReport {
            run_id,
            stages: Vec::new(),
            output_files: Vec::new(),
            usage: TokenUsage::default(),
        };

        for stage in self.stages() {
            let prompt_ctx = PromptContext {
                repo_path: ctx.root().display().to_string(),
                ignore_dirs: ignore_dirs.clone(),
                previous: stage
                    .context()
                    .iter()
                    .filter_map(|dep| {
                        outputs.get(dep).map(|content| PriorOutput {
                            title: dep.title().to_string(),
                            content: content.clone(),
                        })
                    })
                    .collect(),
            };
            let system_prompt = self.prompts.render(stage.template(), &prompt_ctx)?;

            let agent = StageAgent::new(
                stage,
                self.llm.clone(),
                self.pipeline.max_tool_rounds,
                self.pipeline.stage_max_tokens,
            );
            let outcome = agent.run(&system_prompt, &ctx).await?;
            report.usage.add(&outcome.usage);

            if let Some(suffix) = stage.output_suffix() {
                let label = format!("{}{}", self.pipeline.file_label, suffix);
                let path = write_document(&self.pipeline.output_dir, &label, &outcome.text)?;
                report.output_files.push(path);
            }

            outputs.insert(stage, outcome.text.clone());
            report.stages.push(StageReport {
                stage,
                output: outcome.text,
                usage: outcome.usage,
                tool_calls: outcome.tool_calls,
            });
        }

        info!(
            %run_id,
            stages = report.stages.len(),
            input_tokens = report.usage.input_tokens,
            output_tokens = report.usage.output_tokens,
            "Documentation run finished"
        );
        Ok(report)
    }
}
