//! Prompt Loader
//!
//! Loads stage templates from an override directory or falls back to the
//! embedded defaults, then renders them with Handlebars.

use std::path::PathBuf;

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Output of an earlier stage handed to a later one
#[derive(Debug, Clone, Serialize)]
pub struct PriorOutput {
    pub title: String,
    pub content: String,
}

/// Context for rendering stage templates
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// Repository root as shown to the model
    pub repo_path: String,
    /// Comma-separated ignored directory names
    pub ignore_dirs: String,
    /// Outputs of the stages this one depends on, in run order
    pub previous: Vec<PriorOutput>,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    hbs: Handlebars<'static>,
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Loader that prefers `{override_dir}/{name}.pmt` when the directory exists
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        debug!(?override_dir, "PromptLoader::new: called");
        let override_dir = override_dir.filter(|dir| {
            let exists = dir.is_dir();
            if !exists {
                tracing::warn!(dir = %dir.display(), "Prompt override directory not found, using embedded prompts");
            }
            exists
        });

        let mut hbs = Handlebars::new();
        // Prompts carry source code; HTML escaping would mangle it
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs, override_dir }
    }

    /// Loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        Self::new(None)
    }

    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
            }
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, previous = context.previous.len(), "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}
