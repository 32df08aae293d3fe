//! ToolContext - per-run execution context for tools

use std::path::PathBuf;
use std::sync::Arc;

use repobrowser::{BrowserConfig, RepositoryBrowser};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::ToolError;

/// Execution context shared by every tool call in one documentation run
///
/// Clones share the same browser and therefore the same read cache. A new
/// run builds a new context, so cached reads never leak between runs.
#[derive(Clone)]
pub struct ToolContext {
    run_id: Uuid,
    root: PathBuf,
    browser: Arc<Mutex<RepositoryBrowser>>,
}

impl ToolContext {
    /// Wrap an existing browser in a fresh run context
    pub fn new(browser: RepositoryBrowser) -> Self {
        let run_id = Uuid::now_v7();
        debug!(%run_id, root = %browser.root().display(), "ToolContext::new: called");
        Self {
            run_id,
            root: browser.root().to_path_buf(),
            browser: Arc::new(Mutex::new(browser)),
        }
    }

    /// Build the browser from config; fails when the root is unusable
    pub fn from_config(config: BrowserConfig) -> Result<Self, ToolError> {
        debug!(root = %config.root.display(), "ToolContext::from_config: called");
        let browser = RepositoryBrowser::new(config)?;
        Ok(Self::new(browser))
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Canonical repository root
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn browser(&self) -> &Arc<Mutex<RepositoryBrowser>> {
        &self.browser
    }
}
