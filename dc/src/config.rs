//! Docrew configuration types and loading

use eyre::{Context, Result};
use repobrowser::{BrowserConfig, IgnoreSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main Docrew configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM configuration
    pub llm: LlmConfig,

    /// Repository access configuration
    pub repository: RepositoryConfig,

    /// Pipeline and output configuration
    pub pipeline: PipelineConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before a documentation run
    ///
    /// Fails fast when the API key is missing or no repository is set.
    pub fn validate(&self) -> Result<()> {
        self.llm.get_api_key()?;
        if self.repository.path.is_none() {
            return Err(eyre::eyre!(
                "No repository path configured. Pass --repo, set REPO_PATH, or set repository.path in the config file."
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file_chain(config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file_chain(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .docrew.yml
        let local_config = PathBuf::from(".docrew.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/docrew/docrew.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("docrew").join("docrew.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed; the full load reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(p) => p.clone(),
            None => PathBuf::from(".docrew.yml"),
        };
        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply REPO_PATH, LLM_MODEL, LLM_TEMPERATURE and FILE_LABEL overrides
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(repo) = lookup("REPO_PATH").filter(|v| !v.is_empty()) {
            self.repository.path = Some(PathBuf::from(repo));
        }
        if let Some(model) = lookup("LLM_MODEL").filter(|v| !v.is_empty()) {
            self.llm.model = model;
        }
        if let Some(temperature) = lookup("LLM_TEMPERATURE") {
            match temperature.parse::<f32>() {
                Ok(t) => self.llm.temperature = t,
                Err(_) => tracing::warn!(%temperature, "Ignoring unparseable LLM_TEMPERATURE"),
            }
        }
        if let Some(label) = lookup("FILE_LABEL").filter(|v| !v.is_empty()) {
            self.pipeline.file_label = label;
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 16384,
            temperature: 0.0,
            timeout_ms: 300_000,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.api_key_env
            )),
        }
    }
}

/// Repository access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Repository root to document
    pub path: Option<PathBuf>,

    /// Directory names never listed
    #[serde(rename = "ignore-dirs")]
    pub ignore_dirs: IgnoreSet,

    /// Largest file the read tool returns, in bytes
    #[serde(rename = "max-file-size")]
    pub max_file_size: u64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            ignore_dirs: IgnoreSet::default(),
            max_file_size: repobrowser::DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl RepositoryConfig {
    /// Browser settings rooted at `root`
    pub fn browser_config(&self, root: &Path) -> BrowserConfig {
        BrowserConfig::new(root)
            .with_ignore_dirs(self.ignore_dirs.clone())
            .with_max_file_size(self.max_file_size)
    }
}

/// Pipeline and output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory generated documentation is written to
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Label appended to output file names
    #[serde(rename = "file-label")]
    pub file_label: String,

    /// Run the markdown formatting stage after the writer
    #[serde(rename = "format-stage")]
    pub format_stage: bool,

    /// Tool-use rounds per stage before a final answer is forced
    #[serde(rename = "max-tool-rounds")]
    pub max_tool_rounds: u32,

    /// Max tokens requested per stage call
    #[serde(rename = "stage-max-tokens")]
    pub stage_max_tokens: u32,

    /// Directory with `.pmt` files overriding the embedded prompts
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            file_label: "code_documentation".to_string(),
            format_stage: false,
            max_tool_rounds: 25,
            stage_max_tokens: 8192,
            prompts_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.llm.model.contains("sonnet"));
        assert_eq!(config.llm.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.repository.max_file_size, 10 * 1024 * 1024);
        assert!(config.repository.ignore_dirs.contains(".git"));
        assert_eq!(config.pipeline.file_label, "code_documentation");
        assert!(!config.pipeline.format_stage);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  model: claude-opus-4
  api-key-env: MY_API_KEY
  max-tokens: 8192
  temperature: 0.2

repository:
  path: /srv/repo
  ignore-dirs: [.git, target]
  max-file-size: 65536

pipeline:
  output-dir: docs/generated
  file-label: api_docs
  format-stage: true
  max-tool-rounds: 10

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "claude-opus-4");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 8192);
        assert_eq!(config.repository.path, Some(PathBuf::from("/srv/repo")));
        assert!(config.repository.ignore_dirs.contains("target"));
        assert!(!config.repository.ignore_dirs.contains("node_modules"));
        assert_eq!(config.repository.max_file_size, 65536);
        assert_eq!(config.pipeline.output_dir, PathBuf::from("docs/generated"));
        assert_eq!(config.pipeline.file_label, "api_docs");
        assert!(config.pipeline.format_stage);
        assert_eq!(config.pipeline.max_tool_rounds, 10);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: claude-haiku
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "claude-haiku");
        assert_eq!(config.llm.api_key_env, "ANTHROPIC_API_KEY");
        assert!(config.repository.path.is_none());
        assert_eq!(config.pipeline.max_tool_rounds, 25);
    }

    #[test]
    fn test_apply_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("REPO_PATH", "/work/repo"),
            ("LLM_MODEL", "claude-haiku"),
            ("LLM_TEMPERATURE", "0.7"),
            ("FILE_LABEL", "deployment_documentation"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.repository.path, Some(PathBuf::from("/work/repo")));
        assert_eq!(config.llm.model, "claude-haiku");
        assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.pipeline.file_label, "deployment_documentation");
    }

    #[test]
    fn test_apply_env_ignores_bad_temperature() {
        let mut config = Config::default();
        config.apply_env(|key| (key == "LLM_TEMPERATURE").then(|| "warm".to_string()));
        assert_eq!(config.llm.temperature, 0.0);
    }

    #[test]
    fn test_browser_config_from_repository() {
        let repo = RepositoryConfig {
            path: None,
            ignore_dirs: IgnoreSet::from_names(["vendor"]),
            max_file_size: 42,
        };
        let browser = repo.browser_config(Path::new("/srv/repo"));
        assert_eq!(browser.root, PathBuf::from("/srv/repo"));
        assert_eq!(browser.max_file_size, 42);
        assert!(browser.ignore_dirs.contains("vendor"));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("docrew.yml");
        fs::write(&path, "pipeline:\n  file-label: from_file\nlog-level: warn\n").unwrap();

        let config = Config::load_file_chain(Some(&path)).unwrap();
        assert_eq!(config.pipeline.file_label, "from_file");
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let missing = PathBuf::from("/definitely/not/here/docrew.yml");
        assert!(Config::load_file_chain(Some(&missing)).is_err());
    }

    #[test]
    #[serial]
    fn test_validate_requires_api_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "DOCREW_TEST_MISSING_KEY".to_string();
        config.repository.path = Some(PathBuf::from("/srv/repo"));

        // SAFETY: serialized test, no other thread reads this variable
        unsafe { std::env::remove_var("DOCREW_TEST_MISSING_KEY") };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DOCREW_TEST_MISSING_KEY"));

        unsafe { std::env::set_var("DOCREW_TEST_MISSING_KEY", "sk-test") };
        assert!(config.validate().is_ok());
        unsafe { std::env::remove_var("DOCREW_TEST_MISSING_KEY") };
    }

    #[test]
    #[serial]
    fn test_validate_requires_repository() {
        let mut config = Config::default();
        config.llm.api_key_env = "DOCREW_TEST_REPO_KEY".to_string();

        unsafe { std::env::set_var("DOCREW_TEST_REPO_KEY", "sk-test") };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("repository"));
        unsafe { std::env::remove_var("DOCREW_TEST_REPO_KEY") };
    }
}
