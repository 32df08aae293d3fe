//! Configuration for a repository browser

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Bare directory names pruned from listings at any depth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreSet(BTreeSet<String>);

impl IgnoreSet {
    /// An ignore set that prunes nothing
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Build from names; path separators are not interpreted
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::from_names(crate::DEFAULT_IGNORE_DIRS.iter().copied())
    }
}

impl std::fmt::Display for IgnoreSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "None");
        }
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{}", names.join(", "))
    }
}

/// Construction-time settings for [`crate::RepositoryBrowser`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Base root every path is confined to
    pub root: PathBuf,

    /// Directory names skipped while listing
    #[serde(rename = "ignore-dirs", default)]
    pub ignore_dirs: IgnoreSet,

    /// Largest file a read will return, in bytes
    #[serde(rename = "max-file-size", default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_max_file_size() -> u64 {
    crate::DEFAULT_MAX_FILE_SIZE
}

impl BrowserConfig {
    /// Config for `root` with default ignore set and size limit
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore_dirs: IgnoreSet::default(),
            max_file_size: default_max_file_size(),
        }
    }

    pub fn with_ignore_dirs(mut self, ignore_dirs: IgnoreSet) -> Self {
        self.ignore_dirs = ignore_dirs;
        self
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ignore_set() {
        let ignore = IgnoreSet::default();
        assert!(ignore.contains(".git"));
        assert!(ignore.contains("node_modules"));
        assert!(ignore.contains("__pycache__"));
        assert!(!ignore.contains("src"));
    }

    #[test]
    fn test_ignore_set_display_is_sorted() {
        let ignore = IgnoreSet::from_names(["node_modules", ".git"]);
        assert_eq!(ignore.to_string(), ".git, node_modules");
        assert_eq!(IgnoreSet::empty().to_string(), "None");
    }

    #[test]
    fn test_browser_config_defaults() {
        let config = BrowserConfig::new("/repo");
        assert_eq!(config.root, PathBuf::from("/repo"));
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert!(config.ignore_dirs.contains(".idea"));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let yaml = r#"
root: /srv/repo
max-file-size: 2048
"#;
        let config: BrowserConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/repo"));
        assert_eq!(config.max_file_size, 2048);
        assert_eq!(config.ignore_dirs, IgnoreSet::default());
    }

    #[test]
    fn test_deserialize_ignore_dirs() {
        let yaml = r#"
root: /srv/repo
ignore-dirs: [target, dist]
"#;
        let config: BrowserConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.ignore_dirs.contains("target"));
        assert!(!config.ignore_dirs.contains(".git"));
        assert_eq!(config.max_file_size, crate::DEFAULT_MAX_FILE_SIZE);
    }
}
