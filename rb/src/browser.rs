//! RepositoryBrowser - recursive listing and cached, size-bounded reads

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{BrowserConfig, IgnoreSet};
use crate::encoding::Encoding;
use crate::error::{BrowseError, Result};
use crate::sandbox::PathSandbox;

/// Decoded file content returned by [`RepositoryBrowser::read`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// Canonical absolute path the content was read from
    pub path: PathBuf,
    pub encoding: Encoding,
    pub content: String,
    /// Served from the read cache without touching the file
    pub cached: bool,
}

/// Read-only view of one repository for one documentation run
///
/// Root, ignore set and size limit are fixed at construction. The read cache
/// is owned by the instance and never shared; a new run builds a new browser.
#[derive(Debug)]
pub struct RepositoryBrowser {
    sandbox: PathSandbox,
    ignore_dirs: IgnoreSet,
    max_file_size: u64,
    cache: HashMap<(PathBuf, Encoding), String>,
}

impl RepositoryBrowser {
    /// Create a browser; fails when the configured root is unusable
    pub fn new(config: BrowserConfig) -> Result<Self> {
        debug!(?config.root, max_file_size = %config.max_file_size, "RepositoryBrowser::new: called");
        let sandbox = PathSandbox::new(&config.root)?;
        info!(root = %sandbox.root().display(), ignore_dirs = %config.ignore_dirs, "Repository browser ready");

        Ok(Self {
            sandbox,
            ignore_dirs: config.ignore_dirs,
            max_file_size: config.max_file_size,
            cache: HashMap::new(),
        })
    }

    /// Canonical base root
    pub fn root(&self) -> &Path {
        self.sandbox.root()
    }

    /// Ignore set configured at construction
    pub fn ignore_dirs(&self) -> &IgnoreSet {
        &self.ignore_dirs
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Number of (path, encoding) pairs held in the read cache
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    pub fn sandbox(&self) -> &PathSandbox {
        &self.sandbox
    }

    /// List every file below `root`, pruning directories named in `ignore`
    ///
    /// Entries are `label/relative/path` with `/` separators, where the label
    /// is `root` as supplied minus trailing slashes. Siblings are visited in
    /// file name order so output is stable across calls.
    pub fn list(&self, root: &str, ignore: &IgnoreSet) -> Result<Vec<String>> {
        debug!(%root, %ignore, "RepositoryBrowser::list: called");
        let dir = self.sandbox.resolve(root)?;

        let meta = fs::metadata(&dir).map_err(|e| BrowseError::from_io(&dir, e))?;
        if !meta.is_dir() {
            debug!(?dir, "RepositoryBrowser::list: not a directory");
            return Err(BrowseError::not_found(&dir, "is not a directory"));
        }

        let label = root.trim_end_matches(['/', '\\']);
        let walker = WalkDir::new(&dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let pruned = entry.file_name().to_str().is_some_and(|name| ignore.contains(name));
                if pruned {
                    debug!(path = ?entry.path(), "RepositoryBrowser::list: pruning ignored directory");
                }
                !pruned
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) if e.depth() == 0 => {
                    let io = e.into_io_error().unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                    return Err(BrowseError::from_io(&dir, io));
                }
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry while listing");
                    continue;
                }
            };

            if !is_listable_file(&self.sandbox, &entry) {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&dir) else {
                continue;
            };
            files.push(format_entry(label, relative));
        }

        debug!(count = %files.len(), "RepositoryBrowser::list: files collected");
        Ok(files)
    }

    /// Read and decode a file, serving repeats from the cache
    ///
    /// Guards run in order: sandbox, existence as a regular file, size limit,
    /// decoding. Only successful reads are cached.
    pub fn read(&mut self, path: &str, encoding: Encoding) -> Result<FileContent> {
        debug!(%path, %encoding, "RepositoryBrowser::read: called");
        let full_path = self.sandbox.resolve(path)?;

        let key = (full_path.clone(), encoding);
        if let Some(content) = self.cache.get(&key) {
            debug!(?full_path, "RepositoryBrowser::read: cache hit");
            return Ok(FileContent {
                path: full_path,
                encoding,
                content: content.clone(),
                cached: true,
            });
        }

        let meta = fs::metadata(&full_path).map_err(|e| BrowseError::from_io(&full_path, e))?;
        if !meta.is_file() {
            debug!(?full_path, "RepositoryBrowser::read: not a regular file");
            return Err(BrowseError::not_found(&full_path, "is not a file or does not exist"));
        }

        self.check_size(&full_path, meta.len())?;

        let bytes = fs::read(&full_path).map_err(|e| BrowseError::from_io(&full_path, e))?;
        self.check_size(&full_path, bytes.len() as u64)?;

        let content = encoding.decode(&bytes).ok_or_else(|| {
            debug!(?full_path, %encoding, "RepositoryBrowser::read: decode failed");
            BrowseError::Decode {
                path: full_path.clone(),
                encoding: encoding.to_string(),
            }
        })?;

        debug!(?full_path, bytes = %bytes.len(), "RepositoryBrowser::read: caching content");
        self.cache.insert(key, content.clone());

        Ok(FileContent {
            path: full_path,
            encoding,
            content,
            cached: false,
        })
    }

    fn check_size(&self, path: &Path, size: u64) -> Result<()> {
        if size > self.max_file_size {
            debug!(?path, %size, limit = %self.max_file_size, "RepositoryBrowser::check_size: too large");
            return Err(BrowseError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }
}

/// Regular files, plus symlinks to regular files that stay inside the root
fn is_listable_file(sandbox: &PathSandbox, entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    if !file_type.is_symlink() {
        return false;
    }
    match fs::canonicalize(entry.path()) {
        Ok(target) if sandbox.contains(&target) => target.is_file(),
        Ok(target) => {
            debug!(link = ?entry.path(), ?target, "is_listable_file: symlink target outside root");
            false
        }
        Err(_) => false,
    }
}

fn format_entry(label: &str, relative: &Path) -> String {
    let relative = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if label.is_empty() || label == "." {
        relative
    } else {
        format!("{}/{}", label, relative)
    }
}
