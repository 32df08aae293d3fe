//! PathSandbox - confine candidate paths to a canonical base root

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{BrowseError, Result};

/// Symlink expansions allowed while resolving one candidate
const MAX_SYMLINK_HOPS: usize = 40;

/// Resolves candidate paths against a fixed base root
///
/// The root is canonicalized once at construction. Every candidate is
/// resolved component by component with symlinks followed, and only then
/// checked for containment, so neither `..` segments nor symlinks can lead
/// outside the root.
#[derive(Debug, Clone)]
pub struct PathSandbox {
    root: PathBuf,
}

/// One unit of work for [`PathSandbox::canonicalize_lenient`]
#[derive(Debug)]
enum Step {
    Root(OsString),
    Parent,
    Name(OsString),
}

fn steps(path: &Path) -> Vec<Step> {
    path.components()
        .filter_map(|component| match component {
            Component::Prefix(_) | Component::RootDir => Some(Step::Root(component.as_os_str().to_owned())),
            Component::CurDir => None,
            Component::ParentDir => Some(Step::Parent),
            Component::Normal(name) => Some(Step::Name(name.to_owned())),
        })
        .collect()
}

impl PathSandbox {
    /// Create a sandbox rooted at `root`
    ///
    /// Fails with `NotFound` when the root is missing or not a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        debug!(?root, "PathSandbox::new: called");

        let canonical = root.canonicalize().map_err(|e| BrowseError::from_io(root, e))?;
        if !canonical.is_dir() {
            debug!(?canonical, "PathSandbox::new: root is not a directory");
            return Err(BrowseError::not_found(root, "is not a directory"));
        }

        Ok(Self { root: canonical })
    }

    /// The canonical base root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True when `path` is the root or lies below it (component-wise)
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }

    /// Resolve `candidate` to an absolute path inside the root
    ///
    /// Relative candidates are joined to the root; absolute ones are taken
    /// as is. An empty candidate resolves to the root itself.
    pub fn resolve(&self, candidate: &str) -> Result<PathBuf> {
        debug!(%candidate, "PathSandbox::resolve: called");
        let resolved = self.canonicalize_lenient(Path::new(candidate))?;

        if self.contains(&resolved) {
            debug!(?resolved, "PathSandbox::resolve: path is within root");
            Ok(resolved)
        } else {
            warn!(
                %candidate,
                resolved = %resolved.display(),
                root = %self.root.display(),
                "Sandbox violation: path escapes base root"
            );
            Err(BrowseError::OutOfBounds {
                path: candidate.to_string(),
                root: self.root.clone(),
            })
        }
    }

    /// Canonicalize as far as the filesystem allows
    ///
    /// Components are applied one at a time. A symlink is replaced by its
    /// target's components, so a link reached after `..` is followed like
    /// any other. Missing components are kept lexically and every later
    /// component is checked again against the filesystem.
    fn canonicalize_lenient(&self, candidate: &Path) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        let mut pending: VecDeque<Step> = steps(candidate).into();
        let mut hops = 0;

        while let Some(step) = pending.pop_front() {
            match step {
                Step::Root(root) => resolved.push(root),
                Step::Parent => {
                    resolved.pop();
                }
                Step::Name(name) => {
                    resolved.push(name);
                    match fs::symlink_metadata(&resolved) {
                        Ok(meta) if meta.file_type().is_symlink() => {
                            hops += 1;
                            if hops > MAX_SYMLINK_HOPS {
                                warn!(?resolved, "Too many symlink hops while resolving path");
                                return Err(BrowseError::Unknown {
                                    path: resolved,
                                    message: "too many levels of symbolic links".to_string(),
                                });
                            }
                            let target = fs::read_link(&resolved).map_err(|e| BrowseError::from_io(&resolved, e))?;
                            debug!(?resolved, ?target, "PathSandbox::canonicalize_lenient: following symlink");
                            resolved.pop();
                            for step in steps(&target).into_iter().rev() {
                                pending.push_front(step);
                            }
                        }
                        Ok(_) => {}
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {
                            debug!(?resolved, "PathSandbox::canonicalize_lenient: component missing");
                        }
                        Err(e) => return Err(BrowseError::from_io(&resolved, e)),
                    }
                }
            }
        }

        Ok(resolved)
    }
}
