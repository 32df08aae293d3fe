//! RepoBrowser - sandboxed repository access for LLM tool calls
//!
//! Lets an untrusted, LLM-driven tool layer enumerate and read files below a
//! fixed repository root without escaping it, without pulling in oversized
//! files, and with idempotent cached reads.
//!
//! # Components
//!
//! - [`PathSandbox`] - resolves candidate paths against a canonical root and
//!   rejects anything that lands outside it
//! - [`RepositoryBrowser`] - recursive listing with ignored directory names,
//!   size-bounded reads, and a per-instance read cache
//! - [`Encoding`] - text decodings accepted by reads
//!
//! # Example
//!
//! ```ignore
//! use repobrowser::{BrowserConfig, Encoding, RepositoryBrowser};
//!
//! let mut browser = RepositoryBrowser::new(BrowserConfig::new("/path/to/repo"))?;
//! let files = browser.list("/path/to/repo", browser.ignore_dirs())?;
//! let main = browser.read("src/main.rs", Encoding::Utf8)?;
//! ```

mod browser;
mod config;
mod encoding;
mod error;
mod sandbox;

pub use browser::{FileContent, RepositoryBrowser};
pub use config::{BrowserConfig, IgnoreSet};
pub use encoding::{Encoding, UnsupportedEncoding};
pub use error::{BrowseError, ErrorKind, Result};
pub use sandbox::PathSandbox;

/// Default maximum file size for reads (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Directory names skipped by default: version control, IDE state,
/// dependency caches and virtual environments
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    ".idea",
    ".vscode",
    "__pycache__",
    "node_modules",
    "venv",
    "env",
    ".venv",
];
