//! Output document naming and writing

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use eyre::{Context, Result};
use tracing::info;

/// `<YYYY-MM-DD_HH-MM-SS>-<mmm>_<label>.md`
///
/// Characters outside `[A-Za-z0-9_-]` in the label become `_`.
pub fn output_file_name(timestamp: NaiveDateTime, label: &str) -> String {
    let label: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    format!("{}_{}.md", timestamp.format("%Y-%m-%d_%H-%M-%S-%3f"), label)
}

/// Write `content` to a freshly named file under `dir`, creating `dir` if needed
pub fn write_document(dir: &Path, label: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).context(format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(output_file_name(chrono::Local::now().naive_local(), label));
    fs::write(&path, content).context(format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), bytes = content.len(), "Wrote documentation");
    Ok(path)
}
