//! CLI argument parsing for docrew

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dc")]
#[command(author, version, about = "Document a repository with a sequential crew of LLM agents", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the documentation pipeline against a repository
    Run {
        /// Repository to document (overrides REPO_PATH and config)
        #[arg(short, long)]
        repo: Option<PathBuf>,

        /// Label appended to the output file name
        #[arg(long)]
        label: Option<String>,

        /// Model identifier
        #[arg(short, long)]
        model: Option<String>,

        /// Directory the documentation is written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also run the markdown formatting stage
        #[arg(short, long)]
        format: bool,
    },

    /// List files the way the list_files tool does
    List {
        /// Directory to list, relative to the repository root
        #[arg(default_value = ".")]
        directory: String,

        /// Directory names to skip (repeatable or comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        ignore: Vec<String>,

        /// Skip nothing, not even the configured ignore list
        #[arg(long, conflicts_with = "ignore")]
        no_ignore: bool,

        /// Repository root (defaults to the configured repository, then the current directory)
        #[arg(short, long)]
        repo: Option<PathBuf>,
    },

    /// Read a file the way the read_file tool does
    Read {
        /// File path relative to the repository root
        file: String,

        /// Text encoding
        #[arg(short, long, default_value = "utf-8")]
        encoding: String,

        /// Repository root (defaults to the configured repository, then the current directory)
        #[arg(short, long)]
        repo: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}

impl Command {
    /// The list_files tool input equivalent to this command
    pub fn list_input(directory: &str, ignore: &[String], no_ignore: bool) -> serde_json::Value {
        let mut input = serde_json::json!({ "directory": directory });
        if no_ignore {
            input["ignore_dirs"] = serde_json::json!([]);
        } else if !ignore.is_empty() {
            input["ignore_dirs"] = serde_json::json!(ignore);
        }
        input
    }
}
