//! Docrew CLI entry point

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result, eyre};
use repobrowser::BrowserConfig;
use tracing::{debug, info};

use docrew::cli::{Cli, Command};
use docrew::config::Config;
use docrew::llm::create_client;
use docrew::pipeline::DocumentationPipeline;
use docrew::tools::builtin::{ListFilesTool, ReadFileTool};
use docrew::tools::{Tool, ToolContext};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docrew")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("docrew.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log level is needed before the full config load can log anything
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Run {
            repo,
            label,
            model,
            output_dir,
            format,
        } => cmd_run(config, repo, label, model, output_dir, format).await,
        Command::List {
            directory,
            ignore,
            no_ignore,
            repo,
        } => {
            let input = Command::list_input(&directory, &ignore, no_ignore);
            cmd_tool(&config, repo, &ListFilesTool, input).await
        }
        Command::Read { file, encoding, repo } => {
            let input = serde_json::json!({ "file_path": file, "encoding": encoding });
            cmd_tool(&config, repo, &ReadFileTool, input).await
        }
        Command::Config => cmd_config(&config),
    }
}

async fn cmd_run(
    mut config: Config,
    repo: Option<PathBuf>,
    label: Option<String>,
    model: Option<String>,
    output_dir: Option<PathBuf>,
    format: bool,
) -> Result<()> {
    if let Some(repo) = repo {
        config.repository.path = Some(repo);
    }
    if let Some(label) = label {
        config.pipeline.file_label = label;
    }
    if let Some(model) = model {
        config.llm.model = model;
    }
    if let Some(output_dir) = output_dir {
        config.pipeline.output_dir = output_dir;
    }
    config.pipeline.format_stage |= format;
    config.validate()?;

    let repo_path = config
        .repository
        .path
        .clone()
        .ok_or_else(|| eyre!("No repository path configured"))?;
    let llm = create_client(&config.llm)?;

    println!(
        "{} {} with {}",
        "Documenting".green().bold(),
        repo_path.display(),
        config.llm.model.cyan()
    );

    let model = config.llm.model.clone();
    let pipeline = DocumentationPipeline::new(llm, repo_path, config.repository, config.pipeline);
    let report = pipeline.run().await?;

    for stage in &report.stages {
        println!(
            "  {} {} ({} tool calls, {} tokens)",
            "✓".green(),
            stage.stage,
            stage.tool_calls,
            stage.usage.total()
        );
    }
    for path in &report.output_files {
        println!("{} {}", "Wrote".green().bold(), path.display());
    }
    println!(
        "{} run {} used {} input / {} output tokens (~${:.2})",
        "Done:".bold(),
        report.run_id,
        report.usage.input_tokens,
        report.usage.output_tokens,
        report.usage.cost_usd(&model)
    );
    Ok(())
}

/// Run one tool directly and print what the model would see
async fn cmd_tool(config: &Config, repo: Option<PathBuf>, tool: &dyn Tool, input: serde_json::Value) -> Result<()> {
    let root = match repo.or_else(|| config.repository.path.clone()) {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let browser_config: BrowserConfig = config.repository.browser_config(&root);
    let ctx = ToolContext::from_config(browser_config).context(format!("Cannot open repository {}", root.display()))?;

    let result = tool.execute(input, &ctx).await;
    if result.is_error {
        eprintln!("{}", result.content.red());
        std::process::exit(1);
    }
    println!("{}", result.content);
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    print!("{}", yaml);
    Ok(())
}
