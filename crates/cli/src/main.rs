//! Opsbot CLI
//!
//! Main entry point for the opsbot command-line tool.
//! Builds an in-memory knowledge base from operations documents and answers
//! questions about it.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, OutlineCommand, SearchCommand, StatsCommand};
use opsbot_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Opsbot CLI - answer questions about SOP documents
#[derive(Parser, Debug)]
#[command(name = "opsbot")]
#[command(about = "Answer questions about SOP documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "OPSBOT_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "OPSBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output (also set by the presence of NO_COLOR)
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask questions (find a section, find a procedure, summarize, who does what)
    Ask(AskCommand),

    /// Show sections and their procedures
    Outline(OutlineCommand),

    /// Rank chunks against a free-text query
    Search(SearchCommand),

    /// Show ingestion statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment and the config file
    let config = AppConfig::load_from(cli.config.clone())?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.log_format, config.no_color)?;

    tracing::info!("Opsbot CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Config file: {:?}", config.config_path());

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Outline(_) => "outline",
        Commands::Search(_) => "search",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Outline(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
