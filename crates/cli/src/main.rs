//! Scout CLI
//!
//! Main entry point for the scout command-line tool.
//! Answers questions from live web search results and a local LLM.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, SearchCommand};
use scout_core::config::{AppConfig, ConfigOverrides};
use scout_core::{logging, AppResult};
use std::path::PathBuf;

/// Scout - web search answers from a local LLM
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(about = "Answer questions from web search results with a local LLM", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "SCOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Answer provider (ollama, extractive)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Model identifier (e.g. llama3:8b, mistral, llama3.1:8b)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Sampling temperature (0.0-2.0)
    #[arg(short, long, global = true)]
    temperature: Option<f32>,

    /// Leave the sources section out of answers
    #[arg(long, global = true)]
    no_sources: bool,

    /// Skip the web search (answers use a placeholder result)
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive chat (default)
    Chat(ChatCommand),

    /// Ask a single question and exit
    Ask(AskCommand),

    /// Show the search results for a query
    Search(SearchCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load(cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(ConfigOverrides {
        provider: cli.provider,
        model: cli.model,
        temperature: cli.temperature,
        no_sources: cli.no_sources,
        offline: cli.offline,
        log_level: cli.log_level,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Scout starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    config.validate()?;

    let command = cli.command.unwrap_or(Commands::Chat(ChatCommand::default()));

    let command_name = match &command {
        Commands::Chat(_) => "chat",
        Commands::Ask(_) => "ask",
        Commands::Search(_) => "search",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
