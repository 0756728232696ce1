// Lingua language-tutor crew
// Main entry point for the lingua binary

use clap::Parser;
use lingua_engine::cli::{Cli, Command};
use lingua_engine::config::Config;
use lingua_engine::handlers::{
    handle_chat, handle_crew, handle_demo, handle_doctor, OutputFormat,
};
use lingua_engine::telemetry::init_telemetry_with_level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Resolve configuration once; it is immutable from here on
    let config = Config::from_env();

    // CLI flag wins over config-derived log level
    // (only takes effect if RUST_LOG env var is not set)
    let level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(level);

    tracing::info!("Lingua v{}", env!("CARGO_PKG_VERSION"));

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Handle commands
    match cli.command {
        Command::Demo => {
            tracing::info!("Running demo conversation...");
            handle_demo(&config, cli.flat, format).await
        }

        Command::Chat { utterance } => {
            tracing::info!("Chat turn: {}", utterance);
            handle_chat(utterance, &config, cli.flat, format).await
        }

        Command::Crew => {
            tracing::info!("Showing agent tree...");
            handle_crew(&config, cli.flat, format)
        }

        Command::Doctor => {
            tracing::info!("Running diagnostics...");
            handle_doctor(&config, format).await
        }
    }
}
