//! claude-bedrock-setup CLI entry point.

use clap::Parser;

use claude_bedrock_setup::cli::commands::{reset, setup, status, verify};
use claude_bedrock_setup::cli::{handle_error, Cli, Commands};
use claude_bedrock_setup::infrastructure::config::ConfigLoader;
use claude_bedrock_setup::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Failed to initialize logging: {err:#}");
            None
        }
    };

    let result = match cli.command {
        Commands::Setup(args) => setup::execute(args, &config, cli.json).await,
        Commands::Verify(args) => verify::execute(args, &config, cli.json).await,
        Commands::Status(args) => status::execute(args, &config, cli.json),
        Commands::Reset(args) => reset::execute(args, &config, cli.json),
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
