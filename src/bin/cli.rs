//! Nonprofit lookup CLI
//!
//! Local execution entry point. For AWS Lambda, use `nonprofit-lookup-lambda`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nonprofit_lookup::{config, error::Result, pipeline};

/// Nonprofit lookup - enrich an organisation spreadsheet with contact data
#[derive(Parser, Debug)]
#[command(
    name = "nonprofit-lookup",
    version,
    about = "Enrich organisations with phone numbers and websites"
)]
struct Cli {
    /// Path to the TOML file with tunables (missing file means defaults)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one lookup and print the JSON response
    Run,

    /// Validate configuration and environment
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Startup-fatal: nothing runs without a complete configuration
    let config = config::load_from_env(Some(cli.config.as_path()))?;
    log::info!("Loaded configuration: {:?}", config);

    match cli.command {
        Command::Run => {
            let response = pipeline::handle_request(&config).await;
            println!("{}", response.to_json());
            if !response.is_success() {
                std::process::exit(1);
            }
        }

        Command::Validate => {
            log::info!("✓ Config OK");
            log::info!(
                "Input: {}/{} -> output: {}/{}",
                config.storage.container,
                config.storage.input_file,
                config.storage.container,
                config.pipeline.output_file
            );
        }
    }

    Ok(())
}
