//! ladder command-line interface
//!
//! Sends a stored conversation through the configured model ladder.
//!
//! ```bash
//! ladder send conversation.json --tools tools.json --tool-choice required --append
//! ladder config show
//! ```
//!
//! Set `RUST_LOG=ladder_core=debug` to see retries, fallbacks and wire payloads.

mod args;
mod commands;
mod console;
mod signal_handler;

use args::{Cli, Commands, ConfigAction};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_file = cli.config_path(&std::env::current_dir()?);
    let config_file = config_file.as_deref();
    match cli.command {
        Commands::Send(args) => commands::send::run(config_file, args, cli.verbose).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(config_file),
            ConfigAction::Validate => commands::config::validate(config_file),
        },
    }
}
