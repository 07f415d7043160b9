//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use ladder_core::config::discover_config_file;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ladder")]
#[command(about = "Send LLM conversations through a rate-limit aware model ladder")]
#[command(
    long_about = r#"Send LLM conversations through a rate-limit aware model ladder

USAGE:
  ladder send conversation.json                   # Print the next message
  ladder send conversation.json --append          # Append it to the file
  ladder send conv.json --tools tools.json --tool-choice required:classify_repository
  ladder config show                              # Show effective config
  ladder config validate                          # Check config and API keys"#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (JSON, TOML or YAML).
    /// Without it ladder.{toml,yaml,yml,json} in the current directory is used if present.
    #[arg(long, global = true, env = "LADDER_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Explicit config file, else one discovered in `dir`
    pub fn config_path(&self, dir: &Path) -> Option<PathBuf> {
        self.config_file
            .clone()
            .or_else(|| discover_config_file(dir))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a conversation and print or append the reply
    Send(SendArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
pub struct SendArgs {
    /// JSON file holding the conversation as an array of messages
    pub conversation: PathBuf,

    /// JSON file holding an array of tool definitions
    #[arg(long)]
    pub tools: Option<PathBuf>,

    /// auto, none, required or required:<tool>
    #[arg(long, default_value = "auto")]
    pub tool_choice: String,

    /// System prompt sent alongside the conversation
    #[arg(long)]
    pub system: Option<String>,

    /// Start at this ladder entry (`model` or `provider:model`)
    #[arg(long)]
    pub start_model: Option<String>,

    /// Append the reply to the conversation file
    #[arg(long)]
    pub append: bool,

    /// Print the reply as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Clone, Copy)]
pub enum ConfigAction {
    /// Display the effective configuration
    Show,

    /// Validate configuration and report missing API keys
    Validate,
}
