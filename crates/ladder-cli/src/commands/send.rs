//! `ladder send`: one conversation turn from files

use crate::args::SendArgs;
use crate::console::CliConsole;
use crate::signal_handler::SignalHandler;
use anyhow::{Context, Result, bail};
use colored::*;
use ladder_core::config::{ClientConfig, load_config};
use ladder_core::llm::{ContentBlock, ConversationReply, LlmClient, Message, ModelTier, ToolChoice, ToolDefinition};
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Send the conversation in `args.conversation` and print or append the reply
pub async fn run(config_file: Option<&Path>, args: SendArgs, verbose: bool) -> Result<()> {
    let console = CliConsole::new(verbose);

    let mut config = load_config(config_file).with_context(|| match config_file {
        Some(path) => format!("loading configuration from {}", path.display()),
        None => "loading default configuration".to_string(),
    })?;
    if let Some(start) = &args.start_model {
        config.client.start_index = resolve_start_index(&config.client, start)?;
        tracing::debug!(start_index = config.client.start_index, "starting ladder at requested model");
    }

    let mut conversation = read_conversation(&args.conversation).await?;
    let tools = match &args.tools {
        Some(path) => read_tools(path).await?,
        None => Vec::new(),
    };
    let tool_choice: ToolChoice = args.tool_choice.parse()?;

    console.info(&format!(
        "Sending {} messages with {} tools (tool choice: {})",
        conversation.len(),
        tools.len(),
        tool_choice
    ));

    let client = LlmClient::from_config(&config)?;
    let cancel = CancellationToken::new();
    let _signals = SignalHandler::start(cancel.clone()).context("installing signal handler")?;

    let reply = client
        .send_conversation_detailed(
            &conversation,
            &tools,
            &tool_choice,
            args.system.as_deref(),
            &cancel,
        )
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reply.message)?);
    } else {
        let status = VerificationStatus::of(&reply, config.client.verify_tool_calls);
        print_reply(&console, &reply, status);
    }

    if args.append {
        conversation.push(reply.message);
        let content = serde_json::to_string_pretty(&conversation)?;
        tokio::fs::write(&args.conversation, content)
            .await
            .with_context(|| format!("writing {}", args.conversation.display()))?;
        console.success(&format!("Appended reply to {}", args.conversation.display()));
    }

    Ok(())
}

/// Ladder position for `model` or `provider:model`
fn resolve_start_index(config: &ClientConfig, start: &str) -> Result<usize> {
    let index = if start.contains(':') {
        let wanted = ModelTier::parse(start)?;
        config
            .provider_models
            .iter()
            .position(|tier| tier.provider == wanted.provider && tier.model == wanted.model)
    } else {
        config.index_of_model(start)
    };

    match index {
        Some(index) => Ok(index),
        None => bail!("'{}' is not in the model ladder", start),
    }
}

async fn read_conversation(path: &Path) -> Result<Vec<Message>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading conversation {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing conversation {}", path.display()))
}

async fn read_tools(path: &Path) -> Result<Vec<ToolDefinition>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading tools {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing tools {}", path.display()))
}

/// How the reply relates to the requested tool choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerificationStatus {
    Verified,
    /// Verification is disabled and the reply does not satisfy the choice
    Unchecked,
    /// Escalation ran out and an unverified reply was accepted
    GaveUp,
}

impl VerificationStatus {
    fn of(reply: &ConversationReply, verification_enabled: bool) -> Self {
        match (reply.tool_calls_verified, verification_enabled) {
            (true, _) => Self::Verified,
            (false, false) => Self::Unchecked,
            (false, true) => Self::GaveUp,
        }
    }
}

fn print_reply(console: &CliConsole, reply: &ConversationReply, status: VerificationStatus) {
    console.print_header(&format!("Reply from {}", reply.tier));

    for block in &reply.message.content {
        match block {
            ContentBlock::Text { text } => println!("{}", text),
            ContentBlock::ToolCall(call) => {
                let arguments = serde_json::to_string(&call.arguments).unwrap_or_default();
                println!("{} {} {}", "→".cyan().bold(), call.name.cyan(), arguments.dimmed());
            }
            ContentBlock::ToolResponse(response) => {
                println!("{} {}", "←".dimmed(), response.content);
            }
        }
    }

    println!();
    console.field("attempts", reply.attempts);
    match status {
        VerificationStatus::Verified => console.field("tool calls", "verified".green()),
        VerificationStatus::Unchecked => {
            console.field("tool calls", "not verified (verification disabled)".yellow())
        }
        VerificationStatus::GaveUp => {
            console.warn("Required tool call missing; accepted after escalation limit")
        }
    }
    for event in &reply.history {
        console.field(
            "fallback",
            format!("{} → {} ({})", event.from_model, event.to_model, event.reason),
        );
    }
}
