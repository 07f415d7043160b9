//! # ladder-core
//!
//! Multi-provider LLM client with retry and fallback control.
//!
//! A conversation in the provider-agnostic [`llm::Message`] model is
//! converted to a provider's wire format, sent through a ladder of
//! `(provider, model)` tiers and answered with a single new message. Rate
//! limits move the call to a more available tier; a missing required tool
//! call moves it back to a more capable one.
//!
//! ```no_run
//! use ladder_core::config::load_config;
//! use ladder_core::llm::{LlmClient, Message, ToolChoice};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> ladder_core::LadderResult<()> {
//! let config = load_config(None)?;
//! let client = LlmClient::from_config(&config)?;
//! let reply = client
//!     .send_conversation(
//!         &[Message::user("Summarize this repository")],
//!         &[],
//!         &ToolChoice::Auto,
//!         None,
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//! println!("{}", reply.text());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod llm;

pub use config::{ClientConfig, LadderConfig};
pub use error::{CallSite, ErrorKind, LadderError, LadderResult};
pub use llm::LlmClient;
