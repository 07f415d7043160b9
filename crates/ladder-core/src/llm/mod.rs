//! LLM client abstraction
//!
//! Layers, leaves first:
//! - [`messages`] and [`tool_types`]: provider-agnostic conversation model
//! - [`converters`], [`parsers`], [`providers`]: per-provider wire formats
//!   behind the [`ProviderAdapter`] trait
//! - [`executor`]: one model, bounded retries
//! - [`verifier`]: required tool-call check
//! - [`fallback`]: the ladder state machine
//! - [`client`]: [`LlmClient::send_conversation`], the entry point

pub mod client;
pub mod converters;
pub mod executor;
pub mod fallback;
pub mod messages;
pub mod parsers;
pub mod provider_types;
pub mod providers;
pub mod tool_types;
pub mod verifier;

pub use client::{ConversationReply, LlmClient};
pub use executor::{CallExecutor, CallOutcome};
pub use fallback::{FallbackController, FallbackEvent, FallbackReason, FallbackState};
pub use messages::{
    ContentBlock, Message, MessageRole, ToolCall, ToolResponse, validate_conversation,
};
pub use provider_types::{Capability, LlmProvider, ModelTier, TimeoutConfig};
pub use providers::{AdapterRegistry, ProviderAdapter, RequestLimits, WireRequest, build_adapter};
pub use tool_types::{ToolChoice, ToolDefinition, ToolParameter, ToolParameters, ToolSet};
pub use verifier::ToolCallVerifier;
