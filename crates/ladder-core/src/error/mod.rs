//! Error types for ladder
//!
//! Every failure the core can report is a [`LadderError`]. Its [`ErrorKind`]
//! decides how the retry and fallback machinery treats it:
//! - transient kinds (`RateLimited`, `ProviderUnavailable`) are retried and
//!   may move the fallback ladder
//! - every other kind is fatal and propagates unchanged to the caller
//!
//! Errors raised while talking to a provider carry a [`CallSite`] naming the
//! provider, model and attempt that produced them.

mod constructors;
mod conversions;
mod types;

pub use types::{CallSite, ErrorKind, LadderError, LadderResult};
