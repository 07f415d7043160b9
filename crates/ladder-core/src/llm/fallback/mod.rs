//! Model ladder fallback
//!
//! Rate-limit exhaustion moves down the ladder to a more available tier; an
//! unverified required tool call moves back up to a more capable one.

mod controller;
mod types;

#[cfg(test)]
mod tests;

pub use controller::FallbackController;
pub use types::{FallbackEvent, FallbackReason, FallbackState};
