//! Message, tool and tool-choice format converters

pub mod messages;
pub mod tool_choice;
pub mod tools;

pub use messages::MessageConverter;
pub use tool_choice::ToolChoiceConverter;
pub use tools::{ToolConverter, sanitize_google_property};
