//! Chat module
//!
//! Conversation entities, the in-band marker parser, and the quick-action
//! command catalog.

pub mod commands;
pub mod markers;
pub mod models;

pub use commands::{find_quick_action, is_directive, QuickAction, COMMAND_SENTINEL};
pub use markers::{parse_markers, ParsedMessage};
pub use models::{BridgeState, Message, MessageRole, SessionIdentity};
