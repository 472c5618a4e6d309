//! Elite Chat Widget Library
//!
//! Message-protocol layer of the embedded chat widget: the host bridge that
//! exchanges render events and outbound values with the embedding runtime, and
//! the marker parser that splits assistant text into display content and
//! coaching metadata.
//!
//! The binary in `src/main.rs` wires these pieces to stdin/stdout.

pub mod bridge;
pub mod chat;
pub mod config;
pub mod error;
pub mod transport;

pub use bridge::{ChatBridge, HostContext, SendOutcome};
pub use chat::{parse_markers, Message, MessageRole, ParsedMessage};
pub use config::WidgetConfig;
pub use error::WidgetError;
