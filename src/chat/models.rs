//! Chat data models
//!
//! Defines the conversation entities shared by the bridge and the marker parser.

use super::markers::{parse_markers, ParsedMessage};
use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user
    User,
    /// Message from the assistant/AI
    Assistant,
}

impl MessageRole {
    /// Convert the role to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single message in the visible conversation
///
/// Messages are never edited after being appended; the bridge either appends
/// a new one or replaces the whole sequence from a host render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Raw content, possibly carrying in-band markers
    pub content: String,
}

impl Message {
    /// Create a new message
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Split the content into display text and marker metadata
    ///
    /// Derived fresh on every call; nothing is cached on the message.
    pub fn parse(&self) -> ParsedMessage {
        parse_markers(&self.content)
    }
}

/// Who the widget believes it is talking to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Name sent along with every outbound message
    pub user_name: String,
    /// Whether the name has been settled (entered, skipped, or host-provided)
    pub name_confirmed: bool,
}

impl SessionIdentity {
    /// Unconfirmed identity carrying the placeholder name
    pub fn placeholder(default_name: &str) -> Self {
        Self {
            user_name: default_name.to_string(),
            name_confirmed: false,
        }
    }

    /// Settle the identity on `user_name`
    pub fn confirmed(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            name_confirmed: true,
        }
    }
}

/// Connection flags of the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeState {
    /// A host is present (fixed at construction)
    pub connected: bool,
    /// An outbound send is outstanding; further sends are suppressed
    pub awaiting_reply: bool,
}
