//! Host protocol
//!
//! Wire types exchanged between the widget and its host, plus the internal
//! events the bridge processes.

use crate::chat::Message;
use crate::error::WidgetError;
use serde::{Deserialize, Serialize};

/// Arguments pushed by the host with every render event
///
/// Every field is optional; an absent field means "no update".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderArgs {
    /// Full conversation to display (replaces the local one when non-empty)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    /// Name the host knows the user by
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Host session identifier (used for log context only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Cache-busting stamp some hosts attach to every render
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl RenderArgs {
    /// Render payload carrying only a conversation
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages: Some(messages),
            ..Self::default()
        }
    }

    /// Render payload carrying only a user name
    pub fn with_user_name(user_name: impl Into<String>) -> Self {
        Self {
            user_name: Some(user_name.into()),
            ..Self::default()
        }
    }
}

/// Value the widget hands back to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OutboundValue {
    /// Free text typed by the user
    SendMessage {
        /// Message text, forwarded verbatim
        message: String,
        /// Current identity
        user_name: String,
    },
    /// Predefined shortcut directive
    SendCommand {
        /// Command text, forwarded verbatim
        command: String,
        /// Current identity
        user_name: String,
    },
    /// Identity chosen (or skipped) by the user
    SetName {
        /// Settled name
        user_name: String,
    },
}

impl OutboundValue {
    /// Action tag as it appears on the wire
    pub fn action(&self) -> &'static str {
        match self {
            OutboundValue::SendMessage { .. } => "send_message",
            OutboundValue::SendCommand { .. } => "send_command",
            OutboundValue::SetName { .. } => "set_name",
        }
    }
}

/// Host-to-widget line on a serialized transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// New arguments for the widget
    Render {
        /// Render payload (defaults to empty when omitted)
        #[serde(default)]
        args: RenderArgs,
    },
}

/// Widget-to-host lifecycle and value signals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostSignal {
    /// The widget is listening for render events
    ComponentReady,
    /// Resize the widget viewport
    SetFrameHeight {
        /// Height in pixels
        height: u32,
    },
    /// Deliver a user action to the host
    SetComponentValue {
        /// The outbound value
        value: OutboundValue,
    },
}

/// Events processed by the bridge, in delivery order
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// Host pushed new arguments
    Render(RenderArgs),
    /// Standalone responder produced a reply
    MockReply(Message),
}

/// Decode one inbound line
pub fn decode_host_event(line: &str) -> Result<HostEvent, WidgetError> {
    Ok(serde_json::from_str(line.trim())?)
}

/// Encode one outbound signal as a single JSON line (without newline)
pub fn encode_signal(signal: &HostSignal) -> Result<String, WidgetError> {
    Ok(serde_json::to_string(signal)?)
}
