//! Host bridge
//!
//! Mediates all communication between the widget and its host runtime,
//! abstracting over whether a host is actually present.

pub mod delivery;
pub mod host;
pub mod protocol;
pub mod session;

pub use delivery::{mock_reply, MOCK_REPLY};
pub use host::{ChannelHost, HostChannel, HostContext, HostHandle, HostRenderer, ListenerId};
pub use protocol::{HostEvent, HostSignal, OutboundValue, RenderArgs, WidgetEvent};
pub use session::{ChatBridge, SendOutcome};
