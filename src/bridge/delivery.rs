//! Delivery strategies
//!
//! What happens to a user action depends on whether a host is present. The
//! choice is made once when the bridge is built; afterwards the bridge talks
//! to a `Box<dyn Delivery>` and never checks the mode again.

use super::host::{HostChannel, ListenerId};
use super::protocol::{OutboundValue, WidgetEvent};
use crate::chat::{is_directive, Message};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Canned reply used by the standalone responder
pub const MOCK_REPLY: &str =
    "Thank you for your message. This is a standalone demo mode without backend connection.";

/// Reply the standalone responder gives to `text`
pub fn mock_reply(text: &str) -> String {
    if is_directive(text) {
        format!(
            "You've used a command: {}. In the full version, this would trigger specific training content.",
            text
        )
    } else {
        MOCK_REPLY.to_string()
    }
}

/// Bridge state a strategy may touch while delivering
pub(crate) struct DeliveryContext<'a> {
    /// Local conversation
    pub conversation: &'a mut Vec<Message>,
    /// Name attached to outbound values
    pub user_name: &'a str,
    /// Queue feeding the bridge's event loop
    pub events: &'a UnboundedSender<WidgetEvent>,
}

/// Mode-specific side of the bridge operations
///
/// Gating (blank input, reply in flight) is done by the bridge before any of
/// these are called.
pub(crate) trait Delivery: Send {
    /// Whether a host is present
    fn is_connected(&self) -> bool;

    /// Register for render events and announce readiness
    fn attach(&mut self, events: &UnboundedSender<WidgetEvent>, frame_height: u32);

    /// Drop the render subscription, if any
    fn detach(&mut self);

    /// Deliver a free-text message
    fn send_message(&mut self, ctx: DeliveryContext<'_>, text: &str);

    /// Deliver a `!`-prefixed directive
    fn send_command(&mut self, ctx: DeliveryContext<'_>, command: &str);

    /// Report a name the user entered
    fn submit_name(&mut self, user_name: &str);

    /// Report that the user kept the placeholder name
    fn skip_name(&mut self, placeholder: &str);

    /// Ask for the viewport to be resized
    fn request_layout(&mut self, height: u32);
}

/// Delivery through a host channel
pub(crate) struct HostDelivery {
    host: Box<dyn HostChannel>,
    listener: Option<ListenerId>,
}

impl HostDelivery {
    pub(crate) fn new(host: Box<dyn HostChannel>) -> Self {
        Self {
            host,
            listener: None,
        }
    }

    fn emit_value(&mut self, value: OutboundValue) {
        debug!(action = value.action(), "Sending value to host");
        if let Err(e) = self.host.set_component_value(&value) {
            warn!(action = value.action(), error = %e, "Failed to emit value to host");
        }
    }
}

impl Delivery for HostDelivery {
    fn is_connected(&self) -> bool {
        true
    }

    fn attach(&mut self, events: &UnboundedSender<WidgetEvent>, frame_height: u32) {
        if let Some(id) = self.listener {
            debug!(listener_id = %id, "Render listener already registered");
            return;
        }
        self.listener = Some(self.host.subscribe(events.clone()));

        if let Err(e) = self.host.set_component_ready() {
            warn!(error = %e, "Failed to signal readiness to host");
        }
        self.request_layout(frame_height);
    }

    fn detach(&mut self) {
        if let Some(id) = self.listener.take() {
            self.host.unsubscribe(id);
        }
    }

    fn send_message(&mut self, ctx: DeliveryContext<'_>, text: &str) {
        self.emit_value(OutboundValue::SendMessage {
            message: text.to_string(),
            user_name: ctx.user_name.to_string(),
        });
    }

    fn send_command(&mut self, ctx: DeliveryContext<'_>, command: &str) {
        self.emit_value(OutboundValue::SendCommand {
            command: command.to_string(),
            user_name: ctx.user_name.to_string(),
        });
    }

    fn submit_name(&mut self, user_name: &str) {
        self.emit_value(OutboundValue::SetName {
            user_name: user_name.to_string(),
        });
    }

    fn skip_name(&mut self, placeholder: &str) {
        self.submit_name(placeholder);
    }

    fn request_layout(&mut self, height: u32) {
        if let Err(e) = self.host.set_frame_height(height) {
            warn!(height, error = %e, "Failed to request layout from host");
        }
    }
}

/// Local echo with synthesized replies
pub(crate) struct StandaloneDelivery {
    delay: Duration,
}

impl StandaloneDelivery {
    pub(crate) fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Append `text` as a user message and schedule the mock reply
    fn echo(&self, ctx: DeliveryContext<'_>, text: &str) {
        ctx.conversation.push(Message::user(text));

        let reply = WidgetEvent::MockReply(Message::assistant(mock_reply(text)));
        let events = ctx.events.clone();
        let delay = self.delay;

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    // bridge may be gone by now; that is fine
                    let _ = events.send(reply);
                });
            }
            Err(_) => {
                debug!("No async runtime, queueing mock reply without delay");
                let _ = events.send(reply);
            }
        }
    }
}

impl Delivery for StandaloneDelivery {
    fn is_connected(&self) -> bool {
        false
    }

    fn attach(&mut self, _events: &UnboundedSender<WidgetEvent>, _frame_height: u32) {}

    fn detach(&mut self) {}

    fn send_message(&mut self, ctx: DeliveryContext<'_>, text: &str) {
        self.echo(ctx, text);
    }

    fn send_command(&mut self, ctx: DeliveryContext<'_>, command: &str) {
        self.echo(ctx, command);
    }

    fn submit_name(&mut self, _user_name: &str) {}

    fn skip_name(&mut self, _placeholder: &str) {}

    fn request_layout(&mut self, _height: u32) {}
}
