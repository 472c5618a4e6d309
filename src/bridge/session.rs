//! Chat bridge session
//!
//! Owns the widget's conversation, identity, and connection flags for one
//! mount, and mediates every exchange with the host. All mutation goes through
//! `&mut self`: render events are queued and applied one at a time, and user
//! actions are applied immediately.

use super::delivery::{Delivery, DeliveryContext, HostDelivery, StandaloneDelivery};
use super::host::HostContext;
use super::protocol::{RenderArgs, WidgetEvent};
use crate::chat::{BridgeState, Message, ParsedMessage, SessionIdentity};
use crate::config::WidgetConfig;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

/// Result of an outbound operation
///
/// Everything except `Sent` is a silent no-op for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Delivered to the host or to the standalone responder
    Sent,
    /// Input was empty or whitespace
    Blank,
    /// A previous send is still awaiting its reply
    Busy,
    /// The widget has been unmounted
    Unmounted,
}

/// Widget session bridging the UI and the host
pub struct ChatBridge {
    config: WidgetConfig,
    delivery: Box<dyn Delivery>,
    messages: Vec<Message>,
    identity: SessionIdentity,
    state: BridgeState,
    name_prompt_visible: bool,
    session_id: Option<String>,
    mounted: bool,
    events_tx: UnboundedSender<WidgetEvent>,
    events_rx: UnboundedReceiver<WidgetEvent>,
}

impl ChatBridge {
    /// Create a bridge for one widget mount
    ///
    /// # Arguments
    /// * `config` - Widget configuration
    /// * `context` - Whether a host is present; fixed for the bridge's lifetime
    ///
    /// The conversation starts with the configured welcome message and the
    /// identity starts as the unconfirmed placeholder.
    pub fn new(config: WidgetConfig, context: HostContext) -> Self {
        let delivery: Box<dyn Delivery> = match context {
            HostContext::Embedded(host) => Box::new(HostDelivery::new(host)),
            HostContext::Standalone => Box::new(StandaloneDelivery::new(config.mock_delay)),
        };
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        debug!(connected = delivery.is_connected(), "Creating chat bridge");

        Self {
            messages: vec![Message::assistant(config.welcome_message.clone())],
            identity: SessionIdentity::placeholder(&config.default_user_name),
            state: BridgeState {
                connected: delivery.is_connected(),
                awaiting_reply: false,
            },
            name_prompt_visible: true,
            session_id: None,
            mounted: true,
            delivery,
            config,
            events_tx,
            events_rx,
        }
    }

    /// Connect to the host
    ///
    /// Registers the render listener, signals readiness, and requests the
    /// initial layout. Calling it again does nothing. Standalone bridges have
    /// nothing to connect to.
    pub fn initialize(&mut self) {
        if !self.mounted {
            return;
        }
        self.delivery
            .attach(&self.events_tx, self.config.frame_height);
        info!(connected = self.state.connected, "Chat bridge initialized");
    }

    /// Apply arguments pushed by the host
    ///
    /// * a non-empty `messages` list replaces the conversation and ends the
    ///   wait for a reply; an empty or missing list changes nothing
    /// * a non-blank `user_name` other than the placeholder settles the
    ///   identity and hides the name prompt, unless the identity is already
    ///   settled
    ///
    /// A layout request follows every render.
    pub fn on_host_render(&mut self, args: RenderArgs) {
        if !self.mounted {
            debug!("Ignoring render event after unmount");
            return;
        }
        if let Some(session_id) = args.session_id {
            self.session_id = Some(session_id);
        }

        match args.messages {
            Some(messages) if !messages.is_empty() => {
                debug!(
                    session_id = ?self.session_id,
                    count = messages.len(),
                    "Replacing conversation from host"
                );
                self.messages = messages;
                self.state.awaiting_reply = false;
            }
            _ => {}
        }

        if let Some(name) = args.user_name {
            self.adopt_host_name(&name);
        }

        self.request_layout(self.config.frame_height);
    }

    fn adopt_host_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() || name == self.config.default_user_name {
            return;
        }
        if self.identity.name_confirmed {
            if name != self.identity.user_name {
                debug!(
                    session_id = ?self.session_id,
                    "Identity already settled, ignoring host-provided name"
                );
            }
            return;
        }
        info!(session_id = ?self.session_id, "Identity provided by host");
        self.identity = SessionIdentity::confirmed(name);
        self.name_prompt_visible = false;
    }

    fn check_send(&self, text: &str) -> Option<SendOutcome> {
        if !self.mounted {
            Some(SendOutcome::Unmounted)
        } else if text.trim().is_empty() {
            Some(SendOutcome::Blank)
        } else if self.state.awaiting_reply {
            debug!("Send suppressed while awaiting reply");
            Some(SendOutcome::Busy)
        } else {
            None
        }
    }

    /// Send free text typed by the user
    ///
    /// Ignored when `text` is blank or a reply is still pending.
    pub fn send_message(&mut self, text: &str) -> SendOutcome {
        if let Some(outcome) = self.check_send(text) {
            return outcome;
        }
        let ctx = DeliveryContext {
            conversation: &mut self.messages,
            user_name: &self.identity.user_name,
            events: &self.events_tx,
        };
        self.delivery.send_message(ctx, text);
        self.state.awaiting_reply = true;
        SendOutcome::Sent
    }

    /// Send a predefined shortcut command
    ///
    /// Same gating as [`ChatBridge::send_message`]; the command text is not
    /// interpreted.
    pub fn send_command(&mut self, command: &str) -> SendOutcome {
        if let Some(outcome) = self.check_send(command) {
            return outcome;
        }
        let ctx = DeliveryContext {
            conversation: &mut self.messages,
            user_name: &self.identity.user_name,
            events: &self.events_tx,
        };
        self.delivery.send_command(ctx, command);
        self.state.awaiting_reply = true;
        SendOutcome::Sent
    }

    /// Settle the identity on the name the user entered
    ///
    /// # Returns
    /// * `true` - name applied (and sent to the host when present)
    /// * `false` - name blank, identity already settled, or unmounted
    pub fn submit_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if !self.mounted || name.is_empty() || self.identity.name_confirmed {
            return false;
        }
        self.identity = SessionIdentity::confirmed(name);
        self.name_prompt_visible = false;
        self.delivery.submit_name(name);
        info!(session_id = ?self.session_id, "User name submitted");
        true
    }

    /// Settle the identity on the placeholder name
    ///
    /// # Returns
    /// * `true` - placeholder applied (and sent to the host when present)
    /// * `false` - identity already settled, or unmounted
    pub fn skip_name(&mut self) -> bool {
        if !self.mounted || self.identity.name_confirmed {
            return false;
        }
        let placeholder = self.config.default_user_name.clone();
        self.delivery.skip_name(&placeholder);
        self.identity = SessionIdentity::confirmed(placeholder);
        self.name_prompt_visible = false;
        info!(session_id = ?self.session_id, "Name entry skipped");
        true
    }

    /// Ask the host to resize the widget to `height` pixels
    pub fn request_layout(&mut self, height: u32) {
        if self.mounted {
            self.delivery.request_layout(height);
        }
    }

    /// Apply one queued event
    pub fn handle_event(&mut self, event: WidgetEvent) {
        if !self.mounted {
            debug!("Dropping event after unmount");
            return;
        }
        match event {
            WidgetEvent::Render(args) => self.on_host_render(args),
            WidgetEvent::MockReply(reply) => {
                self.messages.push(reply);
                self.state.awaiting_reply = false;
            }
        }
    }

    /// Wait for the next render event or mock reply
    pub async fn next_event(&mut self) -> Option<WidgetEvent> {
        self.events_rx.recv().await
    }

    /// Take the next event if one is already queued
    pub fn try_next_event(&mut self) -> Option<WidgetEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Apply every event that is already queued, in delivery order
    ///
    /// # Returns
    /// * `usize` - number of events applied
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.try_next_event() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Tear down the host subscription and stop reacting to events
    ///
    /// A pending mock reply that fires afterwards is dropped.
    pub fn unmount(&mut self) {
        self.delivery.detach();
        if self.mounted {
            self.mounted = false;
            info!(session_id = ?self.session_id, "Chat bridge unmounted");
        }
    }

    /// Conversation in display order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Conversation with marker metadata split out of each message
    pub fn parsed_messages(&self) -> impl Iterator<Item = (&Message, ParsedMessage)> + '_ {
        self.messages.iter().map(|m| (m, m.parse()))
    }

    /// Current identity
    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// Connection flags
    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Whether a host is present
    pub fn is_connected(&self) -> bool {
        self.state.connected
    }

    /// Whether a send is outstanding
    pub fn is_awaiting_reply(&self) -> bool {
        self.state.awaiting_reply
    }

    /// Whether the name-entry prompt should be shown
    pub fn name_prompt_visible(&self) -> bool {
        self.name_prompt_visible
    }

    /// Session id last reported by the host
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// False after [`ChatBridge::unmount`]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Configuration the bridge was built with
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }
}

impl Drop for ChatBridge {
    fn drop(&mut self) {
        self.delivery.detach();
    }
}
