//! Host channel
//!
//! The capability the bridge is given when it runs embedded in a host. The
//! bridge never probes its environment: whoever constructs it decides whether
//! a host is present by passing a [`HostContext`].

use super::protocol::{HostSignal, OutboundValue, RenderArgs, WidgetEvent};
use crate::error::WidgetError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};
use uuid::Uuid;

/// Identifier of a registered render listener
pub type ListenerId = Uuid;

/// Operations a host runtime offers to an embedded widget
///
/// Emission is fire-and-forget: an `Err` only means the signal could not be
/// handed off, never that the host rejected it.
pub trait HostChannel: Send {
    /// Register a listener that receives a [`WidgetEvent::Render`] per render event
    fn subscribe(&mut self, listener: UnboundedSender<WidgetEvent>) -> ListenerId;

    /// Remove a listener; unknown ids are ignored
    fn unsubscribe(&mut self, id: ListenerId);

    /// Tell the host the widget is ready for render events
    fn set_component_ready(&mut self) -> Result<(), WidgetError>;

    /// Ask the host to resize the widget viewport
    fn set_frame_height(&mut self, height: u32) -> Result<(), WidgetError>;

    /// Deliver a user action to the host
    fn set_component_value(&mut self, value: &OutboundValue) -> Result<(), WidgetError>;
}

/// Whether the widget runs inside a host, decided once at construction
pub enum HostContext {
    /// A host is present and reachable through the channel
    Embedded(Box<dyn HostChannel>),
    /// No host; replies are synthesized locally
    Standalone,
}

impl HostContext {
    /// Wrap a host channel
    pub fn embedded(host: impl HostChannel + 'static) -> Self {
        HostContext::Embedded(Box::new(host))
    }

    /// True for [`HostContext::Embedded`]
    pub fn is_embedded(&self) -> bool {
        matches!(self, HostContext::Embedded(_))
    }
}

impl std::fmt::Debug for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostContext::Embedded(_) => f.write_str("Embedded"),
            HostContext::Standalone => f.write_str("Standalone"),
        }
    }
}

type ListenerMap = Arc<Mutex<HashMap<ListenerId, UnboundedSender<WidgetEvent>>>>;

fn lock(listeners: &ListenerMap) -> MutexGuard<'_, HashMap<ListenerId, UnboundedSender<WidgetEvent>>> {
    listeners.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process host channel
///
/// Created in pairs with a [`HostHandle`] that plays the host's side: it
/// pushes render events and reads back the signals the widget emitted.
pub struct ChannelHost {
    listeners: ListenerMap,
    signals: UnboundedSender<HostSignal>,
}

/// Host side of a [`ChannelHost`]
pub struct HostHandle {
    renderer: HostRenderer,
    signals: UnboundedReceiver<HostSignal>,
}

/// Cloneable sender of render events, detached from the signal stream
#[derive(Clone)]
pub struct HostRenderer {
    listeners: ListenerMap,
}

impl ChannelHost {
    /// Create a connected channel host and its handle
    pub fn pair() -> (ChannelHost, HostHandle) {
        let listeners: ListenerMap = Arc::new(Mutex::new(HashMap::new()));
        let (tx, rx) = mpsc::unbounded_channel();
        (
            ChannelHost {
                listeners: listeners.clone(),
                signals: tx,
            },
            HostHandle {
                renderer: HostRenderer { listeners },
                signals: rx,
            },
        )
    }

    fn emit(&self, signal: HostSignal) -> Result<(), WidgetError> {
        trace!(?signal, "Emitting host signal");
        self.signals
            .send(signal)
            .map_err(|_| WidgetError::HostDisconnected)
    }
}

impl HostChannel for ChannelHost {
    fn subscribe(&mut self, listener: UnboundedSender<WidgetEvent>) -> ListenerId {
        let id = Uuid::new_v4();
        lock(&self.listeners).insert(id, listener);
        debug!(listener_id = %id, "Render listener registered");
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        if lock(&self.listeners).remove(&id).is_some() {
            debug!(listener_id = %id, "Render listener removed");
        }
    }

    fn set_component_ready(&mut self) -> Result<(), WidgetError> {
        self.emit(HostSignal::ComponentReady)
    }

    fn set_frame_height(&mut self, height: u32) -> Result<(), WidgetError> {
        self.emit(HostSignal::SetFrameHeight { height })
    }

    fn set_component_value(&mut self, value: &OutboundValue) -> Result<(), WidgetError> {
        self.emit(HostSignal::SetComponentValue {
            value: value.clone(),
        })
    }
}

impl HostRenderer {
    /// Push a render event to every registered listener
    ///
    /// Listeners whose receiving side is gone are dropped.
    ///
    /// # Returns
    /// * `usize` - number of listeners the event was delivered to
    pub fn render(&self, args: RenderArgs) -> usize {
        let mut listeners = lock(&self.listeners);
        listeners.retain(|_, tx| !tx.is_closed());
        listeners
            .values()
            .filter(|tx| tx.send(WidgetEvent::Render(args.clone())).is_ok())
            .count()
    }

    /// Number of registered render listeners
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}

impl HostHandle {
    /// See [`HostRenderer::render`]
    pub fn render(&self, args: RenderArgs) -> usize {
        self.renderer.render(args)
    }

    /// Number of registered render listeners
    pub fn listener_count(&self) -> usize {
        self.renderer.listener_count()
    }

    /// A render sender that can be moved to another task
    pub fn renderer(&self) -> HostRenderer {
        self.renderer.clone()
    }

    /// Wait for the next signal emitted by the widget
    ///
    /// Returns `None` once the widget side has been dropped.
    pub async fn next_signal(&mut self) -> Option<HostSignal> {
        self.signals.recv().await
    }

    /// Take the next signal if one is already queued
    pub fn try_next_signal(&mut self) -> Option<HostSignal> {
        self.signals.try_recv().ok()
    }

    /// Take every queued signal
    pub fn drain_signals(&mut self) -> Vec<HostSignal> {
        let mut out = Vec::new();
        while let Some(signal) = self.try_next_signal() {
            out.push(signal);
        }
        out
    }
}
