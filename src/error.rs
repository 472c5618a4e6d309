//! Error types for the widget
//!
//! None of these are fatal to a widget session: the bridge logs emission
//! failures and keeps going. They surface from configuration validation,
//! host channel emission, and wire decoding.

use thiserror::Error;

/// Widget-level error types
#[derive(Error, Debug)]
pub enum WidgetError {
    /// A wire payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading from or writing to the host transport failed
    #[error("Transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The host side of the channel has gone away
    #[error("Host disconnected")]
    HostDisconnected,

    /// Configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
