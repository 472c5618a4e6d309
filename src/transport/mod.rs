//! Host transports
//!
//! Serialized carriers connecting a [`crate::bridge::HostHandle`] to a real host.

pub mod stdio;

pub use stdio::{serve, serve_stdio};
