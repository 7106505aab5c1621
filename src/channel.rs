//! Real-time channel abstraction
//!
//! This module defines the trait for sending invocations to the game server.
//! The channel abstraction keeps the engine free of network I/O: embeddings
//! might back it with a WebSocket, SignalR, or an in-memory test double.
//! Transport-level reconnection is the channel's concern, not the engine's.

use thiserror::Error;

use super::Invocation;

/// Errors that can occur when invoking a remote operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The channel is not currently connected to the server
    #[error("channel is not connected")]
    Disconnected,
    /// The server rejected the invocation
    #[error("invocation rejected: {0}")]
    Rejected(String),
}

/// Trait for sending invocations through a real-time channel
///
/// Implementations transmit the invocation to the server and report whether
/// the send was accepted. The engine treats a returned error as a connection
/// error: it surfaces it and leaves its own state untouched so the user can
/// retry.
pub trait Channel {
    /// Sends an invocation to the server
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disconnected`] when the channel has no connection,
    /// or [`Error::Rejected`] when the server refuses the invocation.
    fn invoke(&self, invocation: &Invocation) -> Result<(), Error>;
}
