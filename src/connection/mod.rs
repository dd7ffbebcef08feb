//! Transport seams: how the room sends to a client and how a connection task
//! reads from one, without either knowing the concrete socket type.

use crate::response::Outbound;
use async_trait::async_trait;

pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Outbound half of one client connection, owned by the room.
#[async_trait]
pub trait SinkAdapter: Send {
    async fn send(&mut self, payload: Outbound) -> Result<(), TransportError>;

    /// Whether the underlying transport still counts as connected. Sinks that
    /// report `false` are silently skipped on broadcast, never retried.
    fn is_connected(&self) -> bool {
        true
    }
}

/// Inbound half of one client connection, owned by that client's task.
#[async_trait]
pub trait StreamAdapter: Send {
    /// The next text frame from the client, or `None` once the peer has
    /// disconnected. Disconnection is a signal, not an error: it ends the
    /// receive loop and hands control to the room's cleanup path.
    async fn next(&mut self) -> Option<String>;
}
