//! Event-socket abstraction: named events in, named events out.
//!
//! The device implementation is
//! [`SocketIoClient`](super::client::SocketIoClient) over a WebSocket
//! (ESP-IDF `esp_websocket_client`).  The controller is generic over
//! [`EventSocket`], so tests drive it with a scripted socket and never touch
//! the wire format.

use alloc::string::String;

use crate::error::{ProtocolError, TransportError};

/// Longest event name accepted from the wire.
pub const MAX_EVENT_NAME: usize = 32;

/// Fixed-capacity event name.
pub type EventName = heapless::String<MAX_EVENT_NAME>;

/// Lifecycle event names surfaced alongside server events.
pub const CONNECT_EVENT: &str = "connect";
pub const DISCONNECT_EVENT: &str = "disconnect";

/// One inbound event as delivered by the socket.
///
/// `payload` is the event argument with any JSON string quoting already
/// removed; lifecycle events carry an empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub name: EventName,
    pub payload: String,
}

impl RawEvent {
    pub fn new(name: &str, payload: &str) -> Result<Self, ProtocolError> {
        let mut n = EventName::new();
        n.push_str(name).map_err(|()| ProtocolError::EventNameTooLong)?;
        Ok(Self {
            name: n,
            payload: String::from(payload),
        })
    }

    pub fn connected() -> Self {
        Self::lifecycle(CONNECT_EVENT)
    }

    pub fn disconnected() -> Self {
        Self::lifecycle(DISCONNECT_EVENT)
    }

    /// `connect` or `disconnect`, as opposed to a server event.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self.name.as_str(), CONNECT_EVENT | DISCONNECT_EVENT)
    }

    fn lifecycle(name: &'static str) -> Self {
        let mut n = EventName::new();
        // Both lifecycle names are far below MAX_EVENT_NAME.
        let _ = n.push_str(name);
        Self {
            name: n,
            payload: String::new(),
        }
    }
}

/// Bidirectional named-event channel to the supervisory server.
pub trait EventSocket {
    /// Next queued inbound event, if any.  Never blocks.
    fn poll(&mut self) -> Option<RawEvent>;

    /// Send `event` with an already JSON-encoded `payload`.
    fn emit(&mut self, event: &str, payload: &str) -> Result<(), TransportError>;
}
