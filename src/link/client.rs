//! Sans-IO Socket.IO client.
//!
//! Owns the protocol state (open/connected, heartbeat, inbound queue) and
//! writes frames through a [`FrameSink`].  The WebSocket adapter feeds it
//! received frames and link-down notifications; the controller sees it as an
//! [`EventSocket`].
//!
//! ```text
//!  ws text ──on_frame()──▶ ┌────────────────┐ ──poll()──▶ Controller
//!  ws down ──on_closed()─▶ │ SocketIoClient │
//!  clock ──heartbeat()───▶ └────────────────┘ ◀──emit()── Controller
//!                                 │
//!                                 ▼ FrameSink::send_text
//! ```

use heapless::Deque;
use log::{debug, warn};

use crate::error::TransportError;

use super::codec::{self, DEFAULT_PING_INTERVAL_MS, PING_FRAME, PONG_FRAME, Packet};
use super::transport::{EventSocket, RawEvent};

/// Inbound events buffered between two controller steps.
pub const INBOUND_QUEUE_LEN: usize = 8;

/// Write side of the underlying WebSocket.
pub trait FrameSink {
    fn send_text(&mut self, frame: &str) -> Result<(), TransportError>;
}

/// Socket.IO protocol state over an arbitrary frame sink.
pub struct SocketIoClient<S: FrameSink> {
    sink: S,
    inbound: Deque<RawEvent, INBOUND_QUEUE_LEN>,
    /// Engine.IO handshake seen.
    open: bool,
    /// Socket.IO `40` seen.
    connected: bool,
    ping_interval_ms: u32,
    last_ping_ms: Option<u64>,
}

impl<S: FrameSink> SocketIoClient<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            inbound: Deque::new(),
            open: false,
            connected: false,
            ping_interval_ms: DEFAULT_PING_INTERVAL_MS,
            last_ping_ms: None,
        }
    }

    /// Feed one received text frame.
    pub fn on_frame(&mut self, frame: &str) {
        let packet = match codec::decode(frame) {
            Ok(p) => p,
            Err(e) => {
                warn!("socket: dropping frame: {e}");
                return;
            }
        };
        match packet {
            Packet::Open { ping_interval_ms } => {
                debug!("socket: engine open, ping every {ping_interval_ms} ms");
                self.open = true;
                self.ping_interval_ms = ping_interval_ms;
                self.last_ping_ms = None;
            }
            Packet::Ping => {
                if let Err(e) = self.sink.send_text(PONG_FRAME) {
                    warn!("socket: pong failed: {e}");
                }
            }
            Packet::Pong | Packet::Other => {}
            Packet::Connect => {
                self.connected = true;
                self.enqueue(RawEvent::connected());
            }
            Packet::Disconnect | Packet::Close => self.on_closed(),
            Packet::Event(ev) => {
                if self.connected {
                    self.enqueue(ev);
                } else {
                    warn!("socket: event '{}' before connect dropped", ev.name);
                }
            }
        }
    }

    /// Underlying link went away.  Queues a single `disconnect`.
    pub fn on_closed(&mut self) {
        let was_connected = self.connected;
        self.open = false;
        self.connected = false;
        self.last_ping_ms = None;
        if was_connected {
            self.enqueue(RawEvent::disconnected());
        }
    }

    /// Send an Engine.IO ping when one interval has passed since the last.
    pub fn heartbeat(&mut self, now_ms: u64) {
        if !self.open {
            return;
        }
        let due = match self.last_ping_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= u64::from(self.ping_interval_ms),
        };
        if !due {
            return;
        }
        self.last_ping_ms = Some(now_ms);
        if let Err(e) = self.sink.send_text(PING_FRAME) {
            warn!("socket: ping failed: {e}");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn ping_interval_ms(&self) -> u32 {
        self.ping_interval_ms
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Queue an inbound event.  When full, a server event is dropped, but
    /// `connect`/`disconnect` always get in by evicting the oldest server
    /// event.
    fn enqueue(&mut self, ev: RawEvent) {
        if self.inbound.is_full() && ev.is_lifecycle() {
            self.evict_oldest_server_event();
        }
        if let Err(ev) = self.inbound.push_back(ev) {
            warn!("socket: inbound queue full, dropping '{}'", ev.name);
        }
    }

    fn evict_oldest_server_event(&mut self) {
        let mut kept = Deque::new();
        let mut evicted = false;
        while let Some(ev) = self.inbound.pop_front() {
            if !evicted && !ev.is_lifecycle() {
                warn!("socket: inbound queue full, evicting '{}'", ev.name);
                evicted = true;
                continue;
            }
            // Never more than the queue just held.
            let _ = kept.push_back(ev);
        }
        self.inbound = kept;
        if !evicted {
            // Only lifecycle events queued; the oldest is superseded.
            self.inbound.pop_front();
        }
    }
}

impl<S: FrameSink> EventSocket for SocketIoClient<S> {
    fn poll(&mut self) -> Option<RawEvent> {
        self.inbound.pop_front()
    }

    fn emit(&mut self, event: &str, payload: &str) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        let frame = codec::encode_event(event, payload)?;
        self.sink.send_text(&frame)
    }
}
