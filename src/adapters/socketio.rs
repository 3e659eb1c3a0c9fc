//! Socket.IO adapter: WebSocket transport for the server link.
//!
//! Implements [`EventSocket`] by wrapping a [`SocketIoClient`] around the
//! platform WebSocket.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_websocket_client` via
//!   `esp_idf_svc::ws::client`.  Its callback runs on the client task and
//!   forwards frames through an `mpsc` channel; [`SocketIoAdapter::service`]
//!   drains them on the main loop.
//! - **all other targets**: an in-memory WebSocket whose inbound frames are
//!   injected by tests and whose outbound frames are recorded.

use crate::error::TransportError;
use crate::link::client::{FrameSink, SocketIoClient};
use crate::link::transport::{EventSocket, RawEvent};

// ───────────────────────────────────────────────────────────────
// ESP-IDF WebSocket
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod platform {
    use core::time::Duration;
    use std::string::String;
    use std::sync::mpsc::{self, Receiver, Sender};

    use esp_idf_svc::io::EspIOError;
    use esp_idf_svc::ws::FrameType;
    use esp_idf_svc::ws::client::{
        EspWebSocketClient, EspWebSocketClientConfig, WebSocketEvent, WebSocketEventType,
    };
    use log::{info, warn};

    use super::{FrameSink, TransportError};

    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    const RECONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// What the WebSocket task hands to the main loop.
    pub enum WsInput {
        Text(String),
        Closed,
    }

    pub struct WsSink {
        client: EspWebSocketClient<'static>,
    }

    impl FrameSink for WsSink {
        fn send_text(&mut self, frame: &str) -> Result<(), TransportError> {
            self.client
                .send(FrameType::Text(false), frame.as_bytes())
                .map_err(|e| {
                    warn!("ws: send failed: {e}");
                    TransportError::SendFailed
                })
        }
    }

    fn forward(tx: &Sender<WsInput>, event: &Result<WebSocketEvent<'_>, EspIOError>) {
        let input = match event {
            Ok(ev) => match ev.event_type {
                WebSocketEventType::Text(text) => WsInput::Text(String::from(text)),
                WebSocketEventType::Connected => {
                    info!("ws: connected");
                    return;
                }
                WebSocketEventType::Disconnected
                | WebSocketEventType::Close(_)
                | WebSocketEventType::Closed => WsInput::Closed,
                _ => return,
            },
            Err(e) => {
                warn!("ws: {e}");
                return;
            }
        };
        // Receiver lives as long as the adapter; a send error means shutdown.
        let _ = tx.send(input);
    }

    pub fn open(uri: &str) -> Result<(WsSink, Receiver<WsInput>), EspIOError> {
        let (tx, rx) = mpsc::channel();
        let config = EspWebSocketClientConfig {
            reconnect_timeout_ms: RECONNECT_TIMEOUT,
            ..Default::default()
        };
        let client = EspWebSocketClient::new(
            uri,
            &config,
            CONNECT_TIMEOUT,
            move |event: &Result<WebSocketEvent<'_>, EspIOError>| forward(&tx, event),
        )?;
        Ok((WsSink { client }, rx))
    }
}

#[cfg(target_os = "espidf")]
pub struct SocketIoAdapter {
    client: SocketIoClient<platform::WsSink>,
    rx: std::sync::mpsc::Receiver<platform::WsInput>,
}

#[cfg(target_os = "espidf")]
impl SocketIoAdapter {
    /// Open the WebSocket to `uri`; Socket.IO connect follows asynchronously.
    pub fn connect(uri: &str) -> Result<Self, esp_idf_svc::io::EspIOError> {
        let (sink, rx) = platform::open(uri)?;
        log::info!("socket: opening {uri}");
        Ok(Self {
            client: SocketIoClient::new(sink),
            rx,
        })
    }

    /// Pump received frames into the client and send due heartbeats.
    pub fn service(&mut self, now_ms: u64) {
        while let Ok(input) = self.rx.try_recv() {
            match input {
                platform::WsInput::Text(frame) => self.client.on_frame(&frame),
                platform::WsInput::Closed => self.client.on_closed(),
            }
        }
        self.client.heartbeat(now_ms);
    }
}

// ───────────────────────────────────────────────────────────────
// Simulated WebSocket
// ───────────────────────────────────────────────────────────────

/// In-memory WebSocket that records every frame sent.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimWebSocket {
    sent: Vec<String>,
    pending: std::collections::VecDeque<Option<String>>,
}

#[cfg(not(target_os = "espidf"))]
impl FrameSink for SimWebSocket {
    fn send_text(&mut self, frame: &str) -> Result<(), TransportError> {
        self.sent.push(String::from(frame));
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
pub struct SocketIoAdapter {
    client: SocketIoClient<SimWebSocket>,
}

#[cfg(not(target_os = "espidf"))]
impl SocketIoAdapter {
    pub fn connect(uri: &str) -> Result<Self, TransportError> {
        if !uri.starts_with("ws://") {
            return Err(TransportError::NotConnected);
        }
        log::info!("socket(sim): opening {uri}");
        Ok(Self {
            client: SocketIoClient::new(SimWebSocket::default()),
        })
    }

    pub fn service(&mut self, now_ms: u64) {
        while let Some(input) = self.client.sink_mut().pending.pop_front() {
            match input {
                Some(frame) => self.client.on_frame(&frame),
                None => self.client.on_closed(),
            }
        }
        self.client.heartbeat(now_ms);
    }

    /// Queue a frame as if the server had sent it.
    pub fn sim_server_frame(&mut self, frame: &str) {
        self.client
            .sink_mut()
            .pending
            .push_back(Some(String::from(frame)));
    }

    /// Queue a link drop.
    pub fn sim_drop(&mut self) {
        self.client.sink_mut().pending.push_back(None);
    }

    /// Frames written so far.
    pub fn sim_sent(&self) -> &[String] {
        &self.client.sink().sent
    }

    pub fn sim_clear_sent(&mut self) {
        self.client.sink_mut().sent.clear();
    }
}

// ───────────────────────────────────────────────────────────────
// EventSocket
// ───────────────────────────────────────────────────────────────

impl EventSocket for SocketIoAdapter {
    fn poll(&mut self) -> Option<RawEvent> {
        self.client.poll()
    }

    fn emit(&mut self, event: &str, payload: &str) -> Result<(), TransportError> {
        self.client.emit(event, payload)
    }
}
