//! Server link: event-socket port, Socket.IO framing, typed messages.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Link Stack                          │
//! │                                                          │
//! │  ┌──────────┐   ┌──────────┐   ┌───────────────────────┐ │
//! │  │ WebSocket│──▶│  Codec   │──▶│ SocketIoClient        │ │
//! │  │ (adapter)│   │ (frames) │   │ (EventSocket)         │ │
//! │  └──────────┘   └──────────┘   └──────────┬────────────┘ │
//! │                                           ▼              │
//! │                               messages → Controller      │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod codec;
pub mod messages;
pub mod transport;
