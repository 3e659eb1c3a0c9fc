//! Socket.IO v2 / Engine.IO v3 text-frame codec.
//!
//! Wire format (one WebSocket text frame per packet):
//! ```text
//! ┌──────────┬───────────┬──────────────────────────────────┐
//! │ EIO type │ SIO type  │ body                             │
//! │ 1 digit  │ (type 4)  │                                  │
//! ├──────────┼───────────┼──────────────────────────────────┤
//! │ 0 open   │           │ {"sid":..,"pingInterval":25000}  │
//! │ 2 ping   │           │                                  │
//! │ 3 pong   │           │                                  │
//! │ 4 msg    │ 0 connect │ [/nsp]                           │
//! │ 4 msg    │ 1 discon. │ [/nsp]                           │
//! │ 4 msg    │ 2 event   │ [/nsp,][ack-id]["name",payload]  │
//! └──────────┴───────────┴──────────────────────────────────┘
//! ```
//!
//! Event payloads that are JSON strings are handed over unquoted; the
//! server double-encodes `setpoints` as a string holding a JSON object.

use alloc::string::String;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ProtocolError, TransportError};

use super::transport::RawEvent;

/// Largest outbound frame we are willing to build.
pub const MAX_FRAME_LEN: usize = 512;

/// Engine.IO heartbeat frames.
pub const PING_FRAME: &str = "2";
pub const PONG_FRAME: &str = "3";

/// Heartbeat period used until the server announces its own.
pub const DEFAULT_PING_INTERVAL_MS: u32 = 25_000;

/// One decoded text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Open { ping_interval_ms: u32 },
    Close,
    Ping,
    Pong,
    Connect,
    Disconnect,
    Event(RawEvent),
    /// Valid but irrelevant here (acks, errors, upgrade, noop).
    Other,
}

#[derive(Deserialize)]
struct OpenHandshake {
    #[serde(rename = "pingInterval")]
    ping_interval: Option<u32>,
}

// ── Decoding ─────────────────────────────────────────────────

/// Decode one text frame.
pub fn decode(frame: &str) -> Result<Packet, ProtocolError> {
    let mut chars = frame.chars();
    let eio = chars.next().ok_or(ProtocolError::MalformedPacket)?;
    let rest = chars.as_str();
    match eio {
        '0' => decode_open(rest),
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '4' => decode_message(rest),
        '5' | '6' => Ok(Packet::Other),
        _ => Err(ProtocolError::MalformedPacket),
    }
}

fn decode_open(body: &str) -> Result<Packet, ProtocolError> {
    let hs: OpenHandshake =
        serde_json::from_str(body).map_err(|_| ProtocolError::MalformedJson)?;
    Ok(Packet::Open {
        ping_interval_ms: hs.ping_interval.unwrap_or(DEFAULT_PING_INTERVAL_MS),
    })
}

fn decode_message(body: &str) -> Result<Packet, ProtocolError> {
    let mut chars = body.chars();
    let sio = chars.next().ok_or(ProtocolError::MalformedPacket)?;
    let rest = chars.as_str();
    match sio {
        '0' => Ok(Packet::Connect),
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(skip_ack_id(skip_namespace(rest))),
        '3'..='6' => Ok(Packet::Other),
        _ => Err(ProtocolError::MalformedPacket),
    }
}

/// Strip a leading `/nsp,` namespace prefix.
fn skip_namespace(body: &str) -> &str {
    if !body.starts_with('/') {
        return body;
    }
    match body.find(',') {
        Some(idx) => &body[idx + 1..],
        None => "",
    }
}

/// Strip a leading numeric ack id.
fn skip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn decode_event(body: &str) -> Result<Packet, ProtocolError> {
    let value: Value = serde_json::from_str(body).map_err(|_| ProtocolError::MalformedJson)?;
    let Value::Array(items) = value else {
        return Err(ProtocolError::MalformedPacket);
    };
    let mut items = items.into_iter();
    let Some(Value::String(name)) = items.next() else {
        return Err(ProtocolError::MalformedPacket);
    };
    let payload = match items.next() {
        None => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => {
            serde_json::to_string(&other).map_err(|_| ProtocolError::MalformedJson)?
        }
    };
    Ok(Packet::Event(RawEvent::new(&name, &payload)?))
}

// ── Encoding ─────────────────────────────────────────────────

/// Build `42["name",payload]` from an event name and a JSON payload.
pub fn encode_event(name: &str, payload_json: &str) -> Result<String, TransportError> {
    let quoted = serde_json::to_string(name).map_err(|_| TransportError::SendFailed)?;
    let len = 3 + quoted.len() + 1 + payload_json.len() + 1;
    if len > MAX_FRAME_LEN {
        return Err(TransportError::FrameTooLarge);
    }
    let mut frame = String::with_capacity(len);
    frame.push_str("42[");
    frame.push_str(&quoted);
    frame.push(',');
    frame.push_str(payload_json);
    frame.push(']');
    Ok(frame)
}
