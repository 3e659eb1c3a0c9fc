//! Typed server messages.
//!
//! Inbound [`RawEvent`]s are resolved into [`InboundEvent`] by name; the
//! controller only ever matches on the enum.  Outbound traffic is built as
//! [`OutboundEvent`] and serialised here, so the `sensorData` payload shapes
//! live in one place.

use alloc::string::String;
use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::app::channel::ChannelId;
use crate::app::session::CredentialResult;
use crate::error::{Error, ProtocolError};

use super::transport::{CONNECT_EVENT, DISCONNECT_EVENT, EventSocket, RawEvent};

/// Server-side event names.
pub const AUTHENTICATION_EVENT: &str = "authentication";
pub const SETPOINTS_EVENT: &str = "setpoints";
pub const ROBOT_ID_EVENT: &str = "robotID";
pub const SENSOR_DATA_EVENT: &str = "sensorData";

/// Setpoint literal that switches a channel to surveillance.
pub const SURVEILLANCE_LITERAL: &str = "none";

// ───────────────────────────────────────────────────────────────
// Inbound
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Connected,
    Disconnected,
    Authentication(CredentialResult),
    Setpoints(SetpointUpdate),
}

impl InboundEvent {
    pub fn parse(raw: &RawEvent) -> Result<Self, ProtocolError> {
        match raw.name.as_str() {
            CONNECT_EVENT => Ok(Self::Connected),
            DISCONNECT_EVENT => Ok(Self::Disconnected),
            AUTHENTICATION_EVENT => Ok(Self::Authentication(parse_credential_result(&raw.payload))),
            SETPOINTS_EVENT => SetpointUpdate::parse(&raw.payload).map(Self::Setpoints),
            _ => Err(ProtocolError::UnknownEvent),
        }
    }
}

/// Exactly `true` or `false`; everything else is malformed.
pub fn parse_credential_result(payload: &str) -> CredentialResult {
    match payload {
        "true" => CredentialResult::Accepted,
        "false" => CredentialResult::Rejected,
        _ => CredentialResult::Malformed,
    }
}

/// Value carried for one channel in a `setpoints` message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetpointValue {
    Surveillance,
    Target(f32),
}

/// Validated `setpoints` payload: at most one entry per regulated channel,
/// in channel order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetpointUpdate {
    entries: heapless::Vec<(ChannelId, SetpointValue), 2>,
}

impl SetpointUpdate {
    /// Parse a JSON object keyed by channel id.
    ///
    /// All-or-nothing: any recognised key with an unusable value rejects the
    /// whole payload.  Unknown keys and report-only channels are skipped.
    pub fn parse(payload: &str) -> Result<Self, ProtocolError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|_| ProtocolError::MalformedJson)?;
        let Value::Object(map) = value else {
            return Err(ProtocolError::NotAnObject);
        };

        for key in map.keys() {
            match ChannelId::from_key(key) {
                Some(id) if id.is_regulated() => {}
                Some(id) => warn!("setpoints: {id} has no actuator, key ignored"),
                None => warn!("setpoints: unknown key '{key}' ignored"),
            }
        }

        let mut update = Self::default();
        for id in ChannelId::REGULATED {
            let Some(v) = map.get(id.key()) else {
                continue;
            };
            let sp = parse_setpoint_value(v).ok_or(ProtocolError::InvalidSetpoint(id.key()))?;
            // Capacity equals the number of regulated channels.
            let _ = update.entries.push((id, sp));
        }
        Ok(update)
    }

    pub fn entries(&self) -> &[(ChannelId, SetpointValue)] {
        &self.entries
    }

    pub fn get(&self, id: ChannelId) -> Option<SetpointValue> {
        self.entries
            .iter()
            .find_map(|&(ch, v)| (ch == id).then_some(v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_setpoint_value(v: &Value) -> Option<SetpointValue> {
    let target = match v {
        Value::String(s) if s == SURVEILLANCE_LITERAL => return Some(SetpointValue::Surveillance),
        Value::String(s) => s.trim().parse::<f32>().ok()?,
        Value::Number(n) => n.as_f64()? as f32,
        _ => return None,
    };
    target.is_finite().then_some(SetpointValue::Target(target))
}

// ───────────────────────────────────────────────────────────────
// Outbound
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent<'a> {
    Authentication { credential: &'a str },
    RobotId { id: &'a str },
    ActuatorChanged { channel: ChannelId, on: bool },
    Measurement { channel: ChannelId, value: f32 },
}

#[derive(Serialize)]
struct ActuatorReport<'a> {
    #[serde(rename = "ControlledItemID")]
    controlled_item_id: &'a str,
    value: u8,
}

#[derive(Serialize)]
struct MeasurementReport<'a> {
    #[serde(rename = "SensorID")]
    sensor_id: &'a str,
    value: f32,
}

impl OutboundEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => AUTHENTICATION_EVENT,
            Self::RobotId { .. } => ROBOT_ID_EVENT,
            Self::ActuatorChanged { .. } | Self::Measurement { .. } => SENSOR_DATA_EVENT,
        }
    }

    /// JSON text of the event argument.
    pub fn payload(&self) -> Result<String, Error> {
        let json = match self {
            Self::Authentication { credential } => serde_json::to_string(credential),
            Self::RobotId { id } => serde_json::to_string(id),
            Self::ActuatorChanged { channel, on } => serde_json::to_string(&ActuatorReport {
                controlled_item_id: channel.key(),
                value: u8::from(*on),
            }),
            Self::Measurement { channel, value } => serde_json::to_string(&MeasurementReport {
                sensor_id: channel.key(),
                value: *value,
            }),
        };
        json.map_err(|_| Error::Protocol(ProtocolError::MalformedJson))
    }

    /// Encode and hand to the socket.
    pub fn send(&self, socket: &mut impl EventSocket) -> Result<(), Error> {
        let payload = self.payload()?;
        socket.emit(self.name(), &payload)?;
        Ok(())
    }
}

/// Send `event`, logging (not propagating) a failure.
pub fn emit_logged(socket: &mut impl EventSocket, event: &OutboundEvent<'_>) -> bool {
    match event.send(socket) {
        Ok(()) => true,
        Err(e) => {
            warn!("link: {} not sent: {e}", event.name());
            false
        }
    }
}
