//! Unified error types for the room controller firmware.
//!
//! A single `Error` enum for the link and config layers.  Sensor and
//! actuator ports report their own `SensorError` and `ActuatorError`,
//! which are logged where they occur.  All variants are `Copy`
//! so they can be passed through the control loop and logged without
//! allocation.  None of them is ever allowed to stop the loop:
//! callers log the error and skip the affected message, field or channel.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The event socket is down or refused a message.
    Transport(TransportError),
    /// An inbound packet or payload could not be understood.
    Protocol(ProtocolError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Recovered by falling back to the unauthenticated state (disconnect) or by
/// dropping the outbound message (send failure).  Never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No open connection to the server.
    NotConnected,
    /// The socket refused or failed to queue the frame.
    SendFailed,
    /// Outbound payload did not fit the frame buffer.
    FrameTooLarge,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::SendFailed => write!(f, "send failed"),
            Self::FrameTooLarge => write!(f, "frame too large"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

/// Malformed inbound data.  The payload is discarded and prior state kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Event name is not part of the server protocol.
    UnknownEvent,
    /// Payload is not valid JSON.
    MalformedJson,
    /// `setpoints` payload is valid JSON but not an object.
    NotAnObject,
    /// A recognised channel carried something other than a number or `"none"`.
    InvalidSetpoint(&'static str),
    /// Socket frame could not be decoded.
    MalformedPacket,
    /// Event name exceeds the fixed name buffer.
    EventNameTooLong,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEvent => write!(f, "unknown event"),
            Self::MalformedJson => write!(f, "malformed JSON"),
            Self::NotAnObject => write!(f, "payload is not a JSON object"),
            Self::InvalidSetpoint(key) => write!(f, "invalid setpoint for channel {key}"),
            Self::MalformedPacket => write!(f, "malformed packet"),
            Self::EventNameTooLong => write!(f, "event name too long"),
        }
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Channel identifier does not name an analog sensor.
    UnknownChannel,
    /// Raw sample is outside the ADC range.
    OutOfRange { raw: u16 },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChannel => write!(f, "unknown sensor channel"),
            Self::OutOfRange { raw } => write!(f, "raw sample {raw} out of range"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
    /// No relay is wired to the requested pin.
    UnknownPin(u8),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::UnknownPin(pin) => write!(f, "no actuator on GPIO {pin}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
