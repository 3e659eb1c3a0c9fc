//! Controller: the hexagonal core.
//!
//! [`Controller`] owns the session, the channel table and the regulation
//! cycle.  All I/O flows through port traits injected at call sites, making
//! the whole controller testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSocket (emit)
//!                 │        Controller         │
//! ActuatorPort ◀──│ Session · Channels · Cycle│ ◀── EventSocket (poll)
//!                 └──────────────────────────┘
//! ```
//!
//! One [`step`](Controller::step) is one pass of the cooperative loop: at
//! most one regulation tick, then every queued inbound event.

use log::{info, warn};

use crate::config::ControllerConfig;
use crate::link::messages::{
    InboundEvent, OutboundEvent, SetpointUpdate, SetpointValue, emit_logged,
};
use crate::link::transport::{EventSocket, RawEvent};
use crate::sensors::SensorReader;

use super::channel::{ChannelId, ChannelTable, Mode};
use super::cycle::RegulationCycle;
use super::ports::{ActuatorPort, SensorPort};
use super::session::{CredentialResult, SessionAction, SessionState};

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller {
    config: ControllerConfig,
    session: SessionState,
    channels: ChannelTable,
    cycle: RegulationCycle,
}

impl Controller {
    /// Build with the standard board wiring.
    pub fn new(config: ControllerConfig) -> Self {
        Self::with_reader(config, SensorReader::board_default())
    }

    pub fn with_reader(config: ControllerConfig, reader: SensorReader) -> Self {
        let channels = ChannelTable::from_config(&config);
        let cycle = RegulationCycle::new(config.regulation_interval_ms, reader);
        Self {
            config,
            session: SessionState::new(),
            channels,
            cycle,
        }
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// Run one loop pass: maybe tick, then drain inbound events.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], avoiding a double mutable borrow.
    pub fn step(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        socket: &mut impl EventSocket,
    ) {
        let authenticated = self.session.is_authenticated();
        self.cycle
            .poll(now_ms, authenticated, &mut self.channels, hw, socket);

        while let Some(raw) = socket.poll() {
            self.handle_inbound(&raw, hw, socket);
        }
    }

    // ── Inbound events ────────────────────────────────────────

    /// Dispatch one raw event.  Malformed events are logged and dropped.
    pub fn handle_inbound(
        &mut self,
        raw: &RawEvent,
        hw: &mut impl ActuatorPort,
        socket: &mut impl EventSocket,
    ) {
        match InboundEvent::parse(raw) {
            Ok(InboundEvent::Connected) => self.on_connected(socket),
            Ok(InboundEvent::Disconnected) => self.on_disconnected(),
            Ok(InboundEvent::Authentication(result)) => self.on_credential_result(result, socket),
            Ok(InboundEvent::Setpoints(update)) => self.on_setpoints(&update, hw),
            Err(e) => warn!("link: '{}' dropped: {e}", raw.name),
        }
    }

    pub fn on_connected(&mut self, socket: &mut impl EventSocket) {
        if self.session.on_connected() != SessionAction::SendCredential {
            return;
        }
        emit_logged(
            socket,
            &OutboundEvent::Authentication {
                credential: &self.config.server_credential,
            },
        );
    }

    /// Actuators keep their last commanded state.
    pub fn on_disconnected(&mut self) {
        self.session.on_disconnected();
    }

    pub fn on_credential_result(
        &mut self,
        result: CredentialResult,
        socket: &mut impl EventSocket,
    ) {
        let was_authenticated = self.session.is_authenticated();
        let action = self.session.on_credential_result(result);
        if !was_authenticated && self.session.is_authenticated() {
            self.channels.reset_gates();
            self.cycle.restart();
        }
        if let Some(SessionAction::SendRobotId) = action {
            emit_logged(
                socket,
                &OutboundEvent::RobotId {
                    id: &self.config.robot_id,
                },
            );
        }
    }

    /// Apply a validated `setpoints` payload.  Dropped unless authenticated.
    pub fn on_setpoints(&mut self, update: &SetpointUpdate, hw: &mut impl ActuatorPort) {
        if !self.session.is_authenticated() {
            warn!("setpoints: ignored while unauthenticated");
            return;
        }
        for &(id, value) in update.entries() {
            self.on_setpoint_update(id, value, hw);
        }
    }

    /// Change one channel's mode.
    pub fn on_setpoint_update(
        &mut self,
        id: ChannelId,
        value: SetpointValue,
        hw: &mut impl ActuatorPort,
    ) {
        let Some(ch) = self.channels.get_mut(id) else {
            warn!("setpoints: {id} is not regulated");
            return;
        };
        match value {
            SetpointValue::Surveillance => {
                if ch.enter_surveillance() {
                    info!("setpoints: {id} -> surveillance");
                    hw.write_actuator(ch.actuator_pin(), false);
                }
            }
            SetpointValue::Target(setpoint) => {
                if ch.mode() == Mode::Surveillance {
                    info!("setpoints: {id} -> active at {setpoint}");
                }
                ch.set_active(setpoint);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn channels(&self) -> &ChannelTable {
        &self.channels
    }

    pub fn cycle(&self) -> &RegulationCycle {
        &self.cycle
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}
