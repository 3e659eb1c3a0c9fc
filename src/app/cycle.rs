//! Regulation cycle: the periodic control-and-report pass.
//!
//! ```text
//!   Idle ──(authenticated && deadline passed)──▶ Tick ──re-arm──▶ Idle
//!
//!   Tick:
//!     1. sample temperature, CO2           (one read each)
//!     2. hysteresis for each active channel → relay write + ControlledItemID
//!     3. gate temperature, CO2, die temp   → SensorID
//! ```
//!
//! Every value that reaches a controller or gate is rounded to one decimal.

use log::{debug, warn};

use crate::control::threshold::round_one_decimal;
use crate::link::messages::{OutboundEvent, emit_logged};
use crate::link::transport::EventSocket;
use crate::sensors::SensorReader;
use crate::timer::IntervalTimer;

use super::channel::{ChannelId, ChannelTable};
use super::ports::{ActuatorPort, SensorPort};

/// Periodic driver for regulation and reporting.
#[derive(Debug, Clone)]
pub struct RegulationCycle {
    timer: IntervalTimer,
    reader: SensorReader,
    ticks: u64,
}

impl RegulationCycle {
    pub fn new(interval_ms: u32, reader: SensorReader) -> Self {
        Self {
            timer: IntervalTimer::new(interval_ms),
            reader,
            ticks: 0,
        }
    }

    /// Make the next authenticated poll tick straight away.
    pub fn restart(&mut self) {
        self.timer.disarm();
    }

    /// Run one tick if it is due.  Returns `true` when a tick ran.
    ///
    /// While unauthenticated the deadline stays disarmed.
    pub fn poll(
        &mut self,
        now_ms: u64,
        authenticated: bool,
        channels: &mut ChannelTable,
        hw: &mut (impl SensorPort + ActuatorPort),
        socket: &mut impl EventSocket,
    ) -> bool {
        if !authenticated {
            self.timer.disarm();
            return false;
        }
        if !self.timer.poll(now_ms) {
            return false;
        }
        self.tick(channels, hw, socket);
        true
    }

    /// One full pass, regardless of the timer.
    pub fn tick(
        &mut self,
        channels: &mut ChannelTable,
        hw: &mut (impl SensorPort + ActuatorPort),
        socket: &mut impl EventSocket,
    ) {
        self.ticks += 1;

        // 1. Sample
        let samples = ChannelId::REGULATED.map(|id| match self.reader.read(id, hw) {
            Ok(v) => Some(round_one_decimal(v)),
            Err(e) => {
                warn!("cycle: {id} skipped: {e}");
                None
            }
        });

        // 2. Setpoint following
        for (ch, sample) in channels.regulated_mut().into_iter().zip(samples) {
            let (Some(setpoint), Some(value)) = (ch.setpoint(), sample) else {
                continue;
            };
            if let Some(on) = ch.controller_mut().update(setpoint, value) {
                debug!("cycle: {} -> {}", ch.id(), if on { "on" } else { "off" });
                hw.write_actuator(ch.actuator_pin(), on);
                emit_logged(
                    socket,
                    &OutboundEvent::ActuatorChanged {
                        channel: ch.id(),
                        on,
                    },
                );
            }
        }

        // 3. Change reporting
        for (ch, sample) in channels.regulated_mut().into_iter().zip(samples) {
            let Some(value) = sample else { continue };
            if ch.gate_mut().check(value) {
                emit_logged(
                    socket,
                    &OutboundEvent::Measurement {
                        channel: ch.id(),
                        value,
                    },
                );
            }
        }

        match self.reader.read(ChannelId::InternalTemperature, hw) {
            Ok(v) => {
                let value = round_one_decimal(v);
                if channels.internal_gate_mut().check(value) {
                    emit_logged(
                        socket,
                        &OutboundEvent::Measurement {
                            channel: ChannelId::InternalTemperature,
                            value,
                        },
                    );
                }
            }
            Err(e) => warn!("cycle: internal temperature skipped: {e}"),
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn timer(&self) -> &IntervalTimer {
        &self.timer
    }
}
