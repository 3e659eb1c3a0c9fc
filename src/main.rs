//! Room controller firmware: main entry point.
//!
//! Hexagonal architecture with a single cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    SocketIoAdapter    Esp32TimeAdapter        │
//! │  (Sensor+Actuator)  (EventSocket)      (ClockPort)             │
//! │  WifiStation                                                   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Controller (pure logic)                   │    │
//! │  │  Session · Channels · RegulationCycle                  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{info, warn};

use roomctl::adapters::hardware::HardwareAdapter;
use roomctl::adapters::socketio::SocketIoAdapter;
use roomctl::adapters::time::Esp32TimeAdapter;
use roomctl::adapters::wifi::{WifiCredentials, WifiStation};
use roomctl::app::ports::ClockPort;
use roomctl::app::service::Controller;
use roomctl::config::ControllerConfig;
use roomctl::drivers::hw_init::{self, GpioOutput};
use roomctl::drivers::relay::Relay;
use roomctl::pins;

/// Pause between loop passes; bounds inbound event latency.
const LOOP_PERIOD_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("roomctl v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = ControllerConfig::default();
    config.validate().context("controller configuration")?;

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().context("peripheral init")?;
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 4. WiFi ───────────────────────────────────────────────
    let wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;
    let credentials = WifiCredentials::new(&config.wifi_ssid, &config.wifi_password)?;
    let mut station = WifiStation::new(wifi, credentials);
    if let Err(e) = station.connect() {
        warn!("WiFi: {e}; retrying from the main loop");
    }

    // ── 5. Adapters ───────────────────────────────────────────
    let mut socket = SocketIoAdapter::connect(&config.server_uri())?;
    let mut hw = HardwareAdapter::new(
        Relay::new(
            GpioOutput::new(pins::HEATER_OUTPUT_GPIO),
            pins::HEATER_OUTPUT_GPIO,
        ),
        Relay::new(
            GpioOutput::new(pins::VENTILATION_OUTPUT_GPIO),
            pins::VENTILATION_OUTPUT_GPIO,
        ),
    );
    let clock = Esp32TimeAdapter::new();
    let mut controller = Controller::new(config);

    // ── 6. Cooperative loop ───────────────────────────────────
    info!("entering control loop");
    loop {
        let now = clock.now_ms();
        station.poll(now);
        socket.service(now);
        controller.step(now, &mut hw, &mut socket);
        FreeRtos::delay_ms(LOOP_PERIOD_MS);
    }
}
