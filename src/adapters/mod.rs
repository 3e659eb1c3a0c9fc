//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                 | Connects to              |
//! |-------------|----------------------------|--------------------------|
//! | `hardware`  | SensorPort, ActuatorPort   | ESP32 ADC1, relay GPIOs  |
//! | `socketio`  | EventSocket                | esp_websocket_client     |
//! | `time`      | ClockPort                  | ESP32 system timer       |
//! | `wifi`      |:                          | ESP-IDF WiFi STA         |

pub mod hardware;
pub mod socketio;
pub mod time;
pub mod wifi;
