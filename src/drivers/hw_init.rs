//! One-shot hardware peripheral initialization and raw pin access.
//!
//! Configures the ADC1 oneshot unit and the relay GPIOs using raw ESP-IDF
//! sys calls.  Called once from `main()` before the control loop starts.
//!
//! On host builds every accessor is backed by simulation statics so tests
//! can inject ADC samples and observe GPIO levels.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

use core::convert::Infallible;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, AtomicU64, AtomicU8, Ordering};

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    NotAnAdcPin(u8),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={rc})"),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::NotAnAdcPin(pin) => write!(f, "GPIO {pin} has no ADC1 channel"),
        }
    }
}

impl core::error::Error for HwInitError {}

const ANALOG_INPUTS: [u8; 2] = [pins::TEMP_INPUT_GPIO, pins::CO2_INPUT_GPIO];
const RELAY_OUTPUTS: [u8; 2] = [pins::HEATER_OUTPUT_GPIO, pins::VENTILATION_OUTPUT_GPIO];

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    for pin in ANALOG_INPUTS {
        pins::adc1_channel(pin).ok_or(HwInitError::NotAnAdcPin(pin))?;
    }
    for pin in RELAY_OUTPUTS {
        gpio_write(pin, false);
    }
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for pin in ANALOG_INPUTS {
        let channel = pins::adc1_channel(pin).ok_or(HwInitError::NotAnAdcPin(pin))?;
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }

    info!("hw_init: ADC1 configured (GPIO35=temp, GPIO34=co2)");
    Ok(())
}

/// Raw code returned when a conversion fails.  Above the 12-bit range, so
/// the sensor layer rejects it as out of range instead of reading 0.
pub const ADC_READ_FAILED: u16 = u16::MAX;

/// One 12-bit conversion on an analog input GPIO, or [`ADC_READ_FAILED`].
#[cfg(target_os = "espidf")]
pub fn adc_read(pin: u8) -> u16 {
    let Some(channel) = pins::adc1_channel(pin) else {
        log::warn!("adc: GPIO {pin} has no ADC1 channel");
        return ADC_READ_FAILED;
    };
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        log::warn!("adc: read on GPIO {pin} failed (rc={ret})");
        return ADC_READ_FAILED;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
static SIM_ADC: [AtomicU16; 40] = [const { AtomicU16::new(0) }; 40];

#[cfg(not(target_os = "espidf"))]
pub fn adc_read(pin: u8) -> u16 {
    if pins::adc1_channel(pin).is_none() {
        return ADC_READ_FAILED;
    }
    SIM_ADC
        .get(usize::from(pin))
        .map_or(ADC_READ_FAILED, |a| a.load(Ordering::Relaxed))
}

/// Inject the next raw sample for `pin`.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(pin: u8, raw: u16) {
    if let Some(a) = SIM_ADC.get(usize::from(pin)) {
        a.store(raw, Ordering::Relaxed);
    }
}

// ── On-die temperature ────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" {
    /// ESP32 ROM routine; the misspelling is the exported symbol name.
    fn temprature_sens_read() -> u8;
}

/// Die temperature in whole °F.
#[cfg(target_os = "espidf")]
pub fn internal_temperature_fahrenheit() -> u8 {
    // SAFETY: ROM routine with no arguments; reads the on-die sensor.
    unsafe { temprature_sens_read() }
}

#[cfg(not(target_os = "espidf"))]
static SIM_DIE_F: AtomicU8 = AtomicU8::new(77);

#[cfg(not(target_os = "espidf"))]
pub fn internal_temperature_fahrenheit() -> u8 {
    SIM_DIE_F.load(Ordering::Relaxed)
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_internal_fahrenheit(f: u8) {
    SIM_DIE_F.store(f, Ordering::Relaxed);
}

// ── GPIO outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for pin in RELAY_OUTPUTS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(i32::from(pin), 0) };
    }

    info!("hw_init: relay outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: u8, high: bool) {
    // SAFETY: gpio_set_level writes to an output configured in
    // init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(i32::from(pin), u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
static SIM_GPIO_LEVELS: AtomicU64 = AtomicU64::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: u8, high: bool) {
    let bit = 1u64 << (pin & 63);
    if high {
        SIM_GPIO_LEVELS.fetch_or(bit, Ordering::Relaxed);
    } else {
        SIM_GPIO_LEVELS.fetch_and(!bit, Ordering::Relaxed);
    }
}

/// Last level written to `pin` (simulation only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_gpio_level(pin: u8) -> bool {
    SIM_GPIO_LEVELS.load(Ordering::Relaxed) & (1u64 << (pin & 63)) != 0
}

/// `embedded-hal` output pin over [`gpio_write`].
#[derive(Debug)]
pub struct GpioOutput {
    pin: u8,
}

impl GpioOutput {
    pub fn new(pin: u8) -> Self {
        Self { pin }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }
}

impl embedded_hal::digital::ErrorType for GpioOutput {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.pin, true);
        Ok(())
    }
}
