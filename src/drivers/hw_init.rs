//! One-shot hardware peripheral initialization and raw register access.
//!
//! Configures ADC channels, GPIO directions, and LEDC timers/channels
//! using raw ESP-IDF sys calls. Called once from `main()` before the
//! control loop starts.  On the host every accessor is a stub so the
//! crate builds and the adapters can be exercised in tests.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

const ADC_CHANNELS: [u32; 6] = [
    pins::ADC1_CH_RPM_POT,
    pins::ADC1_CH_TEMP_POT,
    pins::ADC1_CH_TIME_POT,
    pins::ADC1_CH_LOAD,
    pins::ADC1_CH_TEMP_SENSOR,
    pins::ADC1_CH_LIGHT,
];

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// control-loop read path.  `init_adc()` completes before the loop starts.
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
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for &channel in &ADC_CHANNELS {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!("hw_init: ADC1 configured (CH0-2=pots, CH3=load, CH4=temp, CH5=light)");
    Ok(())
}

/// Raw 12-bit reading, or the ESP-IDF error code.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded control-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(ret);
    }
    Ok(raw.clamp(0, i32::from(pins::ADC_MAX)) as u16)
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    if ADC_CHANNELS.contains(&channel) { Ok(0) } else { Err(-1) }
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let input_pins = [pins::POWER_BUTTON_GPIO, pins::START_BUTTON_GPIO];

    for &pin in &input_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    }

    info!("hw_init: button inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Host: buttons read as released.
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = core::iter::once(pins::DOOR_LED_GPIO).chain(pins::SEGMENT_GPIOS);

    for pin in output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: door LED + segment outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Control loop only.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as i32 { Err(ret) } else { Ok(()) }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) -> Result<(), i32> {
    Ok(())
}

// ── embedded-hal pin wrappers ─────────────────────────────────

/// ESP-IDF error code surfaced through embedded-hal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioError(pub i32);

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A configured output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioOut(pub i32);

impl ErrorType for GpioOut {
    type Error = GpioError;
}

impl OutputPin for GpioOut {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.0, false).map_err(GpioError)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.0, true).map_err(GpioError)
    }
}

/// A configured input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioIn(pub i32);

impl ErrorType for GpioIn {
    type Error = GpioError;
}

impl InputPin for GpioIn {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(gpio_read(self.0))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!gpio_read(self.0))
    }
}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_TIMER_LED: u32 = 0;
pub const LEDC_TIMER_BUZZER: u32 = 1;

pub const LEDC_CH_LED_R: u32 = 0;
pub const LEDC_CH_LED_G: u32 = 1;
pub const LEDC_CH_LED_B: u32 = 2;
pub const LEDC_CH_BUZZER: u32 = 3;

const LEDC_DUTY_MAX: u32 = (1 << pins::PWM_RESOLUTION_BITS) - 1;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let timers = [
        (ledc_timer_t_LEDC_TIMER_0, pins::LED_PWM_FREQ_HZ),
        (ledc_timer_t_LEDC_TIMER_1, pins::BUZZER_PWM_FREQ_HZ),
    ];
    for (timer_num, freq_hz) in timers {
        let cfg = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num,
            duty_resolution: ledc_timer_bit_t_LEDC_TIMER_10_BIT,
            freq_hz,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        // SAFETY: Called from single main-task context via init_peripherals().
        let ret = unsafe { ledc_timer_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }
    }

    let channels = [
        (LEDC_CH_LED_R, LEDC_TIMER_LED, pins::LED_R_GPIO),
        (LEDC_CH_LED_G, LEDC_TIMER_LED, pins::LED_G_GPIO),
        (LEDC_CH_LED_B, LEDC_TIMER_LED, pins::LED_B_GPIO),
        (LEDC_CH_BUZZER, LEDC_TIMER_BUZZER, pins::BUZZER_GPIO),
    ];
    for (channel, timer_sel, gpio_num) in channels {
        let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel,
            gpio_num,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        }) };
        if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }
    }

    info!("hw_init: LEDC configured (led=CH0-2 on T0, buzzer=CH3 on T1)");
    Ok(())
}

/// Convert a 0.0–1.0 duty to LEDC counts.
pub fn duty_counts(duty: f32) -> u32 {
    (duty.clamp(0.0, 1.0) * LEDC_DUTY_MAX as f32).round() as u32
}

#[cfg(target_os = "espidf")]
pub fn ledc_write_duty(channel: u32, duty: f32) -> Result<(), i32> {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the control loop calls this function.
    unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty_counts(duty));
        if ret != ESP_OK as i32 { return Err(ret); }
        let ret = ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
        if ret != ESP_OK as i32 { return Err(ret); }
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_write_duty(_channel: u32, _duty: f32) -> Result<(), i32> {
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_write_freq(timer: u32, freq_hz: u32) -> Result<(), i32> {
    // SAFETY: timer configured in init_ledc(); control loop only.
    let ret = unsafe { ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, timer, freq_hz) };
    if ret != ESP_OK as i32 { Err(ret) } else { Ok(()) }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_write_freq(_timer: u32, _freq_hz: u32) -> Result<(), i32> {
    Ok(())
}
