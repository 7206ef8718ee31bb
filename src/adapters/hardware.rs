//! Hardware adapter — bridges the real board to the [`HardwareIo`] port.
//!
//! Owns the button and output pins and maps every logical channel onto
//! the ADC, GPIO and LEDC resources configured by [`hw_init`].  This is
//! the only module in the system that touches actual hardware.  On
//! non-espidf targets the underlying `hw_init` accessors are stubs.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::app::ports::{AnalogInput, DigitalInput, DigitalOutput, HardwareIo, PwmOutput};
use crate::drivers::hw_init::{self, GpioIn, GpioOut, HwInitError};
use crate::drivers::segment_display::SegmentBus;
use crate::error::{ActuatorError, SensorError};
use crate::pins;

/// Concrete adapter over the ESP32-S3 washer board.
pub struct HardwareAdapter {
    power_button: GpioIn,
    start_button: GpioIn,
    door_led: GpioOut,
    segments: SegmentBus<GpioOut>,
}

impl HardwareAdapter {
    /// Configure the peripherals and take ownership of the pins.
    pub fn init() -> Result<Self, HwInitError> {
        hw_init::init_peripherals()?;
        Ok(Self {
            power_button: GpioIn(pins::POWER_BUTTON_GPIO),
            start_button: GpioIn(pins::START_BUTTON_GPIO),
            door_led: GpioOut(pins::DOOR_LED_GPIO),
            segments: SegmentBus::new(pins::SEGMENT_GPIOS.map(GpioOut)),
        })
    }
}

fn adc_channel(input: AnalogInput) -> u32 {
    match input {
        AnalogInput::RpmPot => pins::ADC1_CH_RPM_POT,
        AnalogInput::TempPot => pins::ADC1_CH_TEMP_POT,
        AnalogInput::TimePot => pins::ADC1_CH_TIME_POT,
        AnalogInput::Load => pins::ADC1_CH_LOAD,
        AnalogInput::Temperature => pins::ADC1_CH_TEMP_SENSOR,
        AnalogInput::Light => pins::ADC1_CH_LIGHT,
    }
}

fn ledc_channel(output: PwmOutput) -> u32 {
    match output {
        PwmOutput::RgbRed => hw_init::LEDC_CH_LED_R,
        PwmOutput::RgbGreen => hw_init::LEDC_CH_LED_G,
        PwmOutput::RgbBlue => hw_init::LEDC_CH_LED_B,
        PwmOutput::Buzzer => hw_init::LEDC_CH_BUZZER,
    }
}

fn ledc_timer(output: PwmOutput) -> u32 {
    match output {
        PwmOutput::Buzzer => hw_init::LEDC_TIMER_BUZZER,
        PwmOutput::RgbRed | PwmOutput::RgbGreen | PwmOutput::RgbBlue => hw_init::LEDC_TIMER_LED,
    }
}

// ── HardwareIo implementation ─────────────────────────────────

impl HardwareIo for HardwareAdapter {
    fn read_analog(&mut self, input: AnalogInput) -> Result<f32, SensorError> {
        let raw = hw_init::adc1_read(adc_channel(input)).map_err(|rc| {
            log::debug!("ADC read {:?} failed (rc={})", input, rc);
            SensorError::AdcReadFailed
        })?;
        Ok(f32::from(raw) / f32::from(pins::ADC_MAX))
    }

    fn read_digital(&mut self, input: DigitalInput) -> Result<bool, SensorError> {
        let pin = match input {
            DigitalInput::PowerButton => &mut self.power_button,
            DigitalInput::StartButton => &mut self.start_button,
        };
        pin.is_high().map_err(|_| SensorError::GpioReadFailed)
    }

    fn write_pwm_duty(&mut self, output: PwmOutput, duty: f32) -> Result<(), ActuatorError> {
        hw_init::ledc_write_duty(ledc_channel(output), duty)
            .map_err(|_| ActuatorError::PwmWriteFailed)
    }

    fn set_pwm_period(&mut self, output: PwmOutput, period_secs: f32) -> Result<(), ActuatorError> {
        if !(period_secs.is_finite() && period_secs > 0.0) {
            return Err(ActuatorError::PwmWriteFailed);
        }
        let freq_hz = (1.0 / period_secs).round().max(1.0) as u32;
        hw_init::ledc_write_freq(ledc_timer(output), freq_hz)
            .map_err(|_| ActuatorError::PwmWriteFailed)
    }

    fn write_digital(&mut self, output: DigitalOutput, high: bool) -> Result<(), ActuatorError> {
        match output {
            DigitalOutput::DoorLed => self
                .door_led
                .set_state(PinState::from(high))
                .map_err(|_| ActuatorError::GpioWriteFailed),
        }
    }

    fn write_segment_pattern(&mut self, pattern: u8) -> Result<(), ActuatorError> {
        self.segments
            .write(pattern)
            .map_err(|_| ActuatorError::DisplayWriteFailed)
    }
}
