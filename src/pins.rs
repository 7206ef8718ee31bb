//! GPIO / peripheral pin assignments for the washer controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Front-panel potentiometers (ADC1, 0 – 3.3 V wipers)
// ---------------------------------------------------------------------------

/// Spin speed pot.  ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const RPM_POT_GPIO: i32 = 1;
/// Wash temperature pot.  ADC1 channel 1 (GPIO 2).
pub const TEMP_POT_GPIO: i32 = 2;
/// Wash time pot.  ADC1 channel 2 (GPIO 3).
pub const TIME_POT_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Force-sensitive resistor under the drum.  ADC1 channel 3 (GPIO 4).
pub const LOAD_ADC_GPIO: i32 = 4;
/// Analog temperature sensor, 10 mV/°C.  ADC1 channel 4 (GPIO 5).
pub const TEMP_SENSOR_ADC_GPIO: i32 = 5;
/// LDR behind the door glass.  ADC1 channel 5 (GPIO 6).
pub const LIGHT_ADC_GPIO: i32 = 6;

pub const ADC1_CH_RPM_POT: u32 = 0;
pub const ADC1_CH_TEMP_POT: u32 = 1;
pub const ADC1_CH_TIME_POT: u32 = 2;
pub const ADC1_CH_LOAD: u32 = 3;
pub const ADC1_CH_TEMP_SENSOR: u32 = 4;
pub const ADC1_CH_LIGHT: u32 = 5;

/// Full-scale ADC reading at 12-bit width.
pub const ADC_MAX: u16 = 4095;

// ---------------------------------------------------------------------------
// Buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

pub const POWER_BUTTON_GPIO: i32 = 7;
pub const START_BUTTON_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Red "door open" LED (active HIGH).
pub const DOOR_LED_GPIO: i32 = 9;

/// RGB load indicator.
pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;

/// Piezo buzzer (LEDC, frequency changed per beep).
pub const BUZZER_GPIO: i32 = 14;

/// 7-segment display, segments a..g in order.
pub const SEGMENT_GPIOS: [i32; 7] = [15, 16, 17, 18, 21, 38, 39];

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  10-bit gives 0 – 1023 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 10;
/// Power-on LEDC frequency for the RGB indicator; the service reprograms
/// it from config when the appliance powers up.
pub const LED_PWM_FREQ_HZ: u32 = 100;
/// Initial buzzer frequency; every beep sets its own.
pub const BUZZER_PWM_FREQ_HZ: u32 = 1_000;
