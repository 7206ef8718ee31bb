//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to                        |
//! |------------|------------|------------------------------------|
//! | `hardware` | HardwareIo | ESP32 ADC, GPIO, LEDC              |
//! | `sim`      | HardwareIo | In-memory board (host binary)      |
//! | `log_sink` | EventSink  | `log` facade (serial / stderr)     |
//! | `time`     | Clock      | ESP32 system timer / `Instant`     |

pub mod hardware;
pub mod log_sink;
pub mod sim;
pub mod time;
