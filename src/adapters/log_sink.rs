//! Log-based event sink adapter, plus the host console logger.
//!
//! [`LogEventSink`] implements [`EventSink`] by writing each
//! [`WasherEvent`] through the `log` facade with a fixed template.  On
//! the device the facade is backed by `esp_idf_logger` (UART / USB-CDC);
//! on the host by [`ConsoleLogger`].

use log::{info, warn};

use crate::app::events::WasherEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`WasherEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &WasherEvent) {
        match event {
            WasherEvent::Started(state) => info!("START | initial_state={}", state),
            WasherEvent::StateChanged { from, to } => info!("STATE | {} -> {}", from, to),
            WasherEvent::PoweredOn => info!("POWER | system on"),
            WasherEvent::PoweredOff => info!("POWER | system off"),
            WasherEvent::SettingsChanged(s) => info!(
                "SETTINGS | speed={} rpm | temp={}\u{00b0}C | time={} min",
                s.rpm, s.temp_c, s.minutes
            ),
            WasherEvent::SensorStatus {
                load,
                temperature_c,
                door_open,
            } => info!(
                "STATUS | load={:.2} | temp={}\u{00b0}C | door={}",
                load,
                temperature_c,
                if *door_open { "OPEN" } else { "CLOSED" }
            ),
            WasherEvent::DoorOpened => warn!("DOOR | opened"),
            WasherEvent::DoorClosed => info!("DOOR | closed"),
            WasherEvent::OverloadWarning => warn!("LOAD | washer overloaded!"),
            WasherEvent::OverloadCleared => info!("LOAD | overload cleared"),
            WasherEvent::CycleStarted(s) => info!(
                "CYCLE | starting: {} rpm, {}\u{00b0}C, {} min",
                s.rpm, s.temp_c, s.minutes
            ),
            WasherEvent::CycleRejected(reason) => warn!("CYCLE | cannot start: {}", reason),
            WasherEvent::CycleProgress { remaining_minutes } => {
                info!("CYCLE | time remaining: {} min", remaining_minutes)
            }
            WasherEvent::CycleComplete => info!("CYCLE | wash complete"),
            WasherEvent::CycleEnded => info!("CYCLE | back to idle"),
            WasherEvent::CycleAborted { remaining_minutes } => {
                warn!("CYCLE | aborted by power-off with {} min left", remaining_minutes)
            }
            WasherEvent::SensorFault(e) => warn!("FAULT | sensor: {}", e),
            WasherEvent::ActuatorFault(e) => warn!("FAULT | actuator: {}", e),
        }
    }
}

// ── Host console logger ───────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub use console::{ConsoleLogger, init_console_logger};

#[cfg(not(target_os = "espidf"))]
mod console {
    use std::io::Write;
    use std::sync::OnceLock;
    use std::time::Instant;

    use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

    /// Timestamped, level-tagged `log` backend writing to stderr.
    pub struct ConsoleLogger {
        start: OnceLock<Instant>,
    }

    static LOGGER: ConsoleLogger = ConsoleLogger {
        start: OnceLock::new(),
    };

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record<'_>) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let elapsed = self.start.get_or_init(Instant::now).elapsed();
            let mut out = std::io::stderr().lock();
            let _ = writeln!(
                out,
                "[{:>9.3}] {:<5} {}: {}",
                elapsed.as_secs_f64(),
                record.level(),
                record.target(),
                record.args()
            );
        }

        fn flush(&self) {
            let _ = std::io::stderr().flush();
        }
    }

    /// Install the console logger as the global `log` backend.
    pub fn init_console_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
        LOGGER.start.get_or_init(Instant::now);
        log::set_logger(&LOGGER)?;
        log::set_max_level(level);
        Ok(())
    }
}
