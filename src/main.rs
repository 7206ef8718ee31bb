//! Washer Firmware — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter / SimBoard   LogEventSink     SystemClock     │
//! │  (HardwareIo)                 (EventSink)      (Clock)         │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            WasherService (pure logic)                  │    │
//! │  │  Buttons · Sensors · Safety · FSM · Cycle              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On the controller board the loop drives the real peripherals.  On a
//! host the same loop drives [`SimBoard`](washer::adapters::sim::SimBoard),
//! with front-panel commands read from stdin.
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info};

use washer::adapters::log_sink::LogEventSink;
use washer::adapters::time::SystemClock;
use washer::app::ports::{Clock, EventSink, HardwareIo};
use washer::app::service::WasherService;
use washer::config::WasherConfig;

// ── Control loop ──────────────────────────────────────────────

/// Poll forever.  `before_poll` lets the caller feed the board between
/// iterations.  Returns only when the service reports a fatal error,
/// after every output has been driven off.
fn control_loop<H: HardwareIo>(
    service: &mut WasherService,
    hw: &mut H,
    clock: &mut impl Clock,
    sink: &mut impl EventSink,
    mut before_poll: impl FnMut(&mut H, &WasherService),
) -> Result<()> {
    loop {
        before_poll(hw, service);
        match service.poll(hw, clock, sink) {
            Ok(report) => clock.sleep_ms(report.next_poll_ms),
            Err(e) => {
                error!("control loop stopped: {e}");
                if let Err(off) = service.shutdown(hw) {
                    error!("shutdown after fault incomplete: {off}");
                }
                return Err(e.into());
            }
        }
    }
}

fn build_service() -> Result<WasherService> {
    let config = WasherConfig::default();
    match serde_json::to_string(&config) {
        Ok(json) => info!("Config: {json}"),
        Err(e) => error!("config serialisation failed: {e}"),
    }
    let service = WasherService::new(config).map_err(washer::error::Error::from)?;
    Ok(service)
}

// ── Controller board ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn main() -> Result<()> {
    use washer::adapters::hardware::HardwareAdapter;

    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init().map_err(|e| anyhow::anyhow!("logger init: {e}"))?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Washer v{}                          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let mut hw = match HardwareAdapter::init() {
        Ok(hw) => hw,
        Err(e) => {
            error!("HAL init failed: {}, halting", e);
            return Err(e.into());
        }
    };

    let mut service = build_service()?;
    let mut clock = SystemClock::new();
    let mut sink = LogEventSink::new();

    service.start(&mut sink);
    control_loop(&mut service, &mut hw, &mut clock, &mut sink, |_, _| {})
}

// ── Host simulator ────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<()> {
    use std::io::BufRead;
    use std::sync::mpsc;

    use washer::adapters::log_sink::init_console_logger;
    use washer::adapters::sim::{SIM_HELP, SimBoard, SimCommand};

    init_console_logger(log::LevelFilter::Info)
        .map_err(|e| anyhow::anyhow!("logger init: {e}"))?;
    info!("Washer v{} (simulated board)", env!("CARGO_PKG_VERSION"));
    info!("{SIM_HELP}");

    let (tx, rx) = mpsc::channel::<String>();
    std::thread::Builder::new()
        .name("panel-stdin".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;

    let mut service = build_service()?;
    let mut board = SimBoard::new();
    let mut clock = SystemClock::new();
    let mut sink = LogEventSink::new();

    service.start(&mut sink);
    control_loop(
        &mut service,
        &mut board,
        &mut clock,
        &mut sink,
        |board, service| {
            for line in rx.try_iter() {
                let cmd = match SimCommand::parse(&line) {
                    Ok(cmd) => cmd,
                    Err(msg) => {
                        info!("{msg} ({SIM_HELP})");
                        continue;
                    }
                };
                if cmd.apply(board) {
                    continue;
                }
                match cmd {
                    SimCommand::ShowConfig => match serde_json::to_string_pretty(service.config()) {
                        Ok(json) => info!("Config: {json}"),
                        Err(e) => error!("config serialisation failed: {e}"),
                    },
                    SimCommand::ShowStatus => info!(
                        "poll #{} | {} | {:?} | cycle={:?} | faults=0b{:02b} | remaining={:?} | {}",
                        service.poll_count(),
                        service.state(),
                        service.settings(),
                        service.cycle_settings(),
                        service.fault_flags(),
                        service.remaining_minutes(),
                        board
                    ),
                    _ => info!("{SIM_HELP}"),
                }
            }
        },
    )
}
