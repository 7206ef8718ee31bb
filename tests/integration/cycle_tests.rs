//! Wash cycle lifecycle: start, countdown, completion, abort.

use washer::app::events::WasherEvent;
use washer::app::ports::{AnalogInput, DigitalInput};
use washer::drivers::segment_display::{BLANK, HEX_DIGITS};
use washer::error::{RejectReason, StartRejected};
use washer::fsm::StateId;
use washer::settings::UserSettings;

use super::mock_hw::Rig;

const THIRTY_MINUTES: UserSettings = UserSettings { rpm: 500, temp_c: 40, minutes: 30 };

#[test]
fn start_press_begins_cycle() {
    let mut rig = Rig::powered_on();

    let report = rig.press(DigitalInput::StartButton);

    assert_eq!(report.state, StateId::Running);
    assert_eq!(report.start, Some(Ok(THIRTY_MINUTES)));
    assert_eq!(rig.hw.beeps, vec![700]);
    assert_eq!(rig.hw.last_segment(), Some(HEX_DIGITS[3]));
    assert!(rig.sink.contains(&WasherEvent::CycleStarted(THIRTY_MINUTES)));
    assert!(rig.sink.contains(&WasherEvent::CycleProgress { remaining_minutes: 30 }));
    assert_eq!(rig.service.remaining_minutes(), Some(30));
    assert_eq!(rig.service.cycle_settings(), Some(THIRTY_MINUTES));
}

#[test]
fn cycle_counts_down_and_returns_to_idle() {
    let mut rig = Rig::running();
    let started_at = rig.clock.now;

    let report = rig.poll_while(StateId::Running, 100);

    assert_eq!(report.state, StateId::Idle);
    assert!(rig.clock.now - started_at >= 2_000);

    let progress: Vec<u32> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            WasherEvent::CycleProgress { remaining_minutes } => Some(*remaining_minutes),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![20, 10]);
    assert!(rig.sink.contains(&WasherEvent::CycleComplete));
    assert!(rig.sink.contains(&WasherEvent::CycleEnded));
    assert_eq!(rig.hw.beeps, vec![1000, 1000, 1000]);
    assert_eq!(rig.service.remaining_minutes(), None);
}

#[test]
fn display_counts_down_to_zero() {
    let mut rig = Rig::running();
    rig.poll_while(StateId::Running, 100);

    let mut shown = rig.hw.segments.clone();
    shown.dedup();
    assert_eq!(shown, vec![HEX_DIGITS[3], HEX_DIGITS[2], HEX_DIGITS[1], HEX_DIGITS[0]]);

    // Back in Idle the selected setting reappears.
    rig.poll();
    assert_eq!(rig.hw.last_segment(), Some(HEX_DIGITS[3]));
}

#[test]
fn cycle_keeps_settings_captured_at_start() {
    let mut rig = Rig::running();
    rig.hw.set(AnalogInput::TimePot, 1.0);
    rig.hw.set(AnalogInput::RpmPot, 1.0);
    rig.poll();
    assert_eq!(rig.service.settings().rpm, 900);
    assert_eq!(rig.service.cycle_settings(), Some(THIRTY_MINUTES));

    rig.poll_while(StateId::Running, 100);

    let steps = rig
        .sink
        .count(|e| matches!(e, WasherEvent::CycleProgress { .. }));
    assert_eq!(steps, 2);
    assert_eq!(rig.service.settings().minutes, 90);
    assert_eq!(rig.service.cycle_settings(), None);
}

#[test]
fn late_poll_catches_up_on_missed_steps() {
    let mut rig = Rig::running();
    rig.clock.advance(2_000);

    let report = rig.poll();

    assert_eq!(report.state, StateId::Running);
    assert!(rig.sink.contains(&WasherEvent::CycleProgress { remaining_minutes: 10 }));
    assert!(!rig.sink.contains(&WasherEvent::CycleProgress { remaining_minutes: 20 }));
    assert_eq!(rig.hw.last_segment(), Some(HEX_DIGITS[1]));
}

#[test]
fn start_press_while_running_is_refused() {
    let mut rig = Rig::running();
    // Let the latch see the button come back up.
    rig.poll();

    let report = rig.press(DigitalInput::StartButton);

    assert_eq!(report.state, StateId::Running);
    assert_eq!(
        report.start,
        Some(Err(StartRejected { reason: RejectReason::AlreadyRunning }))
    );
    assert_eq!(rig.hw.beeps, vec![500]);
    assert!(rig.sink.contains(&WasherEvent::CycleRejected(RejectReason::AlreadyRunning)));
    assert_eq!(rig.service.remaining_minutes(), Some(30));
}

#[test]
fn back_to_back_start_taps_count_as_one_press() {
    let mut rig = Rig::running();

    // No released read between the taps: the button looks held.
    let report = rig.press(DigitalInput::StartButton);

    assert_eq!(report.state, StateId::Running);
    assert_eq!(report.start, None);
    assert!(rig.hw.beeps.is_empty());
    assert!(!rig.sink.contains(&WasherEvent::CycleRejected(RejectReason::AlreadyRunning)));
}

#[test]
fn power_press_while_running_aborts_cycle() {
    let mut rig = Rig::running();

    let report = rig.press(DigitalInput::PowerButton);

    assert_eq!(report.state, StateId::Off);
    assert!(rig.sink.contains(&WasherEvent::CycleAborted { remaining_minutes: 30 }));
    assert!(rig.sink.contains(&WasherEvent::PoweredOff));
    assert!(!rig.sink.contains(&WasherEvent::CycleComplete));
    assert_eq!(rig.hw.beeps, vec![600]);
    assert_eq!(rig.hw.last_segment(), Some(BLANK));
    assert_eq!(rig.hw.rgb, [0.0, 0.0, 0.0]);
    assert_eq!(rig.service.remaining_minutes(), None);
}

#[test]
fn ten_minute_wash_finishes_after_one_step() {
    let mut rig = Rig::powered_on();
    rig.hw.set(AnalogInput::TimePot, 0.0);
    rig.poll();
    rig.press(DigitalInput::StartButton);
    rig.sink.clear();

    rig.poll_while(StateId::Running, 100);

    assert_eq!(rig.sink.count(|e| matches!(e, WasherEvent::CycleProgress { .. })), 0);
    assert!(rig.sink.contains(&WasherEvent::CycleComplete));
}

#[test]
fn shutdown_mid_cycle_drives_outputs_off() {
    let mut rig = Rig::running();
    rig.poll();

    rig.service.shutdown(&mut rig.hw).unwrap();

    assert_eq!(rig.service.state(), StateId::Off);
    assert_eq!(rig.hw.last_segment(), Some(BLANK));
    assert_eq!(rig.hw.rgb, [0.0, 0.0, 0.0]);
    assert_eq!(rig.hw.buzzer_duty, 0.0);
    assert!(!rig.hw.door_led);
}
