//! Door and overload interlocks, sensor faults and fault escalation.

use washer::app::events::WasherEvent;
use washer::app::ports::{AnalogInput, DigitalInput};
use washer::drivers::segment_display::BLANK;
use washer::error::{Error, RejectReason, SafetyFault, StartRejected};
use washer::fsm::StateId;
use washer::settings::UserSettings;

use super::mock_hw::Rig;

const THIRTY_MINUTES: UserSettings = UserSettings { rpm: 500, temp_c: 40, minutes: 30 };

fn rejected(reason: RejectReason) -> Option<Result<UserSettings, StartRejected>> {
    Some(Err(StartRejected { reason }))
}

#[test]
fn open_door_blocks_start_immediately() {
    let mut rig = Rig::powered_on();
    rig.hw.set(AnalogInput::Light, 0.9);

    let report = rig.press(DigitalInput::StartButton);

    assert_eq!(report.state, StateId::Idle);
    assert_eq!(report.start, rejected(RejectReason::DoorOpen));
    assert_eq!(rig.hw.beeps, vec![300]);
    assert!(rig.sink.contains(&WasherEvent::CycleRejected(RejectReason::DoorOpen)));
    assert_eq!(rig.sink.count(|e| matches!(e, WasherEvent::CycleStarted(_))), 0);
    assert_eq!(rig.service.remaining_minutes(), None);
}

#[test]
fn overload_blocks_start_immediately() {
    let mut rig = Rig::powered_on();
    rig.hw.set(AnalogInput::Load, 0.8);

    let report = rig.press(DigitalInput::StartButton);

    assert_eq!(report.state, StateId::Idle);
    assert_eq!(report.start, rejected(RejectReason::Overloaded));
    assert_eq!(rig.hw.beeps, vec![300]);
}

#[test]
fn door_is_reported_before_overload() {
    let mut rig = Rig::powered_on();
    rig.hw.set(AnalogInput::Light, 0.9);
    rig.hw.set(AnalogInput::Load, 0.8);

    let report = rig.press(DigitalInput::StartButton);

    assert_eq!(report.start, rejected(RejectReason::DoorOpen));
}

#[test]
fn start_succeeds_once_door_is_shut() {
    let mut rig = Rig::powered_on();
    rig.hw.set(AnalogInput::Light, 0.9);
    rig.press(DigitalInput::StartButton);
    assert_eq!(rig.service.state(), StateId::Idle);

    rig.hw.set(AnalogInput::Light, 0.1);
    rig.poll();
    // The debounced flag never rose, so a shut door is enough.
    let report = rig.press(DigitalInput::StartButton);
    assert_eq!(report.state, StateId::Running);
    assert_eq!(report.start, Some(Ok(THIRTY_MINUTES)));
}

#[test]
fn door_alert_sounds_on_third_open_reading() {
    let mut rig = Rig::powered_on();
    rig.hw.set(AnalogInput::Light, 0.9);

    rig.poll();
    rig.poll();
    assert!(!rig.sink.contains(&WasherEvent::DoorOpened));
    assert!(!rig.hw.door_led);

    rig.poll();
    assert!(rig.sink.contains(&WasherEvent::DoorOpened));
    assert_eq!(rig.hw.beeps, vec![700]);
    assert!(rig.hw.door_led);
    assert_eq!(rig.service.fault_flags(), SafetyFault::DoorOpen.mask());

    // Held open: no repeat alert.
    rig.poll();
    assert_eq!(rig.hw.beeps, vec![700]);
}

#[test]
fn door_closes_after_three_shut_readings() {
    let mut rig = Rig::powered_on();
    rig.hw.set(AnalogInput::Light, 0.9);
    for _ in 0..3 {
        rig.poll();
    }

    rig.hw.set(AnalogInput::Light, 0.1);
    rig.poll();
    rig.poll();
    assert!(rig.hw.door_led);
    assert!(!rig.sink.contains(&WasherEvent::DoorClosed));

    rig.poll();
    assert!(rig.sink.contains(&WasherEvent::DoorClosed));
    assert!(!rig.hw.door_led);
    assert_eq!(rig.service.fault_flags(), 0);
}

#[test]
fn latched_door_flag_blocks_start_after_door_shuts() {
    let mut rig = Rig::powered_on();
    rig.hw.set(AnalogInput::Light, 0.9);
    for _ in 0..3 {
        rig.poll();
    }

    rig.hw.set(AnalogInput::Light, 0.1);
    let report = rig.press(DigitalInput::StartButton);

    assert_eq!(report.state, StateId::Idle);
    assert_eq!(report.start, rejected(RejectReason::DoorOpen));
}

#[test]
fn overload_warning_after_debounce() {
    let mut rig = Rig::powered_on();
    rig.hw.set(AnalogInput::Load, 0.8);
    for _ in 0..3 {
        rig.poll();
    }

    assert!(rig.sink.contains(&WasherEvent::OverloadWarning));
    assert_eq!(rig.hw.beeps, vec![500]);
    assert_eq!(rig.hw.rgb, [1.0, 0.0, 0.0]);
    assert_eq!(rig.service.fault_flags(), SafetyFault::Overloaded.mask());

    // Still overloaded: warned once only.
    for _ in 0..4 {
        rig.poll();
    }
    assert_eq!(rig.sink.count(|e| *e == WasherEvent::OverloadWarning), 1);
    assert_eq!(rig.hw.beeps, vec![500]);
}

#[test]
fn overload_clears_after_three_light_readings() {
    let mut rig = Rig::powered_on();
    rig.hw.set(AnalogInput::Load, 0.8);
    for _ in 0..3 {
        rig.poll();
    }

    rig.hw.set(AnalogInput::Load, 0.1);
    rig.poll();
    rig.poll();
    assert!(!rig.sink.contains(&WasherEvent::OverloadCleared));
    assert_ne!(rig.service.fault_flags(), 0);

    rig.poll();
    assert_eq!(rig.sink.count(|e| *e == WasherEvent::OverloadCleared), 1);
    assert_eq!(rig.service.fault_flags(), 0);
    assert_eq!(rig.hw.rgb, [0.0, 1.0, 0.0]);
    assert_eq!(rig.hw.beeps, vec![500]);
}

#[test]
fn door_opening_mid_cycle_does_not_stop_it() {
    let mut rig = Rig::running();
    rig.hw.set(AnalogInput::Light, 0.9);
    for _ in 0..3 {
        rig.poll();
    }

    assert!(rig.sink.contains(&WasherEvent::DoorOpened));
    assert!(rig.hw.beeps.is_empty());
    assert_eq!(rig.service.state(), StateId::Running);
}

#[test]
fn power_cycle_forgets_interlock_history() {
    let mut rig = Rig::powered_on();
    rig.hw.set(AnalogInput::Light, 0.9);
    for _ in 0..3 {
        rig.poll();
    }
    assert_ne!(rig.service.fault_flags(), 0);

    rig.press(DigitalInput::PowerButton);
    assert_eq!(rig.service.state(), StateId::Off);
    assert_eq!(rig.service.fault_flags(), 0);
    rig.poll();
    rig.press(DigitalInput::PowerButton);
    assert_eq!(rig.service.state(), StateId::Idle);
    rig.poll();
    assert_eq!(rig.service.fault_flags(), 0);
}

#[test]
fn sensor_failure_keeps_previous_snapshot() {
    let mut rig = Rig::powered_on();
    let before = rig.service.settings();
    rig.hw.fail_analog = true;

    let report = rig.try_poll().unwrap();

    assert_eq!(report.state, StateId::Idle);
    assert_eq!(rig.service.settings(), before);
    assert_eq!(rig.sink.count(|e| matches!(e, WasherEvent::SensorFault(_))), 1);
}

#[test]
fn persistent_sensor_failure_is_fatal() {
    let mut rig = Rig::powered_on();
    rig.hw.fail_analog = true;

    for _ in 0..9 {
        assert!(rig.try_poll().is_ok());
    }
    assert_eq!(rig.try_poll(), Err(Error::Hardware("persistent I/O failure")));

    rig.service.shutdown(&mut rig.hw).unwrap();
    assert_eq!(rig.service.state(), StateId::Off);
    assert_eq!(rig.hw.last_segment(), Some(BLANK));
    assert_eq!(rig.hw.rgb, [0.0, 0.0, 0.0]);
}

#[test]
fn a_clean_poll_resets_the_failure_count() {
    let mut rig = Rig::powered_on();
    for _ in 0..3 {
        rig.hw.fail_analog = true;
        for _ in 0..9 {
            assert!(rig.try_poll().is_ok());
        }
        rig.hw.fail_analog = false;
        assert!(rig.try_poll().is_ok());
    }
}

#[test]
fn failed_tone_is_silenced_on_retry() {
    let mut rig = Rig::new();
    rig.hw.stuck_buzzer_offs = 1;

    let report = rig.press(DigitalInput::PowerButton);

    assert_eq!(report.state, StateId::Idle);
    assert_eq!(rig.hw.buzzer_duty, 0.0);
    assert_eq!(rig.sink.count(|e| matches!(e, WasherEvent::ActuatorFault(_))), 1);
}

#[test]
fn buzzer_that_will_not_stop_does_not_halt_the_loop() {
    let mut rig = Rig::new();
    rig.hw.stuck_buzzer_offs = 2;

    assert!(rig.try_poll().is_ok());
    rig.hw.tap(DigitalInput::PowerButton);
    assert!(rig.try_poll().is_ok());

    assert_eq!(rig.service.state(), StateId::Idle);
    assert!(rig.hw.buzzer_duty > 0.0);
    assert_eq!(rig.sink.count(|e| matches!(e, WasherEvent::ActuatorFault(_))), 1);

    // Next clean beep path turns it off again.
    rig.poll();
    rig.press(DigitalInput::PowerButton);
    assert_eq!(rig.hw.buzzer_duty, 0.0);
}

#[test]
fn actuator_failure_is_reported() {
    let mut rig = Rig::powered_on();
    rig.hw.fail_writes = true;

    assert!(rig.try_poll().is_ok());

    assert!(rig.sink.count(|e| matches!(e, WasherEvent::ActuatorFault(_))) >= 1);
}
