//! MotionService command dispatch and event emission.

use flowcontrol::adapters::log_sink::LogEventSink;
use flowcontrol::app::commands::MotionCommand;
use flowcontrol::app::events::MotionEvent;
use flowcontrol::app::service::MotionService;
use flowcontrol::error::Error;
use flowcontrol::manifold::{ChipId, Mode};
use flowcontrol::motion::ControllerState;

use crate::mock_hw::{RecordingSink, rig};

#[test]
fn start_emits_initialized() {
    let (ctl, _rig) = rig();
    let mut svc = MotionService::new(ctl);
    let mut sink = RecordingSink::default();

    svc.start(&mut sink).unwrap();

    assert_eq!(
        sink.events,
        vec![MotionEvent::Initialized {
            pulse_width_ms: 50,
            current: 4
        }]
    );
    assert_eq!(svc.state(), ControllerState::Idle(Mode::Rest));
}

#[test]
fn mode_change_is_reported() {
    let (ctl, _rig) = rig();
    let mut svc = MotionService::new(ctl);
    let mut sink = RecordingSink::default();

    svc.handle_command(MotionCommand::SetMode(Mode::EquilPumpOn), &mut sink)
        .unwrap();
    svc.handle_command(MotionCommand::TogglePump, &mut sink)
        .unwrap();

    assert_eq!(
        sink.events,
        vec![
            MotionEvent::ModeChanged {
                from: Mode::Rest,
                to: Mode::EquilPumpOn
            },
            MotionEvent::PumpToggled {
                on: false,
                mode: Mode::EquilPumpOff
            },
        ]
    );
    assert_eq!(svc.commands_handled(), 2);
}

#[test]
fn transfer_failure_raises_desync_hazard() {
    let (ctl, rig) = rig();
    let mut svc = MotionService::new(ctl);
    let mut sink = RecordingSink::default();

    rig.spi_b.fail_nth_write(1);
    let r = svc.handle_command(MotionCommand::SetMode(Mode::ZeroCal), &mut sink);

    let error = Error::PartialCommit(ChipId::B);
    assert_eq!(r, Err(error));
    assert_eq!(
        sink.events,
        vec![
            MotionEvent::ActuationFailed {
                requested: Some(Mode::ZeroCal),
                error
            },
            MotionEvent::DesyncHazard {
                mode: Mode::Rest,
                error
            },
        ]
    );
    assert_eq!(svc.last_error(), Some(error));
}

#[test]
fn latched_mode_is_reported_even_if_settle_fails() {
    let (ctl, rig) = rig();
    let mut svc = MotionService::new(ctl);
    let mut sink = RecordingSink::default();

    rig.spi_a.fail_disable();
    svc.handle_command(MotionCommand::SetMode(Mode::ZeroPumpOn), &mut sink)
        .unwrap();

    assert_eq!(
        sink.events,
        vec![MotionEvent::ModeChanged {
            from: Mode::Rest,
            to: Mode::ZeroPumpOn
        }]
    );
    assert_eq!(svc.state(), ControllerState::Idle(Mode::ZeroPumpOn));
    assert_eq!(svc.last_error(), None);
    assert_eq!(rig.journal.level("relay"), Some(true));
}

#[test]
fn invalid_settings_do_not_raise_desync() {
    let (ctl, _rig) = rig();
    let mut svc = MotionService::new(ctl);
    let mut sink = RecordingSink::default();

    assert!(svc.handle_command(MotionCommand::SetCurrent(9), &mut sink).is_err());
    assert!(svc.handle_command(MotionCommand::SetPulseWidth(1), &mut sink).is_err());
    assert!(
        svc.handle_command(
            MotionCommand::SetValve {
                valve: 12,
                direction: true
            },
            &mut sink
        )
        .is_err()
    );

    assert_eq!(sink.events.len(), 3);
    assert!(sink.events.iter().all(|e| matches!(
        e,
        MotionEvent::ActuationFailed {
            requested: None,
            error: Error::InvalidParameter(_)
        }
    )));
    assert_eq!(svc.control().get_current(), 4);
    assert_eq!(svc.control().get_pulse_width_ms(), 50);
}

#[test]
fn settings_and_diagnostics_round_trip() {
    let (ctl, _rig) = rig();
    let mut svc = MotionService::new(ctl);
    let mut sink = RecordingSink::default();

    for cmd in [
        MotionCommand::SetCurrent(6),
        MotionCommand::SetPulseWidth(80),
        MotionCommand::SetValve {
            valve: 0,
            direction: true,
        },
        MotionCommand::Sleep,
    ] {
        svc.handle_command(cmd, &mut sink).unwrap();
    }

    assert_eq!(
        sink.events,
        vec![
            MotionEvent::CurrentChanged(6),
            MotionEvent::PulseWidthChanged(80),
            MotionEvent::ValveOverridden {
                valve: 0,
                direction: true
            },
            MotionEvent::DriversAsleep,
        ]
    );
    assert_eq!(svc.control().get_valve_direction(0), Some(true));
}

#[test]
fn panic_command_reports_completion() {
    let (ctl, _rig) = rig();
    let mut svc = MotionService::new(ctl);
    let mut sink = RecordingSink::default();

    svc.handle_command(MotionCommand::Panic, &mut sink).unwrap();

    assert_eq!(sink.events, vec![MotionEvent::PanicCompleted { failures: 0 }]);
    assert_eq!(svc.control().get_mode(), Mode::Rest);
}

#[test]
fn console_names_select_modes() {
    let (ctl, _rig) = rig();
    let mut svc = MotionService::new(ctl);
    let mut sink = LogEventSink::new();

    svc.set_mode_by_name("span_post", &mut sink).unwrap();
    assert_eq!(svc.control().get_mode(), Mode::SpanCal);

    assert_eq!(
        svc.set_mode_by_name("NOPE", &mut sink),
        Err(Error::InvalidParameter("unknown mode name"))
    );
    assert_eq!(svc.control().get_mode(), Mode::SpanCal);
}
