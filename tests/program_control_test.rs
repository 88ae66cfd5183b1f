//! Phase and program changes on the cross3ltl light

mod common;

use traci_tls::connection::TlVariable;
use traci_tls::sim::scenarios::CROSS3LTL_PHASES;
use traci_tls::{Error, Logic, Phase, SignalState, TransportError};

fn all(code: char) -> SignalState {
    SignalState::from_code(&code.to_string().repeat(16)).unwrap()
}

#[test]
fn test_initial_phase_and_next_switch() {
    let (conn, _) = common::connect();
    let tl = conn.traffic_light_repository().get_by_id("0").unwrap();

    assert_eq!(tl.read_current_phase_index_query().get().unwrap(), 0);
    assert_eq!(tl.read_current_program_query().get().unwrap(), "0");
    assert_eq!(tl.read_next_switch_query().get().unwrap(), 32_000);

    conn.advance_steps(32).unwrap();
    assert_eq!(tl.read_current_phase_index_query().get().unwrap(), 1);
    assert_eq!(tl.read_next_switch_query().get().unwrap(), 36_000);
}

#[test]
fn test_change_phase_index() {
    let (conn, _) = common::connect();
    let tl = conn.traffic_light_repository().get_by_id("0").unwrap();
    conn.advance_step().unwrap();

    let mut change = tl.change_phase_index_query();
    change.set_value(2);
    change.run().unwrap();

    assert_eq!(tl.read_current_phase_index_query().get().unwrap(), 2);
    assert_eq!(
        tl.read_current_state_query().get().unwrap().to_code(),
        CROSS3LTL_PHASES[2]
    );
    assert_eq!(tl.read_current_phase_duration_query().get().unwrap(), 6000);
    assert_eq!(tl.read_next_switch_query().get().unwrap(), 7000);

    conn.advance_steps(6).unwrap();
    assert_eq!(tl.read_current_phase_index_query().get().unwrap(), 3);
}

#[test]
fn test_change_phase_index_out_of_range() {
    let (conn, _) = common::connect();
    let tl = conn.traffic_light_repository().get_by_id("0").unwrap();

    let mut change = tl.change_phase_index_query();
    change.set_value(8);
    assert!(matches!(
        change.run(),
        Err(Error::Transport(TransportError::Rejected(_)))
    ));
    change.set_value(-1);
    assert!(change.run().is_err());
    assert_eq!(tl.read_current_phase_index_query().get().unwrap(), 0);
}

#[test]
fn test_phase_duration_beyond_protocol_time_is_rejected() {
    let (conn, _) = common::connect();
    let tl = conn.traffic_light_repository().get_by_id("0").unwrap();
    conn.advance_step().unwrap();

    let mut change = tl.change_phase_duration_query();
    change.set_value(i32::MAX);
    assert!(matches!(
        change.run(),
        Err(Error::Transport(TransportError::Rejected(_)))
    ));
    assert_eq!(tl.read_next_switch_query().get().unwrap(), 32_000);

    // The largest duration that still fits is accepted
    change.set_value(i32::MAX - 1000);
    change.run().unwrap();
    assert_eq!(tl.read_next_switch_query().get().unwrap(), i32::MAX);
}

#[test]
fn test_change_phase_duration() {
    let (conn, _) = common::connect();
    let tl = conn.traffic_light_repository().get_by_id("0").unwrap();

    let mut change = tl.change_phase_duration_query();
    change.set_value(5000);
    change.run().unwrap();

    assert_eq!(tl.read_next_switch_query().get().unwrap(), 5000);
    // The defined duration of the phase is unchanged
    assert_eq!(tl.read_current_phase_duration_query().get().unwrap(), 31_000);

    conn.advance_steps(4).unwrap();
    assert_eq!(tl.read_current_phase_index_query().get().unwrap(), 0);
    conn.advance_step().unwrap();
    assert_eq!(tl.read_current_phase_index_query().get().unwrap(), 1);
}

#[test]
fn test_install_and_switch_programs() {
    let (conn, recorder) = common::connect();
    let tl = conn.traffic_light_repository().get_by_id("0").unwrap();

    let flashing = Logic::new(
        "night",
        0,
        vec![Phase::new(2000, all('y')), Phase::new(2000, all('r'))],
    );
    let mut install = tl.change_complete_program_query();
    install.set_value(flashing.clone());
    install.run().unwrap();

    assert_eq!(tl.read_current_program_query().get().unwrap(), "night");
    assert_eq!(tl.read_current_state_query().get().unwrap(), all('y'));
    conn.advance_steps(2).unwrap();
    assert_eq!(tl.read_current_state_query().get().unwrap(), all('r'));

    let program = tl.complete_definition_query().get().unwrap();
    assert_eq!(program.logics().len(), 2);
    let night = program.logic("night").unwrap();
    assert_eq!(night.phases, flashing.phases);
    assert_eq!(night.current_phase_index, 1);

    let mut switch = tl.change_program_query();
    switch.set_value("0".to_string());
    switch.run().unwrap();
    assert_eq!(tl.read_current_program_query().get().unwrap(), "0");
    assert_eq!(
        tl.read_current_state_query().get().unwrap().to_code(),
        CROSS3LTL_PHASES[0]
    );
    assert_eq!(recorder.sets_of(TlVariable::CompleteProgram), 1);
    assert_eq!(recorder.sets_of(TlVariable::Program), 1);
}

#[test]
fn test_unknown_program_is_rejected() {
    let (conn, _) = common::connect();
    let tl = conn.traffic_light_repository().get_by_id("0").unwrap();

    let mut switch = tl.change_program_query();
    switch.set_value("missing".to_string());
    assert!(matches!(
        switch.run(),
        Err(Error::Transport(TransportError::Rejected(_)))
    ));
    assert_eq!(tl.read_current_program_query().get().unwrap(), "0");
}

#[test]
fn test_invalid_program_is_not_dispatched() {
    let (conn, recorder) = common::connect();
    let tl = conn.traffic_light_repository().get_by_id("0").unwrap();

    let short = Logic::new(
        "short",
        0,
        vec![Phase::new(1000, SignalState::from_code("GGrr").unwrap())],
    );
    let mut install = tl.change_complete_program_query();
    install.set_value(short);
    assert!(matches!(
        install.run(),
        Err(Error::LengthMismatch { expected: 16, .. })
    ));

    let dangling = Logic::new("dangling", 3, vec![Phase::new(1000, all('r'))]);
    install.set_value(dangling);
    assert!(matches!(
        install.run(),
        Err(Error::PhaseOutOfRange { index: 3, .. })
    ));

    assert_eq!(recorder.dispatch_count(), 0);
}
