//! Identity and error tests for charger-core

use charger_core::{CoreError, EventId, MachineId, StateId};

#[test]
fn state_id_raw_and_index() {
    let state = StateId::new(2);
    assert_eq!(state.raw(), 2);
    assert_eq!(state.index(), 2);
}

#[test]
fn event_id_equality() {
    assert_eq!(EventId::new(3), EventId(3));
    assert_ne!(EventId::new(3), EventId::new(4));
}

#[test]
fn machine_id_ordering() {
    assert!(MachineId::new(1) > MachineId::new(0));
}

#[test]
fn error_display() {
    let err = CoreError::DuplicateTransition {
        state: StateId::new(1),
        event: EventId::new(2),
    };
    assert_eq!(
        err.to_string(),
        "duplicate transition for StateId(1) on EventId(2)"
    );
    assert_eq!(
        CoreError::RegistryFull { capacity: 1 }.to_string(),
        "machine registry full (1 slots)"
    );
}
