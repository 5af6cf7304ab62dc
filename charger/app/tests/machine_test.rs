use charger_app::{definition, Charger, ChargerConfig, ChargerEvent, ChargerState};
use charger_core::{MachineId, StateId};
use charger_hal::gpio::IoControl;
use charger_sm::{Outcome, StateMachine};

fn machine() -> (StateMachine<Charger>, Charger) {
    let mut machine = StateMachine::new(
        MachineId::new(0),
        definition().unwrap(),
        ChargerState::WaitForBattery.id(),
    )
    .unwrap();
    machine.set_active(true);
    (machine, Charger::new(ChargerConfig::new()))
}

fn send(machine: &mut StateMachine<Charger>, charger: &mut Charger, event: ChargerEvent) -> Outcome {
    machine.dispatch(charger, event.id())
}

#[test]
fn table_is_valid() {
    let definition = definition().unwrap();
    assert_eq!(definition.transitions().len(), 8);
    assert_eq!(definition.state_count(), ChargerState::COUNT);
    assert_eq!(definition.event_count(), ChargerEvent::COUNT);
}

#[test]
fn ids_convert_both_ways() {
    for state in [
        ChargerState::WaitForBattery,
        ChargerState::WaitForUnplug,
        ChargerState::Charging,
    ] {
        assert_eq!(ChargerState::from_id(state.id()), Some(state));
    }
    assert_eq!(ChargerState::from_id(StateId(3)), None);
    assert_eq!(ChargerEvent::from_id(ChargerEvent::TimerExpired.id()), Some(ChargerEvent::TimerExpired));
}

#[test]
fn unmatched_events_change_nothing() {
    let (mut machine, mut charger) = machine();

    for event in [ChargerEvent::Charged, ChargerEvent::TimerExpired] {
        let outcome = send(&mut machine, &mut charger, event);
        assert!(matches!(outcome, Outcome::Ignored { .. }));
        assert_eq!(machine.state(), ChargerState::WaitForBattery.id());
        assert_eq!(charger.take_charge_command(), None);
    }
}

#[test]
fn start_and_stop_leave_output_commands() {
    let (mut machine, mut charger) = machine();

    send(&mut machine, &mut charger, ChargerEvent::BatteryPresent);
    assert_eq!(machine.state(), ChargerState::Charging.id());
    assert_eq!(charger.take_charge_command(), Some(IoControl::On));

    send(&mut machine, &mut charger, ChargerEvent::TimerExpired);
    assert_eq!(machine.state(), ChargerState::WaitForUnplug.id());
    assert_eq!(charger.take_charge_command(), Some(IoControl::Off));

    send(&mut machine, &mut charger, ChargerEvent::Unplugged);
    assert_eq!(machine.state(), ChargerState::WaitForBattery.id());
    assert_eq!(charger.take_charge_command(), None);
}

#[test]
fn termination_is_deferred_not_dispatched_inline() {
    let (mut machine, mut charger) = machine();
    send(&mut machine, &mut charger, ChargerEvent::BatteryPresent);
    charger.take_charge_command();

    charger.set_latest_reading(3000);
    for _ in 0..32 {
        send(&mut machine, &mut charger, ChargerEvent::BatteryPresent);
    }
    assert_eq!(charger.next_deferred(), None);

    // (31 * 3000 + 1000) / 32 = 2937, a drop of 63
    charger.set_latest_reading(1000);
    send(&mut machine, &mut charger, ChargerEvent::BatteryPresent);

    assert_eq!(machine.state(), ChargerState::Charging.id());
    assert_eq!(charger.next_deferred(), Some(ChargerEvent::Charged.id()));
    assert_eq!(charger.next_deferred(), None);
}
