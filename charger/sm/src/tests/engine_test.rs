//! Engine tests for charger-sm

use crate::{Definition, Outcome, State, StateMachine, Step, Transition};
use charger_core::{CoreError, EventId, MachineId, StateId};

const A: StateId = StateId(0);
const B: StateId = StateId(1);
const C: StateId = StateId(2);

const GO: EventId = EventId(0);
const BACK: EventId = EventId(1);
const STAY: EventId = EventId(2);
const UNUSED: EventId = EventId(3);

const STATE_COUNT: usize = 3;
const EVENT_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Action,
    Entry,
}

#[derive(Default)]
struct Recorder {
    calls: Vec<(Call, Step)>,
}

fn action(rec: &mut Recorder, step: Step) {
    rec.calls.push((Call::Action, step));
}

fn entry(rec: &mut Recorder, step: Step) {
    rec.calls.push((Call::Entry, step));
}

static STATES: [State<Recorder>; 3] = [
    State::with_entry(A, entry),
    State::with_entry(B, entry),
    State::new(C),
];

static TABLE: [Transition<Recorder>; 3] = [
    Transition::with_action(A, GO, action, B),
    Transition::new(B, BACK, A),
    Transition::with_action(B, STAY, action, B),
];

fn definition() -> Definition<Recorder> {
    Definition::new(&STATES, &TABLE, EVENT_COUNT, STATE_COUNT).unwrap()
}

fn machine_in(state: StateId) -> StateMachine<Recorder> {
    let mut machine = StateMachine::new(MachineId::new(0), definition(), state).unwrap();
    machine.set_active(true);
    machine
}

#[test]
fn unmatched_events_are_noops() {
    let def = definition();
    for state in [A, B, C] {
        for raw in 0..EVENT_COUNT as u8 {
            let event = EventId(raw);
            if def.find(state, event).is_some() {
                continue;
            }
            let mut machine = machine_in(state);
            let mut rec = Recorder::default();

            let outcome = machine.dispatch(&mut rec, event);

            assert_eq!(outcome, Outcome::Ignored { state, event });
            assert_eq!(machine.state(), state);
            assert!(rec.calls.is_empty());
        }
    }
}

#[test]
fn matched_event_runs_action_once_then_entry() {
    let mut machine = machine_in(A);
    let mut rec = Recorder::default();

    let outcome = machine.dispatch(&mut rec, GO);

    let step = Step {
        from: A,
        to: B,
        event: GO,
    };
    assert_eq!(outcome, Outcome::Transitioned(step));
    assert_eq!(machine.state(), B);
    assert_eq!(rec.calls, vec![(Call::Action, step), (Call::Entry, step)]);
}

#[test]
fn transition_without_action_runs_entry_only() {
    let mut machine = machine_in(B);
    let mut rec = Recorder::default();

    machine.dispatch(&mut rec, BACK);

    assert_eq!(machine.state(), A);
    assert_eq!(rec.calls.len(), 1);
    assert_eq!(rec.calls[0].0, Call::Entry);
}

#[test]
fn self_transition_reenters_state() {
    let mut machine = machine_in(B);
    let mut rec = Recorder::default();

    machine.dispatch(&mut rec, STAY);
    machine.dispatch(&mut rec, STAY);

    assert_eq!(machine.state(), B);
    assert_eq!(rec.calls.len(), 4);
    assert!(rec.calls.iter().all(|(_, step)| step.from == B && step.to == B));
}

#[test]
fn inactive_machine_ignores_everything() {
    let mut machine = StateMachine::new(MachineId::new(0), definition(), A).unwrap();
    let mut rec = Recorder::default();

    assert!(!machine.is_active());
    assert_eq!(machine.dispatch(&mut rec, GO), Outcome::Inactive);
    assert_eq!(machine.state(), A);
    assert!(rec.calls.is_empty());

    machine.set_active(true);
    assert!(machine.dispatch(&mut rec, GO).is_transition());
}

#[test]
fn unused_event_in_range_is_accepted() {
    let def = definition();
    assert!(def.find(A, UNUSED).is_none());
    assert_eq!(def.event_count(), EVENT_COUNT);
    assert_eq!(def.transitions().len(), 3);
}

static DUPLICATE: [Transition<Recorder>; 2] = [
    Transition::with_action(A, GO, action, B),
    Transition::new(A, GO, C),
];

#[test]
fn duplicate_key_rejected() {
    let err = Definition::new(&STATES, &DUPLICATE, EVENT_COUNT, STATE_COUNT).unwrap_err();
    assert_eq!(err, CoreError::DuplicateTransition { state: A, event: GO });
}

static BAD_EVENT: [Transition<Recorder>; 1] = [Transition::new(A, EventId(9), B)];

#[test]
fn event_out_of_range_rejected() {
    let err = Definition::new(&STATES, &BAD_EVENT, EVENT_COUNT, STATE_COUNT).unwrap_err();
    assert_eq!(err, CoreError::EventOutOfRange(EventId(9)));
}

static BAD_TARGET: [Transition<Recorder>; 1] = [Transition::new(A, GO, StateId(7))];

#[test]
fn state_out_of_range_rejected() {
    let err = Definition::new(&STATES, &BAD_TARGET, EVENT_COUNT, STATE_COUNT).unwrap_err();
    assert_eq!(err, CoreError::StateOutOfRange(StateId(7)));
}

static TWO_STATES: [State<Recorder>; 2] = [State::new(A), State::new(B)];
static TO_C: [Transition<Recorder>; 1] = [Transition::new(A, GO, C)];

#[test]
fn undeclared_state_rejected() {
    let err = Definition::new(&TWO_STATES, &TO_C, EVENT_COUNT, STATE_COUNT).unwrap_err();
    assert_eq!(err, CoreError::UndeclaredState(C));
}

static REPEATED_STATE: [State<Recorder>; 2] = [State::new(A), State::new(A)];

#[test]
fn duplicate_state_rejected() {
    let err = Definition::new(&REPEATED_STATE, &[], EVENT_COUNT, STATE_COUNT).unwrap_err();
    assert_eq!(err, CoreError::DuplicateState(A));
}

#[test]
fn initial_state_must_be_declared() {
    let def = Definition::new(&TWO_STATES, &[], EVENT_COUNT, STATE_COUNT).unwrap();
    assert_eq!(
        StateMachine::new(MachineId::new(0), def, C).err(),
        Some(CoreError::UndeclaredState(C))
    );
    assert_eq!(
        StateMachine::new(MachineId::new(0), def, StateId(3)).err(),
        Some(CoreError::StateOutOfRange(StateId(3)))
    );
}
