use charger_core::{EventId, MachineId, StateId};
use charger_sm::{Definition, State, StateMachine, Step, Transition};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const OFF: StateId = StateId(0);
const ON: StateId = StateId(1);
const FLIP: EventId = EventId(0);
const NOISE: EventId = EventId(1);

fn flip(count: &mut u32, _step: Step) {
    *count += 1;
}

static STATES: [State<u32>; 2] = [State::new(OFF), State::new(ON)];
static TABLE: [Transition<u32>; 2] = [
    Transition::with_action(OFF, FLIP, flip, ON),
    Transition::with_action(ON, FLIP, flip, OFF),
];

fn bench_dispatch(c: &mut Criterion) {
    let definition = Definition::new(&STATES, &TABLE, 2, 2).unwrap();
    let mut machine = StateMachine::new(MachineId::new(0), definition, OFF).unwrap();
    machine.set_active(true);
    let mut count = 0u32;

    c.bench_function("dispatch_transition", |b| {
        b.iter(|| machine.dispatch(&mut count, black_box(FLIP)))
    });
    c.bench_function("dispatch_ignored", |b| {
        b.iter(|| machine.dispatch(&mut count, black_box(NOISE)))
    });
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
