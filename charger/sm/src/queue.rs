//! Deferred event queue
//!
//! Actions may not dispatch into their own machine. They post follow-up
//! events here instead; the owner drains the queue once the running
//! transition has completed.

use charger_core::{CoreError, CoreResult, EventId};
use heapless::Deque;

/// Follow-up events raised while a transition runs, delivered in order
pub struct EventQueue<const N: usize> {
    pending: Deque<EventId, N>,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            pending: Deque::new(),
        }
    }

    /// Queue `event` behind the ones already raised
    pub fn post(&mut self, event: EventId) -> CoreResult<()> {
        self.pending
            .push_back(event)
            .map_err(|_| CoreError::QueueFull)
    }

    /// Oldest raised event not yet delivered
    pub fn pop(&mut self) -> Option<EventId> {
        self.pending.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Definition, State, StateMachine, Step, Transition};
    use charger_core::{MachineId, StateId};

    const IDLE: StateId = StateId(0);
    const FILLING: StateId = StateId(1);
    const FULL: StateId = StateId(2);

    const SAMPLE: EventId = EventId(0);
    const OVERFLOW: EventId = EventId(1);

    #[derive(Default)]
    struct Tank {
        level: u8,
        log: Vec<Step>,
        deferred: EventQueue<2>,
    }

    fn fill(tank: &mut Tank, step: Step) {
        tank.level += 1;
        tank.log.push(step);
        if tank.level >= 2 {
            tank.deferred.post(OVERFLOW).unwrap();
        }
    }

    fn entered(tank: &mut Tank, step: Step) {
        tank.log.push(step);
    }

    static STATES: [State<Tank>; 3] = [
        State::new(IDLE),
        State::new(FILLING),
        State::with_entry(FULL, entered),
    ];

    static TABLE: [Transition<Tank>; 3] = [
        Transition::with_action(IDLE, SAMPLE, fill, FILLING),
        Transition::with_action(FILLING, SAMPLE, fill, FILLING),
        Transition::new(FILLING, OVERFLOW, FULL),
    ];

    fn machine() -> StateMachine<Tank> {
        let definition = Definition::new(&STATES, &TABLE, 2, 3).unwrap();
        let mut machine = StateMachine::new(MachineId::new(0), definition, IDLE).unwrap();
        machine.set_active(true);
        machine
    }

    fn deliver(machine: &mut StateMachine<Tank>, tank: &mut Tank, event: EventId) {
        machine.dispatch(tank, event);
        while let Some(next) = tank.deferred.pop() {
            machine.dispatch(tank, next);
        }
    }

    #[test]
    fn raised_event_waits_for_the_running_transition() {
        let mut machine = machine();
        let mut tank = Tank::default();

        deliver(&mut machine, &mut tank, SAMPLE);
        assert_eq!(machine.state(), FILLING);
        assert!(tank.deferred.is_empty());

        // The second fill raises OVERFLOW from inside its action; the machine
        // commits FILLING before the follow-up moves it on.
        machine.dispatch(&mut tank, SAMPLE);
        assert_eq!(machine.state(), FILLING);
        assert!(!tank.deferred.is_empty());

        let next = tank.deferred.pop().unwrap();
        machine.dispatch(&mut tank, next);
        assert_eq!(machine.state(), FULL);
        assert_eq!(
            tank.log.last(),
            Some(&Step {
                from: FILLING,
                to: FULL,
                event: OVERFLOW
            })
        );
    }

    #[test]
    fn drained_in_posting_order() {
        let mut queue: EventQueue<3> = EventQueue::new();

        queue.post(OVERFLOW).unwrap();
        queue.post(SAMPLE).unwrap();

        assert_eq!(queue.pop(), Some(OVERFLOW));
        assert_eq!(queue.pop(), Some(SAMPLE));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn post_beyond_capacity_is_refused() {
        let mut tank = Tank::default();

        assert!(tank.deferred.post(SAMPLE).is_ok());
        assert!(tank.deferred.post(SAMPLE).is_ok());
        assert_eq!(tank.deferred.post(OVERFLOW), Err(CoreError::QueueFull));
        assert_eq!(tank.deferred.pop(), Some(SAMPLE));
    }
}
