//! Per-instance dispatch

use crate::definition::{Definition, Step};
use charger_core::{CoreError, CoreResult, EventId, MachineId, StateId};

/// Result of delivering one event to a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The machine is not active; nothing happened
    Inactive,
    /// No entry for (state, event); nothing happened
    Ignored { state: StateId, event: EventId },
    /// A transition ran and the machine is now in `step.to`
    Transitioned(Step),
}

impl Outcome {
    /// Check if a transition was taken
    pub fn is_transition(&self) -> bool {
        matches!(self, Outcome::Transitioned(_))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Outcome {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Outcome::Inactive => defmt::write!(fmt, "Inactive"),
            Outcome::Ignored { state, event } => {
                defmt::write!(fmt, "Ignored({}, {})", state, event)
            }
            Outcome::Transitioned(step) => defmt::write!(fmt, "Transitioned({})", step),
        }
    }
}

/// One machine instance over a shared definition
pub struct StateMachine<C: 'static> {
    id: MachineId,
    active: bool,
    current: StateId,
    definition: Definition<C>,
}

impl<C: 'static> StateMachine<C> {
    /// Create an inactive machine resting in `initial`
    pub fn new(id: MachineId, definition: Definition<C>, initial: StateId) -> CoreResult<Self> {
        if initial.index() >= definition.state_count() {
            return Err(CoreError::StateOutOfRange(initial));
        }
        if !definition.contains(initial) {
            return Err(CoreError::UndeclaredState(initial));
        }
        Ok(Self {
            id,
            active: false,
            current: initial,
            definition,
        })
    }

    /// Deliver one event
    ///
    /// With a matching entry the action runs first with (old, new, event),
    /// then the new state is committed, then the destination's entry hook
    /// runs with the same triple. Self-transitions run the entry hook too.
    /// Without a match the call changes nothing.
    pub fn dispatch(&mut self, ctx: &mut C, event: EventId) -> Outcome {
        if !self.active {
            return Outcome::Inactive;
        }

        let Some(entry) = self.definition.find(self.current, event) else {
            return Outcome::Ignored {
                state: self.current,
                event,
            };
        };

        let step = Step {
            from: self.current,
            to: entry.to,
            event,
        };

        entry.action.run(ctx, step);
        self.current = entry.to;
        if let Some(target) = self.definition.state(entry.to) {
            target.on_entry.run(ctx, step);
        }

        Outcome::Transitioned(step)
    }

    /// Gate whether the machine accepts events
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Check whether the machine accepts events
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current state
    pub fn state(&self) -> StateId {
        self.current
    }

    /// Handle this machine was registered under
    pub fn id(&self) -> MachineId {
        self.id
    }

    /// The machine's definition
    pub fn definition(&self) -> &Definition<C> {
        &self.definition
    }
}
