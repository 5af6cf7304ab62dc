//! Machine definitions: state sets and transition tables

use charger_core::{CoreError, CoreResult, EventId, StateId};
use core::fmt;

/// One committed transition, passed to actions and entry hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// State the machine left
    pub from: StateId,
    /// State the machine entered
    pub to: StateId,
    /// Event that triggered the transition
    pub event: EventId,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Step {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{} -> {} on {}", self.from, self.to, self.event);
    }
}

/// Callback signature shared by transition actions and entry hooks
pub type Callback<C> = fn(&mut C, Step);

/// Optional callback attached to a transition or a state
pub enum Hook<C> {
    /// Nothing to run
    None,
    /// Run the callback with the caller's context
    Call(Callback<C>),
}

impl<C> Hook<C> {
    /// Run the hook, if any
    #[inline]
    pub fn run(&self, ctx: &mut C, step: Step) {
        if let Hook::Call(callback) = self {
            callback(ctx, step);
        }
    }

    /// Check whether a callback is attached
    pub const fn is_some(&self) -> bool {
        matches!(self, Hook::Call(_))
    }
}

impl<C> Clone for Hook<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Hook<C> {}

impl<C> fmt::Debug for Hook<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::None => write!(f, "Hook::None"),
            Hook::Call(_) => write!(f, "Hook::Call"),
        }
    }
}

/// A state and its entry hook
pub struct State<C> {
    pub id: StateId,
    pub on_entry: Hook<C>,
}

impl<C> State<C> {
    /// State without an entry hook
    pub const fn new(id: StateId) -> Self {
        Self {
            id,
            on_entry: Hook::None,
        }
    }

    /// State whose entry hook runs after every transition into it
    pub const fn with_entry(id: StateId, on_entry: Callback<C>) -> Self {
        Self {
            id,
            on_entry: Hook::Call(on_entry),
        }
    }
}

/// One row of a transition table
pub struct Transition<C> {
    pub from: StateId,
    pub event: EventId,
    pub action: Hook<C>,
    pub to: StateId,
}

impl<C> Transition<C> {
    /// Transition without an action
    pub const fn new(from: StateId, event: EventId, to: StateId) -> Self {
        Self {
            from,
            event,
            action: Hook::None,
            to,
        }
    }

    /// Transition running `action` before the state is committed
    pub const fn with_action(
        from: StateId,
        event: EventId,
        action: Callback<C>,
        to: StateId,
    ) -> Self {
        Self {
            from,
            event,
            action: Hook::Call(action),
            to,
        }
    }
}

/// Validated, immutable machine definition
///
/// The state set and the transition table are `'static` slices; a definition
/// only borrows them, so it is cheap to copy into every machine instance.
pub struct Definition<C: 'static> {
    states: &'static [State<C>],
    transitions: &'static [Transition<C>],
    event_count: usize,
    state_count: usize,
}

impl<C: 'static> Clone for Definition<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: 'static> Copy for Definition<C> {}

impl<C: 'static> fmt::Debug for Definition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("states", &self.states.len())
            .field("transitions", &self.transitions.len())
            .field("event_count", &self.event_count)
            .field("state_count", &self.state_count)
            .finish()
    }
}

impl<C: 'static> Definition<C> {
    /// Validate a state set and transition table
    ///
    /// Rejects state or event identities outside `state_count`/`event_count`,
    /// states declared twice, transitions naming undeclared states and more
    /// than one entry for the same (state, event) pair.
    pub fn new(
        states: &'static [State<C>],
        transitions: &'static [Transition<C>],
        event_count: usize,
        state_count: usize,
    ) -> CoreResult<Self> {
        for (i, state) in states.iter().enumerate() {
            if state.id.index() >= state_count {
                return Err(CoreError::StateOutOfRange(state.id));
            }
            if states[..i].iter().any(|other| other.id == state.id) {
                return Err(CoreError::DuplicateState(state.id));
            }
        }

        let definition = Self {
            states,
            transitions,
            event_count,
            state_count,
        };

        for (i, entry) in transitions.iter().enumerate() {
            for id in [entry.from, entry.to] {
                if id.index() >= state_count {
                    return Err(CoreError::StateOutOfRange(id));
                }
                if !definition.contains(id) {
                    return Err(CoreError::UndeclaredState(id));
                }
            }
            if entry.event.index() >= event_count {
                return Err(CoreError::EventOutOfRange(entry.event));
            }
            let duplicate = transitions[..i]
                .iter()
                .any(|other| other.from == entry.from && other.event == entry.event);
            if duplicate {
                return Err(CoreError::DuplicateTransition {
                    state: entry.from,
                    event: entry.event,
                });
            }
        }

        Ok(definition)
    }

    /// Entry matching (state, event), if any
    pub fn find(&self, state: StateId, event: EventId) -> Option<&'static Transition<C>> {
        self.transitions
            .iter()
            .find(|entry| entry.from == state && entry.event == event)
    }

    /// Declared state with this identity
    pub fn state(&self, id: StateId) -> Option<&'static State<C>> {
        self.states.iter().find(|state| state.id == id)
    }

    /// Check whether a state is declared
    pub fn contains(&self, id: StateId) -> bool {
        self.state(id).is_some()
    }

    /// Number of events the table was declared with
    pub const fn event_count(&self) -> usize {
        self.event_count
    }

    /// Number of states the table was declared with
    pub const fn state_count(&self) -> usize {
        self.state_count
    }

    /// The transition table
    pub const fn transitions(&self) -> &'static [Transition<C>] {
        self.transitions
    }
}
