//! Machine registry
//!
//! Flat, fixed-capacity bookkeeping of machine instances. The registry hands
//! out handles and looks machines up; dispatch itself belongs to
//! [`StateMachine`].

use crate::definition::Definition;
use crate::machine::{Outcome, StateMachine};
use charger_core::{CoreError, CoreResult, EventId, MachineId, StateId};
use heapless::Vec;

/// Registry of up to `N` machines sharing the context type `C`
pub struct MachineManager<C: 'static, const N: usize> {
    machines: Vec<StateMachine<C>, N>,
}

impl<C: 'static, const N: usize> MachineManager<C, N> {
    /// Create an empty registry with room for `N` machines
    pub const fn new() -> Self {
        Self {
            machines: Vec::new(),
        }
    }

    /// Register a new machine resting in `initial`
    ///
    /// The machine starts inactive. Fails when all slots are taken or the
    /// initial state is not part of the definition. A registry never issues
    /// more than [`MachineId::LIMIT`] handles, whatever `N` is.
    pub fn init(&mut self, definition: Definition<C>, initial: StateId) -> CoreResult<MachineId> {
        let capacity = self.capacity();
        let full = CoreError::RegistryFull { capacity };
        if self.machines.len() >= capacity {
            return Err(full);
        }

        let slot = u8::try_from(self.machines.len()).map_err(|_| full)?;
        let id = MachineId::new(slot);
        let machine = StateMachine::new(id, definition, initial)?;
        self.machines.push(machine).map_err(|_| full)?;
        Ok(id)
    }

    /// Look up a machine
    pub fn get(&self, id: MachineId) -> Option<&StateMachine<C>> {
        self.machines.get(id.index())
    }

    /// Look up a machine mutably
    pub fn get_mut(&mut self, id: MachineId) -> Option<&mut StateMachine<C>> {
        self.machines.get_mut(id.index())
    }

    /// Deliver `event` to the machine behind `id`
    pub fn event(&mut self, id: MachineId, ctx: &mut C, event: EventId) -> CoreResult<Outcome> {
        self.machine_mut(id).map(|machine| machine.dispatch(ctx, event))
    }

    /// Gate whether the machine behind `id` accepts events
    pub fn set_active(&mut self, id: MachineId, active: bool) -> CoreResult<()> {
        self.machine_mut(id).map(|machine| machine.set_active(active))
    }

    /// Check whether the machine behind `id` accepts events
    pub fn is_active(&self, id: MachineId) -> CoreResult<bool> {
        self.machine(id).map(StateMachine::is_active)
    }

    /// Current state of the machine behind `id`
    pub fn state(&self, id: MachineId) -> CoreResult<StateId> {
        self.machine(id).map(StateMachine::state)
    }

    /// Number of registered machines
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    /// Check if no machine is registered
    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Maximum number of machines
    pub const fn capacity(&self) -> usize {
        if N < MachineId::LIMIT {
            N
        } else {
            MachineId::LIMIT
        }
    }

    /// Iterate over all registered machines
    pub fn iter(&self) -> impl Iterator<Item = &StateMachine<C>> + '_ {
        self.machines.iter()
    }

    fn machine(&self, id: MachineId) -> CoreResult<&StateMachine<C>> {
        self.get(id).ok_or(CoreError::UnknownMachine(id))
    }

    fn machine_mut(&mut self, id: MachineId) -> CoreResult<&mut StateMachine<C>> {
        self.get_mut(id).ok_or(CoreError::UnknownMachine(id))
    }
}

impl<C: 'static, const N: usize> Default for MachineManager<C, N> {
    fn default() -> Self {
        Self::new()
    }
}
