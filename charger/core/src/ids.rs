//! Identity newtypes for states, events and registered machines

use core::fmt;

/// Identity of one state within a machine definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub u8);

impl StateId {
    /// Create a state identity from a raw value
    pub const fn new(raw: u8) -> Self {
        StateId(raw)
    }

    /// Get the raw identity value
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Identity as a table index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateId({})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StateId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "StateId({})", self.0);
    }
}

/// Identity of one event a machine can receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub u8);

impl EventId {
    /// Create an event identity from a raw value
    pub const fn new(raw: u8) -> Self {
        EventId(raw)
    }

    /// Get the raw identity value
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Identity as a table index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EventId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "EventId({})", self.0);
    }
}

/// Opaque handle of a machine registered with a manager
///
/// Handles are issued in registration order starting at zero and stay valid
/// for the lifetime of the manager that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MachineId(u8);

impl MachineId {
    /// Number of distinct handles; registries never hold more machines
    pub const LIMIT: usize = u8::MAX as usize + 1;

    /// Create a handle from a registry slot
    pub const fn new(slot: u8) -> Self {
        MachineId(slot)
    }

    /// Get the raw slot value
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Handle as a registry index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MachineId({})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MachineId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "MachineId({})", self.0);
    }
}
