#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # Charger Core
//!
//! Identity types and the framework error shared by every crate of the
//! charger firmware: the state-machine engine, the tick scheduler, the ADC
//! bridge and the application built on top of them.

use core::fmt;

pub mod ids;

pub use ids::*;

/// Framework version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the charger framework
pub type CoreResult<T> = Result<T, CoreError>;

/// Error types for charger framework operations
///
/// Every variant describes a defect found while building tables or
/// registries at startup. Runtime dispatch never fails: an event without a
/// matching transition is ignored by policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// Two transition entries share the same (state, event) key
    DuplicateTransition { state: StateId, event: EventId },
    /// A state identity is not below the declared state count
    StateOutOfRange(StateId),
    /// An event identity is not below the declared event count
    EventOutOfRange(EventId),
    /// A transition or initial state names a state that was never declared
    UndeclaredState(StateId),
    /// The same state identity is declared twice
    DuplicateState(StateId),
    /// The machine registry has no free slot
    RegistryFull { capacity: usize },
    /// The tick scheduler has no free timer slot
    TimerRegistryFull { capacity: usize },
    /// A handle that was not issued by this registry
    UnknownMachine(MachineId),
    /// Deferred event queue is full
    QueueFull,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::DuplicateTransition { state, event } => {
                write!(f, "duplicate transition for {} on {}", state, event)
            }
            CoreError::StateOutOfRange(state) => write!(f, "{} is out of range", state),
            CoreError::EventOutOfRange(event) => write!(f, "{} is out of range", event),
            CoreError::UndeclaredState(state) => write!(f, "{} is not declared", state),
            CoreError::DuplicateState(state) => write!(f, "{} is declared twice", state),
            CoreError::RegistryFull { capacity } => {
                write!(f, "machine registry full ({} slots)", capacity)
            }
            CoreError::TimerRegistryFull { capacity } => {
                write!(f, "timer registry full ({} slots)", capacity)
            }
            CoreError::UnknownMachine(id) => write!(f, "unknown {}", id),
            CoreError::QueueFull => write!(f, "Deferred event queue is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoreError {}

#[cfg(feature = "defmt")]
impl defmt::Format for CoreError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CoreError::DuplicateTransition { state, event } => {
                defmt::write!(fmt, "DuplicateTransition({}, {})", state, event)
            }
            CoreError::StateOutOfRange(state) => defmt::write!(fmt, "StateOutOfRange({})", state),
            CoreError::EventOutOfRange(event) => defmt::write!(fmt, "EventOutOfRange({})", event),
            CoreError::UndeclaredState(state) => defmt::write!(fmt, "UndeclaredState({})", state),
            CoreError::DuplicateState(state) => defmt::write!(fmt, "DuplicateState({})", state),
            CoreError::RegistryFull { capacity } => defmt::write!(fmt, "RegistryFull({})", capacity),
            CoreError::TimerRegistryFull { capacity } => {
                defmt::write!(fmt, "TimerRegistryFull({})", capacity)
            }
            CoreError::UnknownMachine(id) => defmt::write!(fmt, "UnknownMachine({})", id),
            CoreError::QueueFull => defmt::write!(fmt, "QueueFull"),
        }
    }
}
