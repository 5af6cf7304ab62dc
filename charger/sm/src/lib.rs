#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

//! # Charger State Machines
//!
//! Flat, table-driven finite state machines:
//! - [`definition`] – immutable state sets and transition tables, validated once
//! - [`machine`] – per-instance dispatch of (state, event) to (action, next state)
//! - [`manager`] – fixed-capacity registry handing out machine handles
//! - [`queue`] – deferred events raised from inside actions
//!
//! Dispatch is single-threaded and run-to-completion. Actions and entry hooks
//! receive the caller's context, never the machine itself, so an action cannot
//! dispatch into the machine that is running it. Follow-up events go through
//! an [`EventQueue`] and are dispatched by the caller once the current
//! transition has finished.

pub mod definition;
pub mod machine;
pub mod manager;
pub mod queue;

pub use definition::*;
pub use machine::*;
pub use manager::*;
pub use queue::*;

#[cfg(test)]
mod tests;
