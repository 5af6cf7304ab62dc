#![no_std]
#![forbid(unsafe_code)]

//! # Tick Scheduler
//!
//! Periodic countdown timers driven by one hardware time-base interrupt and
//! polled by the cooperative main loop.
//!
//! Field ownership follows a single-producer/single-consumer discipline:
//!
//! | Field       | Written by                 | Read by    |
//! |-------------|----------------------------|------------|
//! | `countdown` | tick interrupt             | anyone     |
//! | `expired`   | tick interrupt (set), main loop (clear, inside a critical section) | main loop |
//! | `reload`    | owner                      | tick interrupt |
//! | `active`    | owner                      | tick interrupt |
//!
//! Reloading happens inside the interrupt, so a timer with reload `R` expires
//! on every `R`-th tick with no drift, however late the main loop polls.

pub mod scheduler;
pub mod timer;

pub use scheduler::*;
pub use timer::*;

/// Length of one scheduler tick in milliseconds
pub const TICK_PERIOD_MS: u32 = 1;

/// Convert milliseconds to scheduler ticks
pub const fn ticks_from_millis(ms: u32) -> u32 {
    ms / TICK_PERIOD_MS
}
