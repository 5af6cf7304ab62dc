#![no_std]
#![forbid(unsafe_code)]

//! # Charger ADC
//!
//! Delivery of completed conversions from the ADC interrupt to the main loop,
//! and the negative-delta-V filter fed by those conversions.

pub mod averager;
pub mod bridge;
pub mod termination;

pub use averager::Averager;
pub use bridge::{AdcChannel, AdcControlBlock};
pub use termination::{ChargeFilter, NegativeDeltaV};

/// Raw conversion result (10-bit on the reference target)
pub type Reading = u16;
