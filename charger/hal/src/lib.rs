//! Collaborator interfaces for the charger firmware
//!
//! The register-level drivers live outside this workspace. This crate only
//! names what the core and the application consume from them: digital
//! outputs, ADC configuration and triggering, a millisecond time base, the
//! watchdog, interrupt masking and a byte-stream debug output.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod adc;
pub mod debug;
pub mod error;
pub mod gpio;
pub mod interrupt;
pub mod timer;
pub mod watchdog;

// Re-export commonly used types
pub use error::{HalError, HalResult};
