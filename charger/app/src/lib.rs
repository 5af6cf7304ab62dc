#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # Charger Application
//!
//! Negative-delta-V battery charger built on the charger framework. A single
//! state machine moves between waiting for a battery, charging and waiting
//! for the charged battery to be unplugged. Completed ADC conversions raise
//! `BatteryPresent` or `Unplugged`; while charging, every reading is fed to
//! the averaging filter and a drop of the average below its peak raises
//! `Charged`. The application tick triggers conversions, counts the charge
//! timeout and drives the status LED.

pub mod app;
pub mod config;
pub mod error;
pub mod machine;

pub use app::{ChargerApp, Peripherals, Resources, System};
pub use config::{adc_from_millivolts, ChargerConfig, ConfigError, AVERAGING_WINDOW};
pub use error::{AppError, AppResult};
pub use machine::{definition, Charger, ChargerEvent, ChargerState};

/// Timer slots reserved in the tick scheduler
pub const TIMER_SLOTS: usize = 2;
