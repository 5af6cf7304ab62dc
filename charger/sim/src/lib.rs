//! # Charger Simulator
//!
//! Host-side replacement for the charger's sampling hardware. A [`Script`]
//! describes the readings the ADC would produce, the [`AdcSimulator`] plays
//! them through the same control block contract as the ADC interrupt, and
//! the [`Harness`] drives the unmodified application with a simulated tick.
//!
//! ```rust,no_run
//! use charger_app::ChargerConfig;
//! use charger_sim::{Harness, Script};
//!
//! let script = Script::new().constant(900, 10).ramp(900, -20, 30);
//! let mut harness = Harness::new(&script, ChargerConfig::new()).unwrap();
//! harness.run_to_end().unwrap();
//! println!("{:?}", harness.state_changes());
//! ```

#![forbid(unsafe_code)]

pub mod harness;
pub mod peripherals;
pub mod script;
pub mod simulator;

pub use harness::{Harness, SimApp, DEFAULT_TICKS_PER_STEP};
pub use peripherals::{SimConverter, SimPin, SimSystem, VecSink};
pub use script::{Script, Segment};
pub use simulator::AdcSimulator;
