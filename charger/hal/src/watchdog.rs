//! Watchdog abstraction

use crate::error::HalResult;

/// Watchdog timeout periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogTimeout {
    Ms16,
    Ms32,
    Ms64,
    Ms125,
    Ms250,
    Ms500,
    S1,
    S2,
    S4,
    S8,
}

/// Watchdog trait
pub trait Watchdog {
    /// Enable the watchdog with `timeout`
    fn enable(&mut self, timeout: WatchdogTimeout) -> HalResult<()>;

    /// Disable the watchdog
    fn disable(&mut self) -> HalResult<()>;

    /// Restart the watchdog countdown
    fn feed(&mut self);
}
