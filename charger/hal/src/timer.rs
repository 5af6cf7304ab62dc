//! Millisecond time base abstraction

use crate::error::HalResult;

/// Periodic tick source driving the tick scheduler interrupt
pub trait TimeBase {
    /// Start the periodic tick interrupt with `period_ms` between ticks
    fn start_periodic(&mut self, period_ms: u32) -> HalResult<()>;

    /// Milliseconds elapsed since the time base started
    fn millis(&self) -> u32;
}
