//! Host stand-ins for the collaborator interfaces

use charger_hal::adc::{AdcConfig, AdcConverter};
use charger_hal::debug::ByteSink;
use charger_hal::gpio::{DigitalOutput, Level};
use charger_hal::interrupt::InterruptControl;
use charger_hal::timer::TimeBase;
use charger_hal::watchdog::{Watchdog, WatchdogTimeout};
use charger_hal::{HalError, HalResult};

/// Output pin remembering every level written to it
#[derive(Debug, Clone, Default)]
pub struct SimPin {
    history: Vec<Level>,
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level currently driven; low before the first write
    pub fn current(&self) -> Level {
        self.history.last().copied().unwrap_or(Level::Low)
    }

    pub fn is_high(&self) -> bool {
        self.current() == Level::High
    }

    pub fn history(&self) -> &[Level] {
        &self.history
    }
}

impl DigitalOutput for SimPin {
    fn write(&mut self, level: Level) -> HalResult<()> {
        self.history.push(level);
        Ok(())
    }

    fn level(&mut self) -> HalResult<Level> {
        Ok(self.current())
    }
}

/// Converter that records triggers; results come from the simulator
#[derive(Debug, Clone, Default)]
pub struct SimConverter {
    config: Option<AdcConfig>,
    triggers: usize,
}

impl SimConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&AdcConfig> {
        self.config.as_ref()
    }

    /// Conversions started so far
    pub fn triggers(&self) -> usize {
        self.triggers
    }
}

impl AdcConverter for SimConverter {
    fn configure(&mut self, config: &AdcConfig) -> HalResult<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn start_conversion(&mut self, channel: u8) -> HalResult<()> {
        if channel > 3 {
            return Err(HalError::InvalidParameter);
        }
        self.triggers += 1;
        Ok(())
    }
}

/// Clock, interrupt and watchdog state of the simulated target
///
/// The simulated clock only moves when [`SimSystem::advance`] is called.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimSystem {
    watchdog: Option<WatchdogTimeout>,
    period_ms: Option<u32>,
    millis: u32,
    interrupts: bool,
}

impl SimSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watchdog_enabled(&self) -> bool {
        self.watchdog.is_some()
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts
    }

    /// Tick period requested at startup, if the time base was started
    pub fn period_ms(&self) -> Option<u32> {
        self.period_ms
    }

    /// Account for `ticks` elapsed time base periods
    pub fn advance(&mut self, ticks: u32) {
        if let Some(period) = self.period_ms {
            self.millis = self.millis.wrapping_add(ticks.wrapping_mul(period));
        }
    }
}

impl TimeBase for SimSystem {
    fn start_periodic(&mut self, period_ms: u32) -> HalResult<()> {
        if period_ms == 0 {
            return Err(HalError::InvalidParameter);
        }
        self.period_ms = Some(period_ms);
        self.millis = 0;
        Ok(())
    }

    fn millis(&self) -> u32 {
        self.millis
    }
}

impl InterruptControl for SimSystem {
    fn enable_global(&mut self) {
        self.interrupts = true;
    }

    fn disable_global(&mut self) {
        self.interrupts = false;
    }
}

impl Watchdog for SimSystem {
    fn enable(&mut self, timeout: WatchdogTimeout) -> HalResult<()> {
        self.watchdog = Some(timeout);
        Ok(())
    }

    fn disable(&mut self) -> HalResult<()> {
        self.watchdog = None;
        Ok(())
    }

    fn feed(&mut self) {}
}

/// Debug output collecting bytes in memory
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    bytes: Vec<u8>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl ByteSink for VecSink {
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), HalError> {
        self.bytes.push(byte);
        Ok(())
    }
}
