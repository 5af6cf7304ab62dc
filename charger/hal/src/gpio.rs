//! GPIO (General Purpose Input/Output) abstraction

use crate::error::{HalError, HalResult};

/// GPIO pin levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Low level (0V)
    Low,
    /// High level (VCC)
    High,
}

impl Level {
    /// The opposite level
    pub const fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Output command applied to a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoControl {
    /// Drive high
    On,
    /// Drive low
    Off,
    /// Invert the current level
    Toggle,
}

/// Digital output pin
pub trait DigitalOutput {
    /// Drive the pin to `level`
    fn write(&mut self, level: Level) -> HalResult<()>;

    /// Level currently driven
    fn level(&mut self) -> HalResult<Level>;

    /// Toggle output
    fn toggle(&mut self) -> HalResult<()> {
        let current = self.level()?;
        self.write(current.inverted())
    }

    /// Apply an output command
    fn control(&mut self, command: IoControl) -> HalResult<()> {
        match command {
            IoControl::On => self.write(Level::High),
            IoControl::Off => self.write(Level::Low),
            IoControl::Toggle => self.toggle(),
        }
    }
}

/// Adapter for any `embedded-hal` stateful output pin
pub struct EmbeddedHalPin<P> {
    pin: P,
}

impl<P> EmbeddedHalPin<P> {
    /// Wrap an `embedded-hal` pin
    pub const fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> DigitalOutput for EmbeddedHalPin<P>
where
    P: embedded_hal::digital::StatefulOutputPin,
{
    fn write(&mut self, level: Level) -> HalResult<()> {
        let result = match level {
            Level::High => self.pin.set_high(),
            Level::Low => self.pin.set_low(),
        };
        result.map_err(|_| HalError::HardwareError)
    }

    fn level(&mut self) -> HalResult<Level> {
        self.pin
            .is_set_high()
            .map(Level::from)
            .map_err(|_| HalError::HardwareError)
    }

    fn toggle(&mut self) -> HalResult<()> {
        self.pin.toggle().map_err(|_| HalError::HardwareError)
    }
}
