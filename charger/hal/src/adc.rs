//! ADC (Analog-to-Digital Converter) abstraction
//!
//! Configuration and triggering only. Completed conversions travel back to
//! the main loop through the ADC control block, not through this trait.

use crate::error::HalResult;

/// ADC clock prescaler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcPrescaler {
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
}

/// ADC reference voltage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcReference {
    /// Internal reference
    Internal,
    /// External reference on AREF pin
    External,
    /// VCC/VDD as reference
    Vcc,
}

/// ADC configuration
#[derive(Debug, Clone)]
pub struct AdcConfig {
    pub prescaler: AdcPrescaler,
    pub reference: AdcReference,
    /// Raise the conversion-complete interrupt
    pub interrupts: bool,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            prescaler: AdcPrescaler::Div64,
            reference: AdcReference::Vcc,
            interrupts: true,
        }
    }
}

/// ADC converter trait
pub trait AdcConverter {
    /// Configure and enable the converter
    fn configure(&mut self, config: &AdcConfig) -> HalResult<()>;

    /// Start one conversion on `channel`; the result arrives by interrupt
    fn start_conversion(&mut self, channel: u8) -> HalResult<()>;
}
