//! Charger tuning constants

use charger_adc::{AdcChannel, Reading};
use charger_tick::ticks_from_millis;
use core::fmt;

/// Milliseconds per hour
pub const MS_PER_HOUR: u32 = 3_600_000;

/// Samples in the averaging window
pub const AVERAGING_WINDOW: usize = 32;

/// Convert millivolts to 10-bit counts over a 5000 mV reference, rounded
pub const fn adc_from_millivolts(mv: u32) -> Reading {
    ((mv * 1023 + 2500) / 5000) as Reading
}

/// Configuration rejected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `tick_ms` is zero, so the application timer would never expire
    ZeroTick,
    /// `capacity_mah` is zero
    ZeroCapacity,
    /// `charge_rate_ma` is zero
    ZeroChargeRate,
    /// The charge timeout rounds down to zero application ticks
    NoTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTick => write!(f, "application tick is zero"),
            ConfigError::ZeroCapacity => write!(f, "battery capacity is zero"),
            ConfigError::ZeroChargeRate => write!(f, "charge rate is zero"),
            ConfigError::NoTimeout => write!(f, "charge timeout is shorter than one tick"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ConfigError::ZeroTick => defmt::write!(fmt, "ZeroTick"),
            ConfigError::ZeroCapacity => defmt::write!(fmt, "ZeroCapacity"),
            ConfigError::ZeroChargeRate => defmt::write!(fmt, "ZeroChargeRate"),
            ConfigError::NoTimeout => defmt::write!(fmt, "NoTimeout"),
        }
    }
}

/// Charger configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargerConfig {
    /// Battery sense input
    pub channel: AdcChannel,
    /// Voltage drop from peak that ends a charge
    pub negative_delta_v: Reading,
    /// Readings above this count as a connected battery
    pub disconnected_high: Reading,
    /// Readings below this count as a connected battery
    pub disconnected_low: Reading,
    /// Application tick in milliseconds
    pub tick_ms: u32,
    pub capacity_mah: u32,
    pub charge_rate_ma: u32,
    /// Name sent in the target info trace record
    pub target_name: &'static str,
}

impl ChargerConfig {
    /// Defaults of the reference board
    pub const fn new() -> Self {
        Self {
            channel: AdcChannel::Channel2,
            negative_delta_v: adc_from_millivolts(300),
            disconnected_high: adc_from_millivolts(4000),
            disconnected_low: adc_from_millivolts(500),
            tick_ms: 500,
            capacity_mah: 1500,
            charge_rate_ma: 1000,
            target_name: "charger",
        }
    }

    /// Check the values the timer and the charge timeout are derived from
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_reload() == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.capacity_mah == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.charge_rate_ma == 0 {
            return Err(ConfigError::ZeroChargeRate);
        }
        if self.timeout_counts() == 0 {
            return Err(ConfigError::NoTimeout);
        }
        Ok(())
    }

    /// Application tick in scheduler ticks
    pub const fn tick_reload(&self) -> u32 {
        ticks_from_millis(self.tick_ms)
    }

    /// Application ticks before a charge is abandoned
    ///
    /// Zero when the rate or the tick is zero; [`Self::validate`] rejects
    /// such a configuration.
    pub const fn timeout_counts(&self) -> u32 {
        let charge_ms = MS_PER_HOUR as u64 * self.capacity_mah as u64;
        let per_tick = self.charge_rate_ma as u64 * self.tick_ms as u64;
        if per_tick == 0 {
            return 0;
        }
        let counts = charge_ms / per_tick;
        if counts > u32::MAX as u64 {
            u32::MAX
        } else {
            counts as u32
        }
    }

    /// Battery presence test on a raw reading
    ///
    /// Connected means outside the window between the two thresholds.
    pub const fn is_connected(&self, reading: Reading) -> bool {
        reading > self.disconnected_high || reading < self.disconnected_low
    }
}

impl Default for ChargerConfig {
    fn default() -> Self {
        Self::new()
    }
}
