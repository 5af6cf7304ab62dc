//! Trace record types and configuration

/// Trace record types emitted by the charger firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RecordType {
    /// A machine entered a state (machine, from, to, event)
    StateEntry = 1,
    /// An event matched no transition (machine, state, event)
    Ignored = 2,
    /// A completed conversion was consumed (channel, value)
    AdcReading = 3,
    /// A conversion arrived before the previous one was consumed (count)
    AdcOverrun = 4,
    /// An application tick fired (charging tick count)
    TimerExpired = 5,
    /// Negative-delta-V termination (peak, average)
    Charged = 6,
    /// Charging stopped on timeout (tick count)
    ChargeTimeout = 7,
    /// Target description, sent once at startup (not maskable)
    TargetInfo = 64,
}

impl RecordType {
    /// Get the record type name
    pub const fn name(self) -> &'static str {
        match self {
            Self::StateEntry => "STATE_ENTRY",
            Self::Ignored => "IGNORED",
            Self::AdcReading => "ADC_READING",
            Self::AdcOverrun => "ADC_OVERRUN",
            Self::TimerExpired => "TIMER_EXPIRED",
            Self::Charged => "CHARGED",
            Self::ChargeTimeout => "CHARGE_TIMEOUT",
            Self::TargetInfo => "TARGET_INFO",
        }
    }

    /// Check if record is non-maskable (always passes filters)
    pub const fn is_non_maskable(self) -> bool {
        matches!(self, Self::TargetInfo)
    }

    /// Filter mask bit of this record type
    pub const fn bit(self) -> u128 {
        1u128 << (self as u8)
    }
}

/// Record group filters
pub mod filters {
    use super::RecordType;

    /// Every record type
    pub const ALL_RECORDS: u128 = u128::MAX;

    /// State machine records
    pub const SM_RECORDS: u128 = RecordType::StateEntry.bit() | RecordType::Ignored.bit();

    /// ADC records
    pub const ADC_RECORDS: u128 = RecordType::AdcReading.bit() | RecordType::AdcOverrun.bit();

    /// Charge cycle records
    pub const CHARGE_RECORDS: u128 = RecordType::TimerExpired.bit()
        | RecordType::Charged.bit()
        | RecordType::ChargeTimeout.bit();
}

/// Where record timestamps come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimestampSource {
    /// Running count of committed records
    RecordCounter,
    /// Last value passed to `set_time` (scheduler ticks)
    Ticks,
}

/// Tracer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceConfig {
    /// Enabled record types, one bit per [`RecordType`]
    pub filter: u128,
    /// Timestamp source
    pub timestamp: TimestampSource,
}

impl TraceConfig {
    /// Everything enabled, timestamps from the tick counter
    pub const fn new() -> Self {
        Self {
            filter: filters::ALL_RECORDS,
            timestamp: TimestampSource::Ticks,
        }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::new()
    }
}
