//! ADC completion bridge
//!
//! The control block hands one completed conversion from the ADC interrupt to
//! the polling main loop. Each field has exactly one writer at a time:
//!
//! - `busy`: set by the main loop in [`AdcControlBlock::begin_conversion`]
//!   while no conversion is running, cleared by the interrupt.
//! - `reading`, `overruns`: written by the interrupt only.
//! - `complete`: set by the interrupt (release), read and cleared by the main
//!   loop inside a critical section (acquire).
//!
//! The interrupt stores the reading before publishing `complete`, so a `true`
//! from [`AdcControlBlock::test_and_clear`] guarantees the reading is visible.

use crate::Reading;
use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

/// Analog input the block is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    Channel0,
    Channel1,
    Channel2,
    Channel3,
}

impl AdcChannel {
    /// Multiplexer number of the channel
    pub const fn number(self) -> u8 {
        match self {
            AdcChannel::Channel0 => 0,
            AdcChannel::Channel1 => 1,
            AdcChannel::Channel2 => 2,
            AdcChannel::Channel3 => 3,
        }
    }
}

/// Shared record between the ADC interrupt and the main loop
#[derive(Debug)]
pub struct AdcControlBlock {
    channel: AdcChannel,
    busy: AtomicBool,
    complete: AtomicBool,
    reading: AtomicU16,
    overruns: AtomicU32,
}

impl AdcControlBlock {
    /// Create an idle block for `channel`
    pub const fn new(channel: AdcChannel) -> Self {
        Self {
            channel,
            busy: AtomicBool::new(false),
            complete: AtomicBool::new(false),
            reading: AtomicU16::new(0),
            overruns: AtomicU32::new(0),
        }
    }

    /// Channel this block samples
    pub const fn channel(&self) -> AdcChannel {
        self.channel
    }

    /// Main loop side: mark a conversion as started
    ///
    /// Returns `false` if a conversion is still running; the caller must not
    /// start the hardware in that case.
    pub fn begin_conversion(&self) -> bool {
        if self.busy.load(Ordering::Acquire) {
            return false;
        }
        self.busy.store(true, Ordering::Release);
        true
    }

    /// Check whether a conversion is running
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Interrupt side: publish a completed conversion
    ///
    /// Stores the value, then sets the completion flag, then clears busy. A
    /// delivery while the previous result is still unconsumed counts as an
    /// overrun; the newer value replaces the older one.
    pub fn deliver(&self, value: Reading) {
        if self.complete.load(Ordering::Acquire) {
            let overruns = self.overruns.load(Ordering::Relaxed);
            self.overruns
                .store(overruns.wrapping_add(1), Ordering::Relaxed);
        }
        self.reading.store(value, Ordering::Relaxed);
        self.complete.store(true, Ordering::Release);
        self.busy.store(false, Ordering::Release);
    }

    /// Main loop side: read and clear the completion flag
    ///
    /// A delivered conversion is reported exactly once.
    pub fn test_and_clear(&self) -> bool {
        critical_section::with(|_| {
            let complete = self.complete.load(Ordering::Acquire);
            if complete {
                self.complete.store(false, Ordering::Relaxed);
            }
            complete
        })
    }

    /// Most recently delivered value
    ///
    /// Stale unless preceded by a `true` from [`Self::test_and_clear`].
    pub fn reading(&self) -> Reading {
        self.reading.load(Ordering::Relaxed)
    }

    /// Deliveries that arrived before the previous one was consumed
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_numbers() {
        assert_eq!(AdcChannel::Channel0.number(), 0);
        assert_eq!(AdcChannel::Channel3.number(), 3);
    }

    #[test]
    fn begin_conversion_while_busy() {
        let block = AdcControlBlock::new(AdcChannel::Channel1);

        assert!(block.begin_conversion());
        assert!(block.is_busy());
        assert!(!block.begin_conversion());

        block.deliver(5);
        assert!(!block.is_busy());
        assert!(block.begin_conversion());
    }
}
