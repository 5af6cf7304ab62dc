//! Negative-delta-V charge termination
//!
//! A cell is declared charged once its averaged voltage has fallen by more
//! than a fixed threshold below the highest average seen in the current
//! charge cycle.

use crate::averager::Averager;
use crate::Reading;

/// Peak tracker and termination predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NegativeDeltaV {
    threshold: Reading,
    highest: Reading,
}

impl NegativeDeltaV {
    /// Create a tracker firing on a drop strictly greater than `threshold`
    pub const fn new(threshold: Reading) -> Self {
        Self {
            threshold,
            highest: 0,
        }
    }

    /// Fold in a new average and evaluate the predicate
    ///
    /// The peak never decreases until [`Self::reset`].
    pub fn update(&mut self, average: Reading) -> bool {
        if average > self.highest {
            self.highest = average;
        }
        self.highest - average > self.threshold
    }

    /// Forget the peak at the start of a charge cycle
    pub fn reset(&mut self) {
        self.highest = 0;
    }

    /// Highest average seen this cycle
    pub const fn highest(&self) -> Reading {
        self.highest
    }

    /// Configured drop threshold
    pub const fn threshold(&self) -> Reading {
        self.threshold
    }
}

/// Averaging window combined with the termination predicate
pub struct ChargeFilter<const N: usize> {
    window: Averager<N>,
    peak: NegativeDeltaV,
}

impl<const N: usize> ChargeFilter<N> {
    /// Create an empty filter
    pub const fn new(threshold: Reading) -> Self {
        Self {
            window: Averager::new(),
            peak: NegativeDeltaV::new(threshold),
        }
    }

    /// Feed one sample; returns `true` when the cell counts as charged
    pub fn new_data(&mut self, sample: Reading) -> bool {
        self.window.push(sample);
        self.peak.update(self.window.average())
    }

    /// Empty the window and forget the peak
    pub fn reset(&mut self) {
        self.window.reset();
        self.peak.reset();
    }

    /// Current window average
    pub fn average(&self) -> Reading {
        self.window.average()
    }

    /// Highest average seen this cycle
    pub fn highest(&self) -> Reading {
        self.peak.highest()
    }

    /// Configured drop threshold
    pub fn threshold(&self) -> Reading {
        self.peak.threshold()
    }

    /// Averaging window
    pub fn window(&self) -> &Averager<N> {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_must_exceed_threshold() {
        let mut ndv = NegativeDeltaV::new(10);

        assert!(!ndv.update(100));
        assert!(!ndv.update(90));
        assert!(ndv.update(89));
        assert_eq!(ndv.highest(), 100);
    }

    #[test]
    fn peak_is_monotone_until_reset() {
        let mut ndv = NegativeDeltaV::new(10);

        ndv.update(50);
        ndv.update(70);
        ndv.update(60);
        assert_eq!(ndv.highest(), 70);

        ndv.reset();
        assert_eq!(ndv.highest(), 0);
        assert!(!ndv.update(65));
    }
}
