//! Bounded moving average

use crate::Reading;
use heapless::HistoryBuffer;

/// Moving average over the last `N` samples
///
/// Until the window first fills, the mean is taken over the samples stored so
/// far. Division truncates. An empty window averages to 0.
pub struct Averager<const N: usize> {
    samples: HistoryBuffer<Reading, N>,
}

impl<const N: usize> Averager<N> {
    /// Create an empty window
    pub const fn new() -> Self {
        Self {
            samples: HistoryBuffer::new(),
        }
    }

    /// Append a sample, evicting the oldest once the window is full
    pub fn push(&mut self, sample: Reading) {
        self.samples.write(sample);
    }

    /// Mean of the samples currently held
    pub fn average(&self) -> Reading {
        let count = self.samples.len();
        if count == 0 {
            return 0;
        }
        let sum: u32 = self.samples.iter().map(|&s| u32::from(s)).sum();
        (sum / count as u32) as Reading
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if no sample has been pushed since the last reset
    pub fn is_empty(&self) -> bool {
        self.samples.len() == 0
    }

    /// Check if the window has filled
    pub fn is_full(&self) -> bool {
        self.samples.len() == N
    }

    /// Window size
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop every sample
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Samples from oldest to newest
    pub fn samples(&self) -> impl Iterator<Item = &Reading> + '_ {
        self.samples.oldest_ordered()
    }
}

impl<const N: usize> Default for Averager<N> {
    fn default() -> Self {
        Self::new()
    }
}
