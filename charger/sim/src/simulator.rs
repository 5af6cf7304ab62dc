//! ADC sequence simulator

use crate::script::Script;
use charger_adc::{AdcControlBlock, Reading};

/// Plays a script into an ADC control block, one reading per conversion
///
/// Deliveries go through the same path as the ADC interrupt: value, then
/// completion flag, then busy cleared. Once the script is exhausted the
/// simulator reports `None` and delivers nothing.
#[derive(Debug, Clone)]
pub struct AdcSimulator {
    values: Vec<Reading>,
    position: usize,
}

impl AdcSimulator {
    pub fn new(script: &Script) -> Self {
        Self {
            values: script.values().collect(),
            position: 0,
        }
    }

    /// Next scripted reading, advancing the cursor
    pub fn next_value(&mut self) -> Option<Reading> {
        let value = self.values.get(self.position).copied()?;
        self.position += 1;
        Some(value)
    }

    /// Complete the running conversion on `block` with the next reading
    pub fn deliver(&mut self, block: &AdcControlBlock) -> Option<Reading> {
        let value = self.next_value()?;
        block.deliver(value);
        Some(value)
    }

    /// Readings delivered so far
    pub fn delivered(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.values.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Rewind to the first reading
    pub fn rewind(&mut self) {
        self.position = 0;
    }
}
