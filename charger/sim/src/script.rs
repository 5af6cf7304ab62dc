//! Scripted ADC value sequences

use charger_adc::Reading;

/// One run of scripted readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// `count` repetitions of `value`
    Constant { value: Reading, count: usize },
    /// `count` readings starting at `start`, each `step` apart
    Ramp { start: Reading, step: i32, count: usize },
}

impl Segment {
    /// Number of readings in the segment
    pub const fn len(&self) -> usize {
        match self {
            Segment::Constant { count, .. } | Segment::Ramp { count, .. } => *count,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reading at `index`, clamped to the reading range
    fn at(&self, index: usize) -> Reading {
        match *self {
            Segment::Constant { value, .. } => value,
            Segment::Ramp { start, step, .. } => {
                let value = i64::from(start) + i64::from(step) * index as i64;
                value.clamp(0, i64::from(Reading::MAX)) as Reading
            }
        }
    }
}

/// Ordered concatenation of segments
///
/// A script is pure data: replaying it always yields the same readings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    segments: Vec<Segment>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` repetitions of `value`
    pub fn constant(mut self, value: Reading, count: usize) -> Self {
        self.segments.push(Segment::Constant { value, count });
        self
    }

    /// Append a linear run starting at `start`, moving by `step` per reading
    pub fn ramp(mut self, start: Reading, step: i32, count: usize) -> Self {
        self.segments.push(Segment::Ramp { start, step, count });
        self
    }

    /// Rise from `base` by `step` for `rise` readings, then fall by `step`
    /// for `fall` readings
    ///
    /// The first reading is `base + step`.
    pub fn sawtooth(self, base: Reading, step: u16, rise: usize, fall: usize) -> Self {
        let step = i32::from(step);
        let clamp = |v: i64| v.clamp(0, i64::from(Reading::MAX)) as Reading;
        let peak = i64::from(base) + i64::from(step) * rise as i64;
        self.ramp(clamp(i64::from(base) + i64::from(step)), step, rise)
            .ramp(clamp(peak - i64::from(step)), -step, fall)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total number of readings
    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every reading in order
    pub fn values(&self) -> impl Iterator<Item = Reading> + '_ {
        self.segments
            .iter()
            .flat_map(|segment| (0..segment.len()).map(move |i| segment.at(i)))
    }
}
