//! Tick scheduler: the set of timers decremented by the tick interrupt

use crate::timer::TickTimerConfig;
use charger_core::{CoreError, CoreResult};
use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};
use critical_section::Mutex;
use heapless::Vec;

/// Scheduler holding up to `N` registered timers
///
/// Intended to live in a `static` shared by the tick interrupt handler and
/// the main loop.
pub struct TickScheduler<const N: usize> {
    timers: Mutex<RefCell<Vec<&'static TickTimerConfig, N>>>,
    ticks: AtomicU32,
}

impl<const N: usize> TickScheduler<N> {
    /// Create a scheduler with no timers
    pub const fn new() -> Self {
        Self {
            timers: Mutex::new(RefCell::new(Vec::new())),
            ticks: AtomicU32::new(0),
        }
    }

    /// Register a timer with the decrement set
    ///
    /// Registering the same timer twice is a no-op. Fails when all `N` slots
    /// are taken.
    pub fn add_timer_config(&self, timer: &'static TickTimerConfig) -> CoreResult<()> {
        critical_section::with(|cs| {
            let mut timers = self.timers.borrow_ref_mut(cs);
            if timers.iter().any(|t| core::ptr::eq(*t, timer)) {
                return Ok(());
            }
            timers
                .push(timer)
                .map_err(|_| CoreError::TimerRegistryFull { capacity: N })
        })
    }

    /// Tick interrupt entry point
    ///
    /// Decrements every active timer, sets expired flags and reloads
    /// countdowns.
    pub fn on_tick(&self) {
        critical_section::with(|cs| {
            for timer in self.timers.borrow_ref(cs).iter() {
                timer.on_tick();
            }
            let now = self.ticks.load(Ordering::Relaxed);
            self.ticks.store(now.wrapping_add(1), Ordering::Relaxed);
        });
    }

    /// Run `count` ticks back to back
    ///
    /// Stands in for the hardware time base in harnesses and tests.
    pub fn kick(&self, count: u32) {
        for _ in 0..count {
            self.on_tick();
        }
    }

    /// Ticks seen since startup, wrapping
    pub fn now(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Number of registered timers
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.timers.borrow_ref(cs).len())
    }

    /// Check if no timer is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of timers
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for TickScheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}
