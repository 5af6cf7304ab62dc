//! Tick timer configuration records

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Periodic countdown timer shared between the tick interrupt and its owner
///
/// A timer with reload `0` never expires.
#[derive(Debug)]
pub struct TickTimerConfig {
    reload: AtomicU32,
    countdown: AtomicU32,
    active: AtomicBool,
    expired: AtomicBool,
}

impl TickTimerConfig {
    /// Create an inactive timer expiring every `reload` ticks
    pub const fn new(reload: u32) -> Self {
        Self {
            reload: AtomicU32::new(reload),
            countdown: AtomicU32::new(reload),
            active: AtomicBool::new(false),
            expired: AtomicBool::new(false),
        }
    }

    /// Change the period and restart the countdown
    pub fn set_reload(&self, reload: u32) {
        critical_section::with(|_| {
            self.reload.store(reload, Ordering::Relaxed);
            self.countdown.store(reload, Ordering::Relaxed);
        });
    }

    /// Configured period in ticks
    pub fn reload(&self) -> u32 {
        self.reload.load(Ordering::Relaxed)
    }

    /// Start or stop the timer
    ///
    /// Starting restarts the countdown from the reload value and discards a
    /// stale expiry.
    pub fn set_active(&self, active: bool) {
        critical_section::with(|_| {
            if active && !self.active.load(Ordering::Relaxed) {
                let reload = self.reload.load(Ordering::Relaxed);
                self.countdown.store(reload, Ordering::Relaxed);
                self.expired.store(false, Ordering::Relaxed);
            }
            self.active.store(active, Ordering::Release);
        });
    }

    /// Check whether the timer counts down
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Ticks left until the next expiry
    pub fn countdown(&self) -> u32 {
        self.countdown.load(Ordering::Relaxed)
    }

    /// Read and clear the expired flag
    ///
    /// Runs inside a critical section so the tick interrupt cannot set the
    /// flag between the read and the clear: an expiry is reported exactly
    /// once.
    pub fn test_and_clear(&self) -> bool {
        critical_section::with(|_| {
            let expired = self.expired.load(Ordering::Acquire);
            if expired {
                self.expired.store(false, Ordering::Relaxed);
            }
            expired
        })
    }

    /// Interrupt side: advance the countdown by one tick
    pub(crate) fn on_tick(&self) {
        if !self.active.load(Ordering::Acquire) {
            return;
        }
        let reload = self.reload.load(Ordering::Relaxed);
        if reload == 0 {
            return;
        }

        let remaining = self.countdown.load(Ordering::Relaxed);
        if remaining <= 1 {
            self.countdown.store(reload, Ordering::Relaxed);
            self.expired.store(true, Ordering::Release);
        } else {
            self.countdown.store(remaining - 1, Ordering::Relaxed);
        }
    }
}
