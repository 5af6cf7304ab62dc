//! Interrupt masking abstraction

/// Global interrupt enable, the equivalent of `sei`/`cli`
pub trait InterruptControl {
    /// Enable interrupts globally
    fn enable_global(&mut self);

    /// Disable interrupts globally
    fn disable_global(&mut self);
}
