#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

//! # Charger Trace
//!
//! Software tracing for the charger firmware. Records are filtered by type,
//! framed with HDLC byte stuffing and queued in a fixed ring buffer until the
//! main loop drains them into the debug output.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use charger_trace::{init, state_entry, TraceConfig};
//! use charger_core::{EventId, MachineId, StateId};
//!
//! init(TraceConfig::default());
//! state_entry(MachineId::new(0), StateId(0), StateId(2), EventId(0));
//! ```

mod buffer;
mod types;

pub use buffer::{hdlc, TraceBuffer, MAX_PAYLOAD};
pub use types::{filters, RecordType, TimestampSource, TraceConfig};

use charger_core::{EventId, MachineId, StateId};
use charger_hal::debug::ByteSink;
use charger_hal::HalResult;
use core::cell::RefCell;
use critical_section::Mutex;

/// Size of the global trace ring in bytes
pub const TRACE_BUFFER_SIZE: usize = 512;

// Global trace buffer instance
static TRACE_BUF: Mutex<RefCell<TraceBuffer<TRACE_BUFFER_SIZE>>> =
    Mutex::new(RefCell::new(TraceBuffer::new()));

fn with_buffer<R>(f: impl FnOnce(&mut TraceBuffer<TRACE_BUFFER_SIZE>) -> R) -> R {
    critical_section::with(|cs| f(&mut TRACE_BUF.borrow_ref_mut(cs)))
}

/// Reset the tracer and apply `config`
pub fn init(config: TraceConfig) {
    with_buffer(|buf| buf.init(config));
}

/// Enable or disable one record type
pub fn set_filter(record_type: RecordType, enable: bool) {
    with_buffer(|buf| buf.set_filter(record_type, enable));
}

/// Current filter mask
pub fn filter_mask() -> u128 {
    with_buffer(|buf| buf.config().filter)
}

/// Update the tick timestamp
pub fn set_time(ticks: u32) {
    with_buffer(|buf| buf.set_time(ticks));
}

/// Trace entry into `to`
pub fn state_entry(machine: MachineId, from: StateId, to: StateId, event: EventId) -> bool {
    with_buffer(|buf| buf.state_entry(machine, from, to, event))
}

/// Trace an event that matched no transition
pub fn ignored(machine: MachineId, state: StateId, event: EventId) -> bool {
    with_buffer(|buf| buf.ignored(machine, state, event))
}

/// Trace a consumed conversion
pub fn adc_reading(channel: u8, value: u16) -> bool {
    with_buffer(|buf| buf.adc_reading(channel, value))
}

/// Trace the ADC overrun counter
pub fn adc_overrun(overruns: u32) -> bool {
    with_buffer(|buf| buf.adc_overrun(overruns))
}

/// Trace an application tick
pub fn timer_expired(charge_ticks: u32) -> bool {
    with_buffer(|buf| buf.timer_expired(charge_ticks))
}

/// Trace negative-delta-V termination
pub fn charged(peak: u16, average: u16) -> bool {
    with_buffer(|buf| buf.charged(peak, average))
}

/// Trace a charge timeout
pub fn charge_timeout(charge_ticks: u32) -> bool {
    with_buffer(|buf| buf.charge_timeout(charge_ticks))
}

/// Emit the target description record
pub fn target_info(target: &str) -> bool {
    with_buffer(|buf| buf.target_info(charger_core::VERSION, target))
}

/// Read trace data from buffer
/// Returns the number of bytes read
pub fn read(buf: &mut [u8]) -> usize {
    with_buffer(|trace| trace.read(buf))
}

/// Get number of bytes available to read
pub fn available() -> usize {
    with_buffer(|buf| buf.available())
}

/// Bytes dropped because the buffer was full
pub fn dropped() -> u32 {
    with_buffer(|buf| buf.dropped())
}

/// Move every queued byte into `sink`
///
/// Bytes are taken out of the ring in small chunks so interrupts stay
/// masked only briefly. Returns the number of bytes written.
pub fn drain<S: ByteSink>(sink: &mut S) -> HalResult<usize> {
    let mut chunk = [0u8; 16];
    let mut total = 0;
    loop {
        let n = read(&mut chunk);
        if n == 0 {
            return Ok(total);
        }
        sink.write_all(&chunk[..n])?;
        total += n;
    }
}
