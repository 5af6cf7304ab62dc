//! Trace buffer management
//!
//! Handles record filtering, HDLC framing and the outgoing byte ring.

use crate::types::{RecordType, TimestampSource, TraceConfig};
use charger_core::{EventId, MachineId, StateId};
use heapless::Vec;

/// HDLC protocol constants
pub mod hdlc {
    /// HDLC flag byte (frame delimiter)
    pub const FLAG: u8 = 0x7E;
    /// HDLC escape byte
    pub const ESC: u8 = 0x7D;
    /// XOR mask for escaped bytes
    pub const ESC_XOR: u8 = 0x20;
}

/// Largest record payload in bytes
pub const MAX_PAYLOAD: usize = 48;

/// Worst case frame: every byte escaped, plus the closing flag
const MAX_FRAME: usize = 2 * (1 + 1 + 2 + MAX_PAYLOAD + 1) + 1;

/// Record payload under construction
pub type Payload = Vec<u8, MAX_PAYLOAD>;

/// Ring buffer of framed trace records
///
/// Frame layout (before byte stuffing): sequence, record type, 16-bit
/// little-endian timestamp, payload, checksum, then an unstuffed flag. The
/// checksum is the one's complement of the byte sum of everything between
/// the sequence and the payload end, both included. A frame that does not
/// fit into the free space is dropped whole.
pub struct TraceBuffer<const N: usize> {
    data: [u8; N],
    head: usize,
    tail: usize,
    used: usize,
    sequence: u8,
    config: TraceConfig,
    records: u16,
    ticks: u16,
    dropped: u32,
}

impl<const N: usize> TraceBuffer<N> {
    /// Create an empty buffer with every record enabled
    pub const fn new() -> Self {
        Self {
            data: [0; N],
            head: 0,
            tail: 0,
            used: 0,
            sequence: 0,
            config: TraceConfig::new(),
            records: 0,
            ticks: 0,
            dropped: 0,
        }
    }

    /// Reset the buffer and apply `config`
    pub fn init(&mut self, config: TraceConfig) {
        self.head = 0;
        self.tail = 0;
        self.used = 0;
        self.sequence = 0;
        self.config = config;
        self.records = 0;
        self.ticks = 0;
        self.dropped = 0;
    }

    /// Get configuration
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Enable or disable one record type
    pub fn set_filter(&mut self, record_type: RecordType, enable: bool) {
        if enable {
            self.config.filter |= record_type.bit();
        } else {
            self.config.filter &= !record_type.bit();
        }
    }

    /// Set filter mask directly
    pub fn set_filter_mask(&mut self, mask: u128) {
        self.config.filter = mask;
    }

    /// Check if a record type passes the filter
    pub fn enabled(&self, record_type: RecordType) -> bool {
        record_type.is_non_maskable() || self.config.filter & record_type.bit() != 0
    }

    /// Update the tick timestamp used by [`TimestampSource::Ticks`]
    pub fn set_time(&mut self, ticks: u32) {
        self.ticks = ticks as u16;
    }

    /// Frame and commit one record
    ///
    /// Returns `false` when the record is filtered out or dropped for lack of
    /// space.
    pub fn emit(&mut self, record_type: RecordType, payload: &[u8]) -> bool {
        if !self.enabled(record_type) {
            return false;
        }

        self.records = self.records.wrapping_add(1);
        let timestamp = match self.config.timestamp {
            _ if record_type.is_non_maskable() => 0,
            TimestampSource::RecordCounter => self.records,
            TimestampSource::Ticks => self.ticks,
        };

        let frame = self.frame(record_type, timestamp, payload);
        if N - self.used < frame.len() {
            self.dropped = self.dropped.wrapping_add(frame.len() as u32);
            return false;
        }
        for &byte in &frame {
            self.write_byte(byte);
        }
        self.sequence = self.sequence.wrapping_add(1);
        true
    }

    fn frame(&self, record_type: RecordType, timestamp: u16, payload: &[u8]) -> Vec<u8, MAX_FRAME> {
        let mut frame = Vec::new();
        let mut checksum: u8 = 0;

        let mut add_byte = |frame: &mut Vec<u8, MAX_FRAME>, byte: u8| {
            checksum = checksum.wrapping_add(byte);
            stuff(frame, byte);
        };

        add_byte(&mut frame, self.sequence);
        add_byte(&mut frame, record_type as u8);
        for byte in timestamp.to_le_bytes() {
            add_byte(&mut frame, byte);
        }
        for &byte in payload.iter().take(MAX_PAYLOAD) {
            add_byte(&mut frame, byte);
        }

        stuff(&mut frame, !checksum);
        // Flag is never stuffed
        let _ = frame.push(hdlc::FLAG);
        frame
    }

    fn write_byte(&mut self, byte: u8) {
        self.data[self.head] = byte;
        self.head = (self.head + 1) % N;
        self.used += 1;
    }

    /// Read available bytes from buffer
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() && self.used > 0 {
            buf[n] = self.data[self.tail];
            self.tail = (self.tail + 1) % N;
            self.used -= 1;
            n += 1;
        }
        n
    }

    /// Get number of bytes available to read
    pub fn available(&self) -> usize {
        self.used
    }

    /// Bytes lost to a full buffer since the last `init`
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    // Typed records

    /// A machine entered `to`
    pub fn state_entry(&mut self, machine: MachineId, from: StateId, to: StateId, event: EventId) -> bool {
        self.emit(
            RecordType::StateEntry,
            &[machine.raw(), from.raw(), to.raw(), event.raw()],
        )
    }

    /// An event matched no transition
    pub fn ignored(&mut self, machine: MachineId, state: StateId, event: EventId) -> bool {
        self.emit(RecordType::Ignored, &[machine.raw(), state.raw(), event.raw()])
    }

    /// A conversion was consumed by the main loop
    pub fn adc_reading(&mut self, channel: u8, value: u16) -> bool {
        let [lo, hi] = value.to_le_bytes();
        self.emit(RecordType::AdcReading, &[channel, lo, hi])
    }

    /// Conversions were overwritten before being consumed
    pub fn adc_overrun(&mut self, overruns: u32) -> bool {
        self.emit(RecordType::AdcOverrun, &overruns.to_le_bytes())
    }

    /// The application tick fired
    pub fn timer_expired(&mut self, charge_ticks: u32) -> bool {
        self.emit(RecordType::TimerExpired, &charge_ticks.to_le_bytes())
    }

    /// Negative-delta-V termination
    pub fn charged(&mut self, peak: u16, average: u16) -> bool {
        let [p0, p1] = peak.to_le_bytes();
        let [a0, a1] = average.to_le_bytes();
        self.emit(RecordType::Charged, &[p0, p1, a0, a1])
    }

    /// Charging stopped on timeout
    pub fn charge_timeout(&mut self, charge_ticks: u32) -> bool {
        self.emit(RecordType::ChargeTimeout, &charge_ticks.to_le_bytes())
    }

    /// Target description: version, target name, endianness, timestamp size
    ///
    /// Strings are zero-terminated and truncated to fit the payload.
    pub fn target_info(&mut self, version: &str, target: &str) -> bool {
        let mut payload = Payload::new();
        push_str(&mut payload, version);
        push_str(&mut payload, target);
        let endianness = if cfg!(target_endian = "little") { 0 } else { 1 };
        let _ = payload.push(endianness);
        let _ = payload.push(2);
        self.emit(RecordType::TargetInfo, &payload)
    }
}

impl<const N: usize> Default for TraceBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn stuff<const M: usize>(frame: &mut Vec<u8, M>, byte: u8) {
    if byte == hdlc::FLAG || byte == hdlc::ESC {
        let _ = frame.push(hdlc::ESC);
        let _ = frame.push(byte ^ hdlc::ESC_XOR);
    } else {
        let _ = frame.push(byte);
    }
}

fn push_str(payload: &mut Payload, value: &str) {
    // Leave room for the terminator and the two trailing bytes
    let room = MAX_PAYLOAD.saturating_sub(payload.len() + 3);
    for &byte in value.as_bytes().iter().take(room) {
        let _ = payload.push(byte);
    }
    let _ = payload.push(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::filters;

    /// Undo byte stuffing and split at flags
    fn frames(bytes: &[u8]) -> std::vec::Vec<std::vec::Vec<u8>> {
        let mut out = std::vec::Vec::new();
        let mut current = std::vec::Vec::new();
        let mut escaped = false;
        for &byte in bytes {
            if byte == hdlc::FLAG {
                out.push(core::mem::take(&mut current));
            } else if byte == hdlc::ESC {
                escaped = true;
            } else if escaped {
                current.push(byte ^ hdlc::ESC_XOR);
                escaped = false;
            } else {
                current.push(byte);
            }
        }
        out
    }

    fn drain<const N: usize>(buffer: &mut TraceBuffer<N>) -> std::vec::Vec<u8> {
        let mut bytes = std::vec![0u8; buffer.available()];
        let n = buffer.read(&mut bytes);
        bytes.truncate(n);
        bytes
    }

    #[test]
    fn frame_layout_and_checksum() {
        let mut buffer: TraceBuffer<128> = TraceBuffer::new();
        buffer.set_time(0x0102);
        assert!(buffer.adc_reading(1, 0x0203));

        let bytes = drain(&mut buffer);
        let decoded = frames(&bytes);
        assert_eq!(decoded.len(), 1);

        let frame = &decoded[0];
        assert_eq!(&frame[..7], &[0, RecordType::AdcReading as u8, 0x02, 0x01, 1, 0x03, 0x02]);
        let sum = frame[..frame.len() - 1]
            .iter()
            .fold(0u8, |acc, &b| acc.wrapping_add(b));
        assert_eq!(frame[frame.len() - 1], !sum);
    }

    #[test]
    fn flag_and_escape_bytes_are_stuffed() {
        let mut buffer: TraceBuffer<128> = TraceBuffer::new();
        assert!(buffer.charged(0x7E7D, 0x0000));

        let bytes = drain(&mut buffer);
        // Only the closing flag appears unescaped
        assert_eq!(bytes.iter().filter(|&&b| b == hdlc::FLAG).count(), 1);
        assert_eq!(*bytes.last().unwrap(), hdlc::FLAG);

        let frame = &frames(&bytes)[0];
        assert_eq!(&frame[4..6], &[0x7D, 0x7E]);
    }

    #[test]
    fn sequence_increments_per_frame() {
        let mut buffer: TraceBuffer<256> = TraceBuffer::new();
        buffer.timer_expired(1);
        buffer.timer_expired(2);
        buffer.timer_expired(3);

        let decoded = frames(&drain(&mut buffer));
        let sequences: std::vec::Vec<u8> = decoded.iter().map(|f| f[0]).collect();
        assert_eq!(sequences, std::vec![0, 1, 2]);
    }

    #[test]
    fn filter_blocks_masked_records() {
        let mut buffer: TraceBuffer<128> = TraceBuffer::new();
        buffer.set_filter_mask(filters::SM_RECORDS);

        assert!(!buffer.adc_overrun(1));
        assert!(buffer.ignored(MachineId::new(0), StateId(1), EventId(2)));
        buffer.set_filter(RecordType::Ignored, false);
        assert!(!buffer.ignored(MachineId::new(0), StateId(1), EventId(2)));
        assert_eq!(frames(&drain(&mut buffer)).len(), 1);
    }

    #[test]
    fn target_info_is_not_maskable() {
        let mut buffer: TraceBuffer<128> = TraceBuffer::new();
        buffer.set_filter_mask(0);
        buffer.set_time(500);

        assert!(buffer.target_info("0.1.0", "host"));
        let frame = &frames(&drain(&mut buffer))[0];
        assert_eq!(frame[1], RecordType::TargetInfo as u8);
        // No timestamp on target info
        assert_eq!(&frame[2..4], &[0, 0]);
        assert_eq!(&frame[4..10], b"0.1.0\0");
    }

    #[test]
    fn record_counter_timestamps() {
        let mut buffer: TraceBuffer<128> = TraceBuffer::new();
        buffer.init(TraceConfig {
            filter: filters::ALL_RECORDS,
            timestamp: TimestampSource::RecordCounter,
        });
        buffer.charge_timeout(9);
        buffer.charge_timeout(9);

        let decoded = frames(&drain(&mut buffer));
        assert_eq!(&decoded[0][2..4], &[1, 0]);
        assert_eq!(&decoded[1][2..4], &[2, 0]);
    }

    #[test]
    fn full_buffer_drops_whole_frames() {
        let mut buffer: TraceBuffer<16> = TraceBuffer::new();
        // 1 + 1 + 2 + 4 + 1 + flag = 10 bytes
        assert!(buffer.timer_expired(1));
        assert!(!buffer.timer_expired(2));
        assert_eq!(buffer.available(), 10);
        assert_eq!(buffer.dropped(), 10);

        let decoded = frames(&drain(&mut buffer));
        assert_eq!(decoded.len(), 1);
        assert!(buffer.timer_expired(3));
    }
}
