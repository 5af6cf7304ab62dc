//! Byte-stream debug output abstraction
//!
//! On the reference board this is a transmit-only bit-banged serial line.

use crate::error::{HalError, HalResult};

/// Transmit-only byte sink
pub trait ByteSink {
    /// Queue one byte; `WouldBlock` while the transmitter is busy
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), HalError>;

    /// Write all bytes, blocking until each has been accepted
    fn write_all(&mut self, bytes: &[u8]) -> HalResult<()> {
        for &byte in bytes {
            nb::block!(self.write_byte(byte))?;
        }
        Ok(())
    }
}
