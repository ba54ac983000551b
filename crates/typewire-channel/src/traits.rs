use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::config::DEFAULT_MAX_READ_LEN;
use crate::error::{ChannelError, Result};

/// Read side of a byte channel.
///
/// Only [`read`](Decoder::read) is required; the fixed-width accessors are
/// derived from it. Every multi-byte integer is little-endian, signed values
/// are two's complement.
pub trait Decoder {
    /// Read exactly `n` bytes.
    ///
    /// Fails with [`ChannelError::Truncated`] if the source ends first.
    fn read(&mut self, n: usize) -> Result<Bytes>;

    /// Upper bound on a single read, also applied to element counts.
    fn read_limit(&self) -> usize {
        DEFAULT_MAX_READ_LEN
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?.get_u8())
    }

    fn read_s8(&mut self) -> Result<i8> {
        Ok(self.read(1)?.get_i8())
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(self.read(2)?.get_u16_le())
    }

    /// Reads the unsigned pattern and sign-extends it.
    fn read_s16(&mut self) -> Result<i16> {
        let raw = i32::from(self.read_u16()?);
        let value = if raw & 0x8000 != 0 { raw - 0x1_0000 } else { raw };
        Ok(value as i16)
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(self.read(4)?.get_u32_le())
    }

    /// Reads the unsigned pattern and sign-extends it.
    fn read_s32(&mut self) -> Result<i32> {
        let raw = i64::from(self.read_u32()?);
        let value = if raw & 0x8000_0000 != 0 {
            raw - 0x1_0000_0000
        } else {
            raw
        };
        Ok(value as i32)
    }

    fn read_f64(&mut self) -> Result<f64> {
        Ok(self.read(8)?.get_f64_le())
    }
}

/// Write side of a byte channel.
pub trait Encoder {
    /// Append `bytes` to the output.
    fn write(&mut self, bytes: &[u8]);

    fn write_u8(&mut self, value: u8) {
        self.write(&[value]);
    }

    fn write_s8(&mut self, value: i8) {
        self.write(&value.to_le_bytes());
    }

    fn write_u16(&mut self, value: u16) {
        self.write(&value.to_le_bytes());
    }

    fn write_s16(&mut self, value: i16) {
        self.write(&value.to_le_bytes());
    }

    fn write_u32(&mut self, value: u32) {
        self.write(&value.to_le_bytes());
    }

    fn write_s32(&mut self, value: i32) {
        self.write(&value.to_le_bytes());
    }

    fn write_f64(&mut self, value: f64) {
        self.write(&value.to_le_bytes());
    }
}

/// Decoding straight out of an in-memory buffer.
impl Decoder for Bytes {
    fn read(&mut self, n: usize) -> Result<Bytes> {
        if self.len() < n {
            return Err(ChannelError::Truncated {
                expected: n,
                received: self.len(),
            });
        }
        Ok(self.split_to(n))
    }
}

/// Encoding straight into an in-memory buffer, no flush involved.
impl Encoder for BytesMut {
    fn write(&mut self, bytes: &[u8]) {
        self.put_slice(bytes);
    }
}
