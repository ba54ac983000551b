use bytes::Bytes;
use typewire_channel::{ChannelError, Decoder, Encoder};

use crate::descriptor::Descriptor;
use crate::error::{DescriptorError, Result};

/// Integer width on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    One,
    Two,
    Four,
}

impl Width {
    /// Width in bytes.
    pub fn bytes(self) -> u8 {
        match self {
            Width::One => 1,
            Width::Two => 2,
            Width::Four => 4,
        }
    }

    /// Returns `None` for anything but 1, 2 or 4.
    pub fn from_bytes(bytes: u8) -> Option<Self> {
        match bytes {
            1 => Some(Width::One),
            2 => Some(Width::Two),
            4 => Some(Width::Four),
            _ => None,
        }
    }
}

/// Fixed-width little-endian integer, signed or unsigned.
///
/// Values are carried as `i64`, which holds every supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
    signed: bool,
    width: Width,
}

impl Integer {
    pub const U8: Integer = Integer::new(false, Width::One);
    pub const S8: Integer = Integer::new(true, Width::One);
    pub const U16: Integer = Integer::new(false, Width::Two);
    pub const S16: Integer = Integer::new(true, Width::Two);
    pub const U32: Integer = Integer::new(false, Width::Four);
    pub const S32: Integer = Integer::new(true, Width::Four);

    pub const fn new(signed: bool, width: Width) -> Self {
        Self { signed, width }
    }

    /// Build from a runtime (signedness, byte width) pair.
    ///
    /// Widths other than 1, 2 and 4 are a configuration error.
    pub fn from_config(signed: bool, bytes: u8) -> Result<Self> {
        let width = Width::from_bytes(bytes).ok_or(DescriptorError::UnsupportedWidth(bytes))?;
        Ok(Self::new(signed, width))
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn width(&self) -> Width {
        self.width
    }

    /// Short type name, e.g. `s32`.
    pub fn label(&self) -> &'static str {
        match (self.signed, self.width) {
            (false, Width::One) => "u8",
            (true, Width::One) => "s8",
            (false, Width::Two) => "u16",
            (true, Width::Two) => "s16",
            (false, Width::Four) => "u32",
            (true, Width::Four) => "s32",
        }
    }

    /// Smallest encodable value.
    pub fn min(&self) -> i64 {
        if self.signed {
            -(1i64 << (u32::from(self.width.bytes()) * 8 - 1))
        } else {
            0
        }
    }

    /// Largest encodable value.
    pub fn max(&self) -> i64 {
        let bits = u32::from(self.width.bytes()) * 8;
        if self.signed {
            (1i64 << (bits - 1)) - 1
        } else {
            (1i64 << bits) - 1
        }
    }
}

impl Descriptor for Integer {
    type Value = i64;

    fn read(&self, src: &mut dyn Decoder) -> Result<i64> {
        let value = match (self.signed, self.width) {
            (false, Width::One) => i64::from(src.read_u8()?),
            (true, Width::One) => i64::from(src.read_s8()?),
            (false, Width::Two) => i64::from(src.read_u16()?),
            (true, Width::Two) => i64::from(src.read_s16()?),
            (false, Width::Four) => i64::from(src.read_u32()?),
            (true, Width::Four) => i64::from(src.read_s32()?),
        };
        Ok(value)
    }

    fn write(&self, dst: &mut dyn Encoder, value: &i64) -> Result<()> {
        let value = *value;
        if value < self.min() || value > self.max() {
            return Err(DescriptorError::IntegerOutOfRange {
                value,
                kind: self.label(),
            });
        }
        // range checked above, the casts are lossless
        match (self.signed, self.width) {
            (false, Width::One) => dst.write_u8(value as u8),
            (true, Width::One) => dst.write_s8(value as i8),
            (false, Width::Two) => dst.write_u16(value as u16),
            (true, Width::Two) => dst.write_s16(value as i16),
            (false, Width::Four) => dst.write_u32(value as u32),
            (true, Width::Four) => dst.write_s32(value as i32),
        }
        Ok(())
    }
}

/// 8-byte IEEE-754 double, no prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Float;

impl Descriptor for Float {
    type Value = f64;

    fn read(&self, src: &mut dyn Decoder) -> Result<f64> {
        Ok(src.read_f64()?)
    }

    fn write(&self, dst: &mut dyn Encoder, value: &f64) -> Result<()> {
        dst.write_f64(*value);
        Ok(())
    }
}

/// Opaque byte string behind a `u32` length prefix.
///
/// No charset is implied; embedded zero bytes are ordinary content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ByteString;

impl Descriptor for ByteString {
    type Value = Bytes;

    fn read(&self, src: &mut dyn Decoder) -> Result<Bytes> {
        let len = src.read_u32()? as usize;
        Ok(src.read(len)?)
    }

    fn write(&self, dst: &mut dyn Encoder, value: &Bytes) -> Result<()> {
        dst.write_u32(length_prefix(value.len())?);
        dst.write(value);
        Ok(())
    }
}

/// Single byte, `0` or `1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bool;

impl Descriptor for Bool {
    type Value = bool;

    fn read(&self, src: &mut dyn Decoder) -> Result<bool> {
        match src.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DescriptorError::InvalidBool(other)),
        }
    }

    fn write(&self, dst: &mut dyn Encoder, value: &bool) -> Result<()> {
        dst.write_u8(u8::from(*value));
        Ok(())
    }
}

/// Single raw byte, any value allowed.
///
/// Carries C-style `char` fields; no charset is implied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Char;

impl Descriptor for Char {
    type Value = u8;

    fn read(&self, src: &mut dyn Decoder) -> Result<u8> {
        Ok(src.read_u8()?)
    }

    fn write(&self, dst: &mut dyn Encoder, value: &u8) -> Result<()> {
        dst.write_u8(*value);
        Ok(())
    }
}

/// Convert a length or count into its `u32` wire prefix.
pub(crate) fn length_prefix(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| DescriptorError::LengthOverflow { len })
}

/// Read a `u32` element count.
///
/// Counts above the decoder's read limit are refused before any element is
/// read, since elements that encode to nothing would never run out of input.
pub(crate) fn read_count(src: &mut dyn Decoder) -> Result<usize> {
    let count = src.read_u32()? as usize;
    let limit = src.read_limit();
    if count > limit {
        return Err(ChannelError::ReadTooLarge {
            size: count,
            max: limit,
        }
        .into());
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{decode_from_bytes, encode_to_bytes};

    fn round_trip<D>(descriptor: &D, value: D::Value) -> Bytes
    where
        D: Descriptor,
        D::Value: PartialEq + std::fmt::Debug,
    {
        let wire = encode_to_bytes(descriptor, &value).expect("encoding must work");
        let back = decode_from_bytes(descriptor, wire.clone()).expect("decoding must work");
        assert_eq!(back, value);
        wire
    }

    #[test]
    fn signed_boundaries_round_trip() {
        for value in [-1, -128, 127, 0] {
            round_trip(&Integer::S8, value);
        }
        for value in [-1, -32768, 32767] {
            round_trip(&Integer::S16, value);
        }
        for value in [-1, -2_147_483_648, 2_147_483_647] {
            round_trip(&Integer::S32, value);
        }
    }

    #[test]
    fn unsigned_extremes_round_trip() {
        assert_eq!(round_trip(&Integer::U8, 255).as_ref(), &[0xFF]);
        assert_eq!(round_trip(&Integer::U16, 65535).as_ref(), &[0xFF, 0xFF]);
        assert_eq!(
            round_trip(&Integer::U32, 4_294_967_295).as_ref(),
            &[0xFF, 0xFF, 0xFF, 0xFF]
        );
        for descriptor in [Integer::U8, Integer::U16, Integer::U32] {
            round_trip(&descriptor, 0);
        }
    }

    #[test]
    fn negative_s32_layout() {
        assert_eq!(
            round_trip(&Integer::S32, -5).as_ref(),
            &[0xFB, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn out_of_range_rejected() {
        let err = encode_to_bytes(&Integer::U8, &256).unwrap_err();
        assert!(matches!(
            err,
            DescriptorError::IntegerOutOfRange {
                value: 256,
                kind: "u8"
            }
        ));
        assert!(encode_to_bytes(&Integer::S16, &-32769).is_err());
        assert!(encode_to_bytes(&Integer::U32, &-1).is_err());
        assert!(encode_to_bytes(&Integer::S32, &(1i64 << 31)).is_err());
    }

    #[test]
    fn unsupported_width_is_construction_error() {
        assert!(matches!(
            Integer::from_config(true, 3),
            Err(DescriptorError::UnsupportedWidth(3))
        ));
        assert!(matches!(
            Integer::from_config(false, 8),
            Err(DescriptorError::UnsupportedWidth(8))
        ));
        assert_eq!(Integer::from_config(true, 2).unwrap(), Integer::S16);
    }

    #[test]
    fn limits_match_width() {
        assert_eq!((Integer::S8.min(), Integer::S8.max()), (-128, 127));
        assert_eq!((Integer::U16.min(), Integer::U16.max()), (0, 65535));
        assert_eq!(Integer::S32.min(), i64::from(i32::MIN));
        assert_eq!(Integer::U32.max(), i64::from(u32::MAX));
    }

    #[test]
    fn float_is_bit_exact() {
        round_trip(&Float, 3.5);
        round_trip(&Float, f64::MAX);
        round_trip(&Float, -0.0);
        let wire = encode_to_bytes(&Float, &f64::NAN).unwrap();
        let back = decode_from_bytes(&Float, wire).unwrap();
        assert_eq!(back.to_bits(), f64::NAN.to_bits());
    }

    #[test]
    fn empty_string_round_trips() {
        let wire = round_trip(&ByteString, Bytes::new());
        assert_eq!(wire.as_ref(), &[0, 0, 0, 0]);
    }

    #[test]
    fn embedded_zero_bytes_kept() {
        let value = Bytes::from_static(b"a\0b\0\0");
        let wire = round_trip(&ByteString, value);
        assert_eq!(wire.len(), 4 + 5);
        assert_eq!(&wire[..4], &[5, 0, 0, 0]);
    }

    #[test]
    fn string_length_past_input_is_truncated() {
        let wire = Bytes::from_static(&[10, 0, 0, 0, b'h', b'i']);
        assert!(matches!(
            decode_from_bytes(&ByteString, wire),
            Err(DescriptorError::Channel(_))
        ));
    }

    #[test]
    fn bool_encoding() {
        assert_eq!(round_trip(&Bool, true).as_ref(), &[1]);
        assert_eq!(round_trip(&Bool, false).as_ref(), &[0]);
        assert!(matches!(
            decode_from_bytes(&Bool, Bytes::from_static(&[2])),
            Err(DescriptorError::InvalidBool(2))
        ));
    }

    #[test]
    fn char_is_one_raw_byte() {
        assert_eq!(round_trip(&Char, b'a').as_ref(), &[0x61]);
        assert_eq!(round_trip(&Char, 0xFF).as_ref(), &[0xFF]);
        assert_eq!(round_trip(&Char, 0).as_ref(), &[0x00]);
    }
}
