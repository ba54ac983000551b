use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tracing::debug;
use typewire_channel::{Decoder, Encoder};

use crate::error::{DescriptorError, Result};

/// A codec for one kind of value.
///
/// Descriptors hold configuration only. They can be built once, shared
/// across threads and reused for any number of reads and writes; all
/// per-call state lives in the channel.
pub trait Descriptor {
    /// The value this descriptor transcodes.
    type Value;

    /// Decode one value.
    fn read(&self, src: &mut dyn Decoder) -> Result<Self::Value>;

    /// Encode one value.
    fn write(&self, dst: &mut dyn Encoder, value: &Self::Value) -> Result<()>;
}

impl<D: Descriptor + ?Sized> Descriptor for &D {
    type Value = D::Value;

    fn read(&self, src: &mut dyn Decoder) -> Result<Self::Value> {
        (**self).read(src)
    }

    fn write(&self, dst: &mut dyn Encoder, value: &Self::Value) -> Result<()> {
        (**self).write(dst, value)
    }
}

impl<D: Descriptor + ?Sized> Descriptor for Box<D> {
    type Value = D::Value;

    fn read(&self, src: &mut dyn Decoder) -> Result<Self::Value> {
        (**self).read(src)
    }

    fn write(&self, dst: &mut dyn Encoder, value: &Self::Value) -> Result<()> {
        (**self).write(dst, value)
    }
}

impl<D: Descriptor + ?Sized> Descriptor for Arc<D> {
    type Value = D::Value;

    fn read(&self, src: &mut dyn Decoder) -> Result<Self::Value> {
        (**self).read(src)
    }

    fn write(&self, dst: &mut dyn Encoder, value: &Self::Value) -> Result<()> {
        (**self).write(dst, value)
    }
}

/// Encode `value` into a fresh buffer.
pub fn encode_to_bytes<D: Descriptor + ?Sized>(descriptor: &D, value: &D::Value) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    descriptor.write(&mut buf, value)?;
    Ok(buf.freeze())
}

/// Decode exactly one value from `bytes`.
///
/// Unlike reading from a channel, leftover input is an error here since the
/// buffer is supposed to hold a single top-level value.
pub fn decode_from_bytes<D: Descriptor + ?Sized>(descriptor: &D, bytes: Bytes) -> Result<D::Value> {
    let mut src = bytes;
    let value = descriptor.read(&mut src)?;
    if !src.is_empty() {
        debug!(trailing = src.len(), "input continues past decoded value");
        return Err(DescriptorError::TrailingBytes(src.len()));
    }
    Ok(value)
}
