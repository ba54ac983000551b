use std::hash::Hash;

use indexmap::IndexMap;
use typewire_channel::{Decoder, Encoder};

use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::primitive::{length_prefix, read_count};

/// Cap on capacity reserved from a wire count before any element is read.
pub(crate) const PREALLOCATE_LIMIT: usize = 1024;

/// Homogeneous ordered sequence: `u32` count, then each element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sequence<D> {
    element: D,
}

impl<D: Descriptor> Sequence<D> {
    pub fn new(element: D) -> Self {
        Self { element }
    }

    /// The element descriptor.
    pub fn element(&self) -> &D {
        &self.element
    }
}

impl<D: Descriptor> Descriptor for Sequence<D> {
    type Value = Vec<D::Value>;

    fn read(&self, src: &mut dyn Decoder) -> Result<Self::Value> {
        let count = read_count(src)?;
        let mut values = Vec::with_capacity(count.min(PREALLOCATE_LIMIT));
        for _ in 0..count {
            values.push(self.element.read(src)?);
        }
        Ok(values)
    }

    fn write(&self, dst: &mut dyn Encoder, value: &Self::Value) -> Result<()> {
        dst.write_u32(length_prefix(value.len())?);
        for element in value {
            self.element.write(dst, element)?;
        }
        Ok(())
    }
}

/// Associative mapping: `u32` count, then (key, value) pairs.
///
/// Decoded mappings are [`IndexMap`]s, so entries keep wire order and a
/// repeated key keeps the value written last. Encoding an `IndexMap` writes
/// entries in its insertion order; use [`write_entries`](Mapping::write_entries)
/// to control the exact sequence of pairs on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mapping<K, V> {
    key: K,
    value: V,
}

impl<K: Descriptor, V: Descriptor> Mapping<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// The key descriptor.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The value descriptor.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Write an explicit list of pairs, duplicates included.
    pub fn write_entries(
        &self,
        dst: &mut dyn Encoder,
        entries: &[(K::Value, V::Value)],
    ) -> Result<()> {
        dst.write_u32(length_prefix(entries.len())?);
        for (key, value) in entries {
            self.key.write(dst, key)?;
            self.value.write(dst, value)?;
        }
        Ok(())
    }
}

impl<K, V> Descriptor for Mapping<K, V>
where
    K: Descriptor,
    K::Value: Hash + Eq,
    V: Descriptor,
{
    type Value = IndexMap<K::Value, V::Value>;

    fn read(&self, src: &mut dyn Decoder) -> Result<Self::Value> {
        let count = read_count(src)?;
        let mut entries = IndexMap::with_capacity(count.min(PREALLOCATE_LIMIT));
        for _ in 0..count {
            let key = self.key.read(src)?;
            let value = self.value.read(src)?;
            entries.insert(key, value);
        }
        Ok(entries)
    }

    fn write(&self, dst: &mut dyn Encoder, value: &Self::Value) -> Result<()> {
        dst.write_u32(length_prefix(value.len())?);
        for (key, item) in value {
            self.key.write(dst, key)?;
            self.value.write(dst, item)?;
        }
        Ok(())
    }
}
