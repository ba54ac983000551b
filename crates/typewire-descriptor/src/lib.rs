//! Composable type descriptors for typewire payloads.
//!
//! A descriptor knows how to read one kind of value from a [`Decoder`] and
//! write it to an [`Encoder`]. Primitive descriptors cover 1/2/4-byte
//! integers, doubles, booleans, single-byte chars and length-prefixed byte
//! strings. Composite
//! descriptors (sequences, mappings, records) hold their component
//! descriptors and delegate to them recursively.
//!
//! The wire carries no type tags. Encoder and decoder must build the same
//! descriptor tree; a record with reordered fields decodes into garbage
//! rather than an error.
//!
//! [`Decoder`]: typewire_channel::Decoder
//! [`Encoder`]: typewire_channel::Encoder

pub mod composite;
pub mod descriptor;
pub mod dynamic;
pub mod error;
pub mod primitive;
pub mod record;
pub mod schema;

pub use composite::{Mapping, Sequence};
pub use descriptor::{decode_from_bytes, encode_to_bytes, Descriptor};
pub use dynamic::{DynamicType, LayoutEntry, Value};
pub use error::{DescriptorError, Result};
pub use primitive::{Bool, ByteString, Char, Float, Integer, Width};
pub use record::{Record, RecordBuilder};
pub use schema::{FieldSchema, TypeSchema};
