//! Descriptor trees built at runtime from a [`TypeSchema`](crate::TypeSchema).
//!
//! Generated stubs bind records to concrete Rust types with
//! [`Record`](crate::Record). Tools that only have a schema document at hand
//! use [`DynamicType`] instead, which transcodes the schema-agnostic
//! [`Value`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use bytes::{Bytes, BytesMut};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value as Json};
use tracing::trace;
use typewire_channel::{Decoder, Encoder};

use crate::composite::{Sequence, PREALLOCATE_LIMIT};
use crate::descriptor::Descriptor;
use crate::error::{DescriptorError, Result};
use crate::primitive::{length_prefix, read_count, Bool, ByteString, Char, Float, Integer};

/// A decoded value of any descriptor shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bytes(Bytes),
    Bool(bool),
    Char(u8),
    Sequence(Vec<Value>),
    /// Entries in wire order.
    Mapping(Vec<(Value, Value)>),
    /// Fields keyed by name, in declared order.
    Record(IndexMap<String, Value>),
}

impl Value {
    /// Name of the value's shape.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bytes(_) => "string",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Record(_) => "record",
        }
    }
}

/// Runtime descriptor tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicType {
    Int(Integer),
    Float(Float),
    String(ByteString),
    Bool(Bool),
    Char(Char),
    Sequence(Sequence<Box<DynamicType>>),
    Mapping {
        key: Box<DynamicType>,
        value: Box<DynamicType>,
    },
    Record {
        name: String,
        fields: Vec<(String, DynamicType)>,
    },
}

/// One row of [`DynamicType::layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    /// Location in the tree: `$`, `$.field`, `$[]`, `${key}`, `${value}`.
    pub path: String,
    /// Type label, e.g. `s32` or `sequence<u16>`.
    pub ty: String,
    /// How the value is laid out on the wire.
    pub encoding: &'static str,
}

impl DynamicType {
    /// Name of the descriptor's shape, matching [`Value::kind`].
    pub fn kind(&self) -> &'static str {
        match self {
            DynamicType::Int(_) => "int",
            DynamicType::Float(_) => "float",
            DynamicType::String(_) => "string",
            DynamicType::Bool(_) => "bool",
            DynamicType::Char(_) => "char",
            DynamicType::Sequence(_) => "sequence",
            DynamicType::Mapping { .. } => "mapping",
            DynamicType::Record { .. } => "record",
        }
    }

    /// Flatten the tree into one row per node, depth first.
    pub fn layout(&self) -> Vec<LayoutEntry> {
        let mut rows = Vec::new();
        self.collect_layout("$", &mut rows);
        rows
    }

    fn collect_layout(&self, path: &str, rows: &mut Vec<LayoutEntry>) {
        let encoding = match self {
            DynamicType::Int(_) => "fixed width, little-endian",
            DynamicType::Float(_) => "8 bytes IEEE-754, little-endian",
            DynamicType::String(_) => "u32 length + raw bytes",
            DynamicType::Bool(_) => "1 byte, 0 or 1",
            DynamicType::Char(_) => "1 raw byte",
            DynamicType::Sequence(_) => "u32 count + elements",
            DynamicType::Mapping { .. } => "u32 count + (key, value) pairs",
            DynamicType::Record { .. } => "fields in declared order",
        };
        rows.push(LayoutEntry {
            path: path.to_string(),
            ty: self.to_string(),
            encoding,
        });

        match self {
            DynamicType::Sequence(sequence) => {
                sequence.element().collect_layout(&format!("{path}[]"), rows);
            }
            DynamicType::Mapping { key, value } => {
                key.collect_layout(&format!("{path}{{key}}"), rows);
                value.collect_layout(&format!("{path}{{value}}"), rows);
            }
            DynamicType::Record { fields, .. } => {
                for (name, ty) in fields {
                    ty.collect_layout(&format!("{path}.{name}"), rows);
                }
            }
            _ => {}
        }
    }

    /// Convert JSON into a value shaped like this descriptor.
    ///
    /// Strings accept JSON strings (UTF-8 bytes) or arrays of byte values.
    /// Mappings accept objects or arrays of `[key, value]` pairs; object keys
    /// are parsed as integers when the key type is an integer.
    pub fn value_from_json(&self, json: &Json) -> Result<Value> {
        self.parse_json_at(json, "$")
    }

    fn parse_json_at(&self, json: &Json, path: &str) -> Result<Value> {
        match self {
            DynamicType::Int(_) => json
                .as_i64()
                .map(Value::Int)
                .ok_or_else(|| invalid(path, "expected integer")),
            DynamicType::Float(_) => json
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| invalid(path, "expected number")),
            DynamicType::Bool(_) => json
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| invalid(path, "expected bool")),
            DynamicType::Char(_) => match json {
                Json::String(text) if text.len() == 1 => Ok(Value::Char(text.as_bytes()[0])),
                Json::Number(_) => json
                    .as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .map(Value::Char)
                    .ok_or_else(|| invalid(path, "expected byte value 0-255")),
                _ => Err(invalid(path, "expected one-byte string or byte value")),
            },
            DynamicType::String(_) => match json {
                Json::String(text) => Ok(Value::Bytes(Bytes::from(text.clone()))),
                Json::Array(items) => {
                    let mut bytes = Vec::with_capacity(items.len());
                    for item in items {
                        let byte = item
                            .as_u64()
                            .and_then(|b| u8::try_from(b).ok())
                            .ok_or_else(|| invalid(path, "expected byte value 0-255"))?;
                        bytes.push(byte);
                    }
                    Ok(Value::Bytes(Bytes::from(bytes)))
                }
                _ => Err(invalid(path, "expected string or byte array")),
            },
            DynamicType::Sequence(sequence) => {
                let items = json
                    .as_array()
                    .ok_or_else(|| invalid(path, "expected array"))?;
                let element_path = format!("{path}[]");
                items
                    .iter()
                    .map(|item| sequence.element().parse_json_at(item, &element_path))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Sequence)
            }
            DynamicType::Mapping { key, value } => {
                let key_path = format!("{path}{{key}}");
                let value_path = format!("{path}{{value}}");
                let mut entries = Vec::new();
                match json {
                    Json::Object(object) => {
                        for (raw_key, item) in object {
                            let key_json = match key.as_ref() {
                                DynamicType::Int(_) => raw_key
                                    .parse::<i64>()
                                    .map(Json::from)
                                    .map_err(|_| invalid(&key_path, "expected integer key"))?,
                                _ => Json::String(raw_key.clone()),
                            };
                            entries.push((
                                key.parse_json_at(&key_json, &key_path)?,
                                value.parse_json_at(item, &value_path)?,
                            ));
                        }
                    }
                    Json::Array(pairs) => {
                        for pair in pairs {
                            let [raw_key, item] = pair.as_array().map(Vec::as_slice).unwrap_or(&[])
                            else {
                                return Err(invalid(path, "expected [key, value] pair"));
                            };
                            entries.push((
                                key.parse_json_at(raw_key, &key_path)?,
                                value.parse_json_at(item, &value_path)?,
                            ));
                        }
                    }
                    _ => return Err(invalid(path, "expected object or array of pairs")),
                }
                Ok(Value::Mapping(entries))
            }
            DynamicType::Record { name, fields } => {
                let object = json
                    .as_object()
                    .ok_or_else(|| invalid(path, "expected object"))?;
                if let Some(unknown) = object
                    .keys()
                    .find(|key| !fields.iter().any(|(field, _)| field == *key))
                {
                    return Err(invalid(path, &format!("unknown field `{unknown}`")));
                }

                let mut out = IndexMap::with_capacity(fields.len());
                for (field, ty) in fields {
                    let item = object
                        .get(field)
                        .ok_or_else(|| DescriptorError::MissingField {
                            record: name.clone(),
                            field: field.clone(),
                        })?;
                    out.insert(field.clone(), ty.parse_json_at(item, &format!("{path}.{field}"))?);
                }
                Ok(Value::Record(out))
            }
        }
    }

    /// Convert a value shaped like this descriptor into JSON.
    ///
    /// Byte strings become JSON strings when they are valid UTF-8 and byte
    /// arrays otherwise. Mappings with string keys become objects, all other
    /// mappings become arrays of `[key, value]` pairs.
    pub fn value_to_json(&self, value: &Value) -> Result<Json> {
        let json = match (self, value) {
            (DynamicType::Int(_), Value::Int(v)) => Json::from(*v),
            (DynamicType::Float(_), Value::Float(v)) => {
                Number::from_f64(*v).map(Json::Number).unwrap_or(Json::Null)
            }
            (DynamicType::Bool(_), Value::Bool(v)) => Json::Bool(*v),
            (DynamicType::Char(_), Value::Char(v)) if v.is_ascii_graphic() => {
                Json::String(char::from(*v).to_string())
            }
            (DynamicType::Char(_), Value::Char(v)) => Json::from(*v),
            (DynamicType::String(_), Value::Bytes(bytes)) => match std::str::from_utf8(bytes) {
                Ok(text) => Json::String(text.to_string()),
                Err(_) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
            },
            (DynamicType::Sequence(sequence), Value::Sequence(items)) => Json::Array(
                items
                    .iter()
                    .map(|item| sequence.element().value_to_json(item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            (DynamicType::Mapping { key, value }, Value::Mapping(entries)) => {
                let text_keys: Option<Vec<&str>> = match key.as_ref() {
                    DynamicType::String(_) => entries
                        .iter()
                        .map(|(k, _)| match k {
                            Value::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
                            _ => None,
                        })
                        .collect(),
                    _ => None,
                };

                match text_keys {
                    Some(keys) => {
                        let mut object = Map::new();
                        for (text, (_, item)) in keys.into_iter().zip(entries) {
                            object.insert(text.to_string(), value.value_to_json(item)?);
                        }
                        Json::Object(object)
                    }
                    None => Json::Array(
                        entries
                            .iter()
                            .map(|(k, item)| {
                                Ok(Json::Array(vec![
                                    key.value_to_json(k)?,
                                    value.value_to_json(item)?,
                                ]))
                            })
                            .collect::<Result<Vec<_>>>()?,
                    ),
                }
            }
            (DynamicType::Record { name, fields }, Value::Record(values)) => {
                let mut object = Map::new();
                for (field, ty) in fields {
                    let item = values
                        .get(field)
                        .ok_or_else(|| DescriptorError::MissingField {
                            record: name.clone(),
                            field: field.clone(),
                        })?;
                    object.insert(field.clone(), ty.value_to_json(item)?);
                }
                Json::Object(object)
            }
            _ => return Err(mismatch(self, value)),
        };
        Ok(json)
    }
}

impl Descriptor for DynamicType {
    type Value = Value;

    fn read(&self, src: &mut dyn Decoder) -> Result<Value> {
        let value = match self {
            DynamicType::Int(descriptor) => Value::Int(descriptor.read(src)?),
            DynamicType::Float(descriptor) => Value::Float(descriptor.read(src)?),
            DynamicType::String(descriptor) => Value::Bytes(descriptor.read(src)?),
            DynamicType::Bool(descriptor) => Value::Bool(descriptor.read(src)?),
            DynamicType::Char(descriptor) => Value::Char(descriptor.read(src)?),
            DynamicType::Sequence(descriptor) => Value::Sequence(descriptor.read(src)?),
            DynamicType::Mapping { key, value } => {
                let count = read_count(src)?;
                let mut entries: Vec<(Value, Value)> =
                    Vec::with_capacity(count.min(PREALLOCATE_LIMIT));
                // keys are compared by their wire encoding
                let mut positions: HashMap<Bytes, usize> = HashMap::new();
                for _ in 0..count {
                    let k = key.read(src)?;
                    let v = value.read(src)?;
                    let mut wire = BytesMut::new();
                    key.write(&mut wire, &k)?;
                    // a repeated key keeps its first position and the latest value
                    match positions.entry(wire.freeze()) {
                        Entry::Occupied(slot) => {
                            trace!(key = ?k, "repeated mapping key");
                            entries[*slot.get()].1 = v;
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(entries.len());
                            entries.push((k, v));
                        }
                    }
                }
                Value::Mapping(entries)
            }
            DynamicType::Record { fields, .. } => {
                let mut out = IndexMap::with_capacity(fields.len());
                for (name, ty) in fields {
                    out.insert(name.clone(), ty.read(src)?);
                }
                Value::Record(out)
            }
        };
        Ok(value)
    }

    fn write(&self, dst: &mut dyn Encoder, value: &Value) -> Result<()> {
        match (self, value) {
            (DynamicType::Int(descriptor), Value::Int(v)) => descriptor.write(dst, v),
            (DynamicType::Float(descriptor), Value::Float(v)) => descriptor.write(dst, v),
            (DynamicType::String(descriptor), Value::Bytes(v)) => descriptor.write(dst, v),
            (DynamicType::Bool(descriptor), Value::Bool(v)) => descriptor.write(dst, v),
            (DynamicType::Char(descriptor), Value::Char(v)) => descriptor.write(dst, v),
            (DynamicType::Sequence(descriptor), Value::Sequence(v)) => descriptor.write(dst, v),
            (DynamicType::Mapping { key, value }, Value::Mapping(entries)) => {
                dst.write_u32(length_prefix(entries.len())?);
                for (k, v) in entries {
                    key.write(dst, k)?;
                    value.write(dst, v)?;
                }
                Ok(())
            }
            (DynamicType::Record { name, fields }, Value::Record(values)) => {
                for (field, ty) in fields {
                    let item = values
                        .get(field)
                        .ok_or_else(|| DescriptorError::MissingField {
                            record: name.clone(),
                            field: field.clone(),
                        })?;
                    ty.write(dst, item)?;
                }
                Ok(())
            }
            _ => Err(mismatch(self, value)),
        }
    }
}

impl fmt::Display for DynamicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicType::Int(integer) => f.write_str(integer.label()),
            DynamicType::Float(_) => f.write_str("float"),
            DynamicType::String(_) => f.write_str("string"),
            DynamicType::Bool(_) => f.write_str("bool"),
            DynamicType::Char(_) => f.write_str("char"),
            DynamicType::Sequence(sequence) => write!(f, "sequence<{}>", sequence.element()),
            DynamicType::Mapping { key, value } => write!(f, "mapping<{key}, {value}>"),
            DynamicType::Record { name, .. } => write!(f, "record {name}"),
        }
    }
}

fn invalid(path: &str, message: &str) -> DescriptorError {
    DescriptorError::InvalidValue {
        path: path.to_string(),
        message: message.to_string(),
    }
}

fn mismatch(ty: &DynamicType, value: &Value) -> DescriptorError {
    DescriptorError::TypeMismatch {
        expected: ty.kind(),
        found: value.kind(),
    }
}
