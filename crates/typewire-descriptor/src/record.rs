use std::collections::HashSet;
use std::fmt;

use typewire_channel::{Decoder, Encoder};

use crate::descriptor::Descriptor;
use crate::error::{DescriptorError, Result};

/// One named field bound to a record type through accessor closures.
trait FieldCodec<T>: Send + Sync {
    fn name(&self) -> &str;

    fn read_into(&self, src: &mut dyn Decoder, target: &mut T) -> Result<()>;

    fn write_from(&self, dst: &mut dyn Encoder, source: &T) -> Result<()>;
}

struct Field<D, G, S> {
    name: String,
    descriptor: D,
    get: G,
    set: S,
}

impl<T, D, G, S> FieldCodec<T> for Field<D, G, S>
where
    D: Descriptor + Send + Sync,
    G: Fn(&T) -> &D::Value + Send + Sync,
    S: Fn(&mut T, D::Value) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn read_into(&self, src: &mut dyn Decoder, target: &mut T) -> Result<()> {
        let value = self.descriptor.read(src)?;
        (self.set)(target, value);
        Ok(())
    }

    fn write_from(&self, dst: &mut dyn Encoder, source: &T) -> Result<()> {
        self.descriptor.write(dst, (self.get)(source))
    }
}

/// Record: named fields concatenated in declared order, no tags.
///
/// Each field pairs a descriptor with a getter and a setter on `T`.
/// Decoding constructs an empty `T`, then reads and assigns every field in
/// order. Both sides must declare the same fields in the same order; the
/// names never reach the wire.
///
/// ```
/// use bytes::Bytes;
/// use typewire_descriptor::{ByteString, Integer, Record};
///
/// #[derive(Default)]
/// struct Login {
///     user: Bytes,
///     attempt: i64,
/// }
///
/// let login = Record::<Login>::builder("Login")
///     .field("user", ByteString, |r| &r.user, |r, v| r.user = v)
///     .field("attempt", Integer::U8, |r| &r.attempt, |r, v| r.attempt = v)
///     .build()
///     .unwrap();
/// assert_eq!(login.field_names().collect::<Vec<_>>(), ["user", "attempt"]);
/// ```
pub struct Record<T> {
    name: String,
    construct: Box<dyn Fn() -> T + Send + Sync>,
    fields: Vec<Box<dyn FieldCodec<T>>>,
}

impl<T> Record<T> {
    /// Start a record whose empty instance comes from `construct`.
    pub fn builder_with<F>(name: impl Into<String>, construct: F) -> RecordBuilder<T>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        RecordBuilder {
            name: name.into(),
            construct: Box::new(construct),
            fields: Vec::new(),
        }
    }

    /// Record type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field names in wire order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T: Default + 'static> Record<T> {
    /// Start a record whose empty instance is `T::default()`.
    pub fn builder(name: impl Into<String>) -> RecordBuilder<T> {
        Self::builder_with(name, T::default)
    }
}

impl<T> Descriptor for Record<T> {
    type Value = T;

    fn read(&self, src: &mut dyn Decoder) -> Result<T> {
        let mut out = (self.construct)();
        for field in &self.fields {
            field.read_into(src, &mut out)?;
        }
        Ok(out)
    }

    fn write(&self, dst: &mut dyn Encoder, value: &T) -> Result<()> {
        for field in &self.fields {
            field.write_from(dst, value)?;
        }
        Ok(())
    }
}

impl<T> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("name", &self.name)
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`Record`]. Field order is declaration order.
pub struct RecordBuilder<T> {
    name: String,
    construct: Box<dyn Fn() -> T + Send + Sync>,
    fields: Vec<Box<dyn FieldCodec<T>>>,
}

impl<T> RecordBuilder<T> {
    /// Append a field.
    pub fn field<D, G, S>(mut self, name: impl Into<String>, descriptor: D, get: G, set: S) -> Self
    where
        D: Descriptor + Send + Sync + 'static,
        G: Fn(&T) -> &D::Value + Send + Sync + 'static,
        S: Fn(&mut T, D::Value) + Send + Sync + 'static,
    {
        self.fields.push(Box::new(Field {
            name: name.into(),
            descriptor,
            get,
            set,
        }));
        self
    }

    /// Finish the record. Duplicate field names are rejected.
    pub fn build(self) -> Result<Record<T>> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name()) {
                return Err(DescriptorError::DuplicateField {
                    record: self.name.clone(),
                    field: field.name().to_string(),
                });
            }
        }

        Ok(Record {
            name: self.name,
            construct: self.construct,
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use bytes::Bytes;
    use indexmap::IndexMap;

    use super::*;
    use crate::composite::{Mapping, Sequence};
    use crate::descriptor::{decode_from_bytes, encode_to_bytes};
    use crate::primitive::{ByteString, Float, Integer};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Scored {
        id: i64,
        name: Bytes,
        scores: Vec<i64>,
    }

    fn scored_descriptor() -> Record<Scored> {
        Record::<Scored>::builder("Scored")
            .field("id", Integer::S32, |r| &r.id, |r, v| r.id = v)
            .field("name", ByteString, |r| &r.name, |r, v| r.name = v)
            .field(
                "scores",
                Sequence::new(Integer::U16),
                |r| &r.scores,
                |r, v| r.scores = v,
            )
            .build()
            .unwrap()
    }

    #[test]
    fn record_byte_layout() {
        let descriptor = scored_descriptor();
        let value = Scored {
            id: -5,
            name: Bytes::from_static(b"ok"),
            scores: vec![1, 2, 3],
        };

        let wire = encode_to_bytes(&descriptor, &value).unwrap();
        assert_eq!(
            wire.as_ref(),
            &[
                0xFB, 0xFF, 0xFF, 0xFF, //
                0x02, 0x00, 0x00, 0x00, 0x6F, 0x6B, //
                0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00,
            ]
        );
        assert_eq!(decode_from_bytes(&descriptor, wire).unwrap(), value);
    }

    #[test]
    fn decode_from_literal_bytes() {
        let wire = Bytes::from_static(&[
            0xFB, 0xFF, 0xFF, 0xFF, 0x02, 0x00, 0x00, 0x00, 0x6F, 0x6B, 0x03, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x02, 0x00, 0x03, 0x00,
        ]);
        let value = decode_from_bytes(&scored_descriptor(), wire).unwrap();

        assert_eq!(value.id, -5);
        assert_eq!(value.name.as_ref(), b"ok");
        assert_eq!(value.scores, vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_field_rejected() {
        let err = Record::<Scored>::builder("Scored")
            .field("id", Integer::S32, |r| &r.id, |r, v| r.id = v)
            .field("id", Integer::S32, |r| &r.id, |r, v| r.id = v)
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            DescriptorError::DuplicateField { ref field, .. } if field == "id"
        ));
    }

    #[test]
    fn custom_constructor_is_used() {
        #[derive(Debug, PartialEq)]
        struct Tagged {
            tag: &'static str,
            value: f64,
        }

        let descriptor = Record::builder_with("Tagged", || Tagged {
            tag: "decoded",
            value: 0.0,
        })
        .field("value", Float, |r: &Tagged| &r.value, |r, v| r.value = v)
        .build()
        .unwrap();

        let wire = encode_to_bytes(
            &descriptor,
            &Tagged {
                tag: "local",
                value: 2.5,
            },
        )
        .unwrap();
        assert_eq!(wire.len(), 8);
        assert_eq!(
            decode_from_bytes(&descriptor, wire).unwrap(),
            Tagged {
                tag: "decoded",
                value: 2.5
            }
        );
    }

    #[test]
    fn mismatched_field_order_decodes_wrong_values() {
        #[derive(Debug, Default, PartialEq)]
        struct Pair {
            a: i64,
            b: i64,
        }

        let writer = Record::<Pair>::builder("Pair")
            .field("a", Integer::U16, |r| &r.a, |r, v| r.a = v)
            .field("b", Integer::U16, |r| &r.b, |r, v| r.b = v)
            .build()
            .unwrap();
        let reader = Record::<Pair>::builder("Pair")
            .field("b", Integer::U16, |r| &r.b, |r, v| r.b = v)
            .field("a", Integer::U16, |r| &r.a, |r, v| r.a = v)
            .build()
            .unwrap();

        let wire = encode_to_bytes(&writer, &Pair { a: 1, b: 2 }).unwrap();
        assert_eq!(
            decode_from_bytes(&reader, wire).unwrap(),
            Pair { a: 2, b: 1 }
        );
    }

    #[test]
    fn sequence_of_mappings_of_records() {
        let record = Arc::new(scored_descriptor());
        let descriptor = Sequence::new(Mapping::new(ByteString, Arc::clone(&record)));

        let entry = |id: i64, name: &'static str, scores: Vec<i64>| Scored {
            id,
            name: Bytes::from_static(name.as_bytes()),
            scores,
        };
        let mut first = IndexMap::new();
        first.insert(Bytes::from_static(b"z"), entry(9, "nine", vec![9]));
        first.insert(Bytes::from_static(b"a"), entry(-1, "", vec![]));
        let mut second = IndexMap::new();
        second.insert(Bytes::from_static(b"m"), entry(0, "zero", vec![0, 65535]));
        let value = vec![first, IndexMap::new(), second];

        let wire = encode_to_bytes(&descriptor, &value).unwrap();
        let back = decode_from_bytes(&descriptor, wire).unwrap();

        assert_eq!(back, value);
        assert_eq!(
            back[0].keys().collect::<Vec<_>>(),
            vec![&Bytes::from_static(b"z"), &Bytes::from_static(b"a")]
        );
    }

    #[test]
    fn descriptor_shared_across_threads() {
        let descriptor = Arc::new(scored_descriptor());

        let handles: Vec<_> = (0..4)
            .map(|id| {
                let descriptor = Arc::clone(&descriptor);
                thread::spawn(move || {
                    let value = Scored {
                        id,
                        name: Bytes::from(format!("worker-{id}")),
                        scores: vec![id; 3],
                    };
                    let wire = encode_to_bytes(&descriptor, &value).unwrap();
                    assert_eq!(decode_from_bytes(&descriptor, wire).unwrap(), value);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn debug_lists_fields() {
        let rendered = format!("{:?}", scored_descriptor());
        assert!(rendered.contains("Scored"));
        assert!(rendered.contains("scores"));
    }
}
