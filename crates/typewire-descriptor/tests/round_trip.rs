use bytes::Bytes;
use indexmap::IndexMap;
use proptest::prelude::*;
use typewire_descriptor::{
    decode_from_bytes, encode_to_bytes, Bool, ByteString, Char, Descriptor, Float, Integer,
    Mapping, Record, Sequence,
};

fn round_trip<D: Descriptor>(descriptor: &D, value: &D::Value) -> D::Value {
    let wire = encode_to_bytes(descriptor, value).expect("encoding must work");
    decode_from_bytes(descriptor, wire).expect("decoding must work")
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Scored {
    id: i64,
    name: Bytes,
    scores: Vec<i64>,
}

fn scored() -> Record<Scored> {
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
        .expect("fields are distinct")
}

proptest! {
    #[test]
    fn prop_unsigned_integers(a in any::<u8>(), b in any::<u16>(), c in any::<u32>()) {
        prop_assert_eq!(round_trip(&Integer::U8, &i64::from(a)), i64::from(a));
        prop_assert_eq!(round_trip(&Integer::U16, &i64::from(b)), i64::from(b));
        prop_assert_eq!(round_trip(&Integer::U32, &i64::from(c)), i64::from(c));
    }

    #[test]
    fn prop_signed_integers(a in any::<i8>(), b in any::<i16>(), c in any::<i32>()) {
        prop_assert_eq!(round_trip(&Integer::S8, &i64::from(a)), i64::from(a));
        prop_assert_eq!(round_trip(&Integer::S16, &i64::from(b)), i64::from(b));
        prop_assert_eq!(round_trip(&Integer::S32, &i64::from(c)), i64::from(c));
    }

    #[test]
    fn prop_doubles_are_bit_exact(value in any::<f64>()) {
        prop_assert_eq!(round_trip(&Float, &value).to_bits(), value.to_bits());
    }

    #[test]
    fn prop_byte_strings(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let value = Bytes::from(data);
        prop_assert_eq!(round_trip(&ByteString, &value), value);
    }

    #[test]
    fn prop_bool_and_char(flag in any::<bool>(), byte in any::<u8>()) {
        prop_assert_eq!(round_trip(&Bool, &flag), flag);
        prop_assert_eq!(round_trip(&Char, &byte), byte);
    }

    #[test]
    fn prop_nested_sequences(
        rows in prop::collection::vec(prop::collection::vec(any::<i16>(), 0..16), 0..16),
    ) {
        let value: Vec<Vec<i64>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(i64::from).collect())
            .collect();
        let descriptor = Sequence::new(Sequence::new(Integer::S16));
        prop_assert_eq!(round_trip(&descriptor, &value), value);
    }

    #[test]
    fn prop_mappings_keep_insertion_order(
        pairs in prop::collection::vec((any::<u16>(), any::<i32>()), 0..32),
    ) {
        let value: IndexMap<i64, i64> = pairs
            .into_iter()
            .map(|(k, v)| (i64::from(k), i64::from(v)))
            .collect();
        let descriptor = Mapping::new(Integer::U16, Integer::S32);

        let back = round_trip(&descriptor, &value);
        prop_assert!(back.iter().eq(value.iter()));
    }

    #[test]
    fn prop_records(
        id in any::<i32>(),
        name in prop::collection::vec(any::<u8>(), 0..32),
        scores in prop::collection::vec(any::<u16>(), 0..32),
    ) {
        let value = Scored {
            id: i64::from(id),
            name: Bytes::from(name),
            scores: scores.into_iter().map(i64::from).collect(),
        };
        prop_assert_eq!(round_trip(&scored(), &value), value);
    }
}
