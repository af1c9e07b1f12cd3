//! Property-based tests - core roundtrip guarantees of the writer and reader
//!
//! These complement the integration tests by checking that whatever the
//! writer produces, the safe reader accepts and maps back to the same data.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_serpent::{
    from_str, read_str, to_string, to_string_pretty, to_string_with_options, BytesMode,
    SerpentOptions, Value,
};
use std::collections::BTreeMap;

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    match to_string(value) {
        Ok(serialized) => match from_str::<T>(&serialized) {
            Ok(deserialized) => *value == deserialized,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Record {
    id: u64,
    label: String,
    weight: f64,
    flags: Vec<bool>,
    parent: Option<i32>,
}

fn record() -> impl Strategy<Value = Record> {
    (
        any::<u64>(),
        any::<String>(),
        any::<f64>().prop_filter("NaN is never equal to itself", |f| !f.is_nan()),
        prop::collection::vec(any::<bool>(), 0..5),
        proptest::option::of(any::<i32>()),
    )
        .prop_map(|(id, label, weight, flags, parent)| Record {
            id,
            label,
            weight,
            flags,
            parent,
        })
}

/// Leaves plus nested lists, tuples and string-keyed dicts.
fn value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::None),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("NaN breaks equality", |f| !f.is_nan())
            .prop_map(Value::Float),
        any::<String>().prop_map(Value::Str),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(Value::Bytes),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Tuple),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6).prop_map(|entries| {
                Value::Map(entries.into_iter().map(|(k, v)| (Value::Str(k), v)).collect())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u64(n in any::<u64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_i128(n in any::<i128>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_finite_f64(f in any::<f64>().prop_filter("not NaN", |f| !f.is_nan())) {
        prop_assert!(roundtrip(&f));
    }

    #[test]
    fn prop_string(s in any::<String>()) {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_char(c in any::<char>()) {
        prop_assert!(roundtrip(&c));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_option_i32(opt in proptest::option::of(any::<i32>())) {
        prop_assert!(roundtrip(&opt));
    }

    #[test]
    fn prop_tuple_i32_bool(t in (any::<i32>(), any::<bool>())) {
        prop_assert!(roundtrip(&t));
    }

    #[test]
    fn prop_int_keyed_map(m in prop::collection::btree_map(any::<i16>(), any::<String>(), 0..10)) {
        prop_assert!(roundtrip(&m));
    }

    #[test]
    fn prop_record(r in record()) {
        prop_assert!(roundtrip(&r));
    }

    #[test]
    fn prop_records_by_name(m in prop::collection::btree_map("[a-z]{1,8}", record(), 0..4)) {
        let m: BTreeMap<String, Record> = m;
        prop_assert!(roundtrip(&m));
    }

    #[test]
    fn prop_output_is_ascii(v in value()) {
        let text = to_string(&v).unwrap();
        prop_assert!(text.is_ascii());
        prop_assert!(!text.contains('\0'));
    }

    #[test]
    fn prop_value_tree_roundtrip(v in value()) {
        // literal bytes read back as bytes; the base64 mapping would read back as a dict
        let options = SerpentOptions::new().with_bytes_mode(BytesMode::Literal);
        let text = to_string_with_options(&v, options).unwrap();
        prop_assert_eq!(read_str(&text).unwrap(), v);
    }

    #[test]
    fn prop_pretty_reads_like_compact(v in value()) {
        let compact = read_str(&to_string(&v).unwrap()).unwrap();
        let pretty = read_str(&to_string_pretty(&v).unwrap()).unwrap();
        prop_assert_eq!(compact, pretty);
    }

    #[test]
    fn prop_reader_never_panics(s in "\\PC{0,40}") {
        let _ = read_str(&s);
    }
}
