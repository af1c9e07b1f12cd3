//! Byte payloads: the base64 mapping and the raw byte literal.
//!
//! Serpent text has two ways to carry binary data. The default wraps a base64
//! string in a small mapping that any literal reader understands:
//!
//! ```text
//! {'data':'aGVsbG8=','encoding':'base64'}
//! ```
//!
//! The other writes a `b'...'` byte literal, which needs a reader with byte
//! literal support. [`decode_bytes`] accepts both once read back.

use crate::{BytesMode, Error, Result, SerpentMap, Value};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

const DATA_KEY: &str = "data";
const ENCODING_KEY: &str = "encoding";
const BASE64_ENCODING: &str = "base64";

/// Wraps a byte payload in the transport form selected by `mode`.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{encode_bytes, BytesMode, Value};
///
/// let wrapped = encode_bytes(b"hello", BytesMode::Base64);
/// assert_eq!(wrapped.to_string(), "{'data':'aGVsbG8=','encoding':'base64'}");
///
/// let raw = encode_bytes(b"hello", BytesMode::Literal);
/// assert_eq!(raw, Value::bytes(b"hello".to_vec()));
/// ```
#[must_use]
pub fn encode_bytes(data: &[u8], mode: BytesMode) -> Value {
    match mode {
        BytesMode::Base64 => {
            let mut map = SerpentMap::with_capacity(2);
            map.insert(Value::from(DATA_KEY), Value::Str(BASE64.encode(data)));
            map.insert(Value::from(ENCODING_KEY), Value::from(BASE64_ENCODING));
            Value::Map(map)
        }
        BytesMode::Literal => Value::Bytes(data.to_vec()),
    }
}

/// Recovers a byte payload from a value that was read back.
///
/// Raw bytes are returned as they are. A mapping with `data` and
/// `encoding == 'base64'` is decoded. Anything else is not byte data.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{decode_bytes, read_str, Error, Value};
///
/// let value = read_str("{'data':'aGVsbG8=','encoding':'base64'}").unwrap();
/// assert_eq!(decode_bytes(&value).unwrap(), b"hello");
///
/// assert!(matches!(decode_bytes(&Value::from(42)), Err(Error::NotBytes(_))));
/// ```
///
/// # Errors
///
/// Returns [`Error::NotBytes`] for any other shape, including a mapping with
/// a missing key or an encoding other than base64, and [`Error::ByteDecode`]
/// when the base64 text is invalid.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_bytes(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Bytes(data) => Ok(data.clone()),
        Value::Map(map) => {
            let data = map.get_str(DATA_KEY).and_then(Value::as_str);
            let encoding = map.get_str(ENCODING_KEY).and_then(Value::as_str);
            match (data, encoding) {
                (Some(data), Some(BASE64_ENCODING)) => BASE64
                    .decode(data)
                    .map_err(|e| Error::ByteDecode(e.to_string())),
                _ => Err(Error::NotBytes(describe_map(map))),
            }
        }
        other => Err(Error::NotBytes(other.kind_name().to_string())),
    }
}

/// Returns `true` if `map` has the shape of a base64 byte mapping.
pub(crate) fn is_base64_mapping(map: &SerpentMap) -> bool {
    map.len() == 2
        && map.get_str(DATA_KEY).map_or(false, Value::is_str)
        && map.get_str(ENCODING_KEY).and_then(Value::as_str) == Some(BASE64_ENCODING)
}

fn describe_map(map: &SerpentMap) -> String {
    if map.is_empty() {
        return "empty dict".to_string();
    }
    match map.get_str(ENCODING_KEY).and_then(Value::as_str) {
        Some(encoding) if map.contains_key(&Value::from(DATA_KEY)) => {
            format!("dict with unsupported encoding '{}'", encoding)
        }
        _ => "dict without 'data' and 'encoding' keys".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(entries: &[(&str, &str)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(k, v)| (Value::from(*k), Value::from(*v)))
                .collect(),
        )
    }

    #[test]
    fn test_base64_shape() {
        let value = encode_bytes(&[0, 1, 2, 255], BytesMode::Base64);
        let map = value.as_map().unwrap();
        assert!(is_base64_mapping(map));
        assert_eq!(map.get_str("data").and_then(Value::as_str), Some("AAEC/w=="));
        assert_eq!(decode_bytes(&value).unwrap(), vec![0, 1, 2, 255]);
    }

    #[test]
    fn test_empty_payload() {
        let value = encode_bytes(b"", BytesMode::Base64);
        assert_eq!(decode_bytes(&value).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_rejects_non_byte_shapes() {
        let cases = [
            mapping(&[("encoding", "base64")]),
            mapping(&[("data", "YWJj")]),
            mapping(&[("data", "YWJj"), ("encoding", "hex")]),
            Value::Map(SerpentMap::new()),
            Value::from(42),
        ];
        for case in &cases {
            assert!(
                matches!(decode_bytes(case), Err(Error::NotBytes(_))),
                "{:?} should not decode",
                case
            );
        }
    }

    #[test]
    fn test_invalid_base64() {
        let value = mapping(&[("data", "!!not base64!!"), ("encoding", "base64")]);
        assert!(matches!(decode_bytes(&value), Err(Error::ByteDecode(_))));
    }
}
