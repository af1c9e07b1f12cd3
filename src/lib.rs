//! # serde_serpent
//!
//! A Serde-compatible serializer for the serpent format: object graphs written
//! as Python literal expressions, readable by a safe literal evaluator.
//!
//! ## What is serpent?
//!
//! Serpent text is a single Python expression built only from literals: `None`,
//! booleans, integers of any size, floats, complex numbers, strings, lists,
//! tuples, dicts and sets. Because nothing in it is executable, it can be sent
//! to an untrusted peer and read back without evaluating code. A one-line
//! header (`# serpent utf-8 python3.2`) declares the grammar profile.
//!
//! ## Key Features
//!
//! - **Safe reader**: a recursive-descent parser that rejects names, calls and
//!   arithmetic instead of evaluating them
//! - **Serde Compatible**: any `#[derive(Serialize, Deserialize)]` type works;
//!   structs are written as dicts tagged with `'__class__'`
//! - **Type registry**: per-type handlers replace the default rendering
//! - **Graph guards**: circular [`Shared`] references and excessive nesting
//!   are reported as errors instead of overflowing the stack
//! - **Byte data**: bytes travel as a base64 mapping or as a `b'..'` literal
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! serde_serpent = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Basic Serialization and Deserialization
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_serpent::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     active: true,
//! };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(
//!     text,
//!     "# serpent utf-8 python3.2\n{'__class__':'User','id':123,'name':'Alice','active':True}"
//! );
//!
//! let user_back: User = from_str(&text).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Reading Untrusted Input
//!
//! ```rust
//! use serde_serpent::{read_str, Error, Value};
//!
//! let value = read_str("{'point': (1, 2), 'tags': {'a', 'b'}, 'raw': b'\\x00'}").unwrap();
//! assert!(value.as_map().is_some());
//!
//! assert!(matches!(read_str("__import__('os').system('ls')"), Err(Error::GrammarViolation { .. })));
//! ```
//!
//! ### Dynamic Values with the serpent! Macro
//!
//! ```rust
//! use serde_serpent::{serpent, Value};
//!
//! let data = serpent!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "serde", "python"]
//! });
//!
//! assert_eq!(data.as_map().and_then(|m| m.get_str("name")).and_then(Value::as_str), Some("Alice"));
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - The reader never evaluates input; its recursion is bounded by `max_depth`
//! - NUL bytes and invalid UTF-8 are rejected before parsing
//! - Proper error propagation with `Result` types
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Writing and reading a derived struct
//! - **`dynamic_values.rs`** - Working with [`Value`] trees and the `serpent!` macro
//! - **`custom_options.rs`** - Indentation, bytes modes and grammar profiles
//! - **`registry.rs`** - Custom type handlers, objects and exceptions
//!
//! Run any example with: `cargo run --example <name>`

pub mod bytes;
pub mod collections;
pub mod de;
pub mod error;
mod format;
pub mod grammar;
pub mod macros;
pub mod map;
pub mod object;
pub mod options;
pub mod registry;
pub mod ser;
pub mod value;

pub use bytes::{decode_bytes, encode_bytes};
pub use collections::{ItemsView, KeysView, OrderedDict, Set, Shared, ValuesView};
pub use de::Deserializer;
pub use error::{Error, Result};
pub use grammar::{HEADER_PY26, HEADER_PY32};
pub use map::{SerpentMap, SerpentSet};
pub use object::{serialize_object, Exception, ObjectState};
pub use options::{default_max_depth, BytesMode, ReadOptions, SerpentOptions};
pub use registry::{
    register_type, reset_registry, unregister_type, Handler, Registry, TypeContext, TypeInfo,
    TypeKind, TypeMatcher,
};
pub use ser::Serializer;
pub use value::{Complex, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// The dict key that carries the class name of a written object.
pub const CLASS_KEY: &str = "__class__";

/// Serialize any `T: Serialize` to a serpent document.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let point = Point { x: 1, y: 2 };
/// let text = to_string(&point).unwrap();
/// assert!(text.ends_with("{'__class__':'Point','x':1,'y':2}"));
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized (e.g., circular references,
/// unhashable dict keys, or nesting deeper than the default limit).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, SerpentOptions::default())
}

/// Serialize any `T: Serialize` to an indented serpent document.
///
/// Indented output lists one element per line and sorts dict keys and set
/// elements when they are mutually comparable.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::to_string_pretty;
///
/// let text = to_string_pretty(&vec![1, 2]).unwrap();
/// assert_eq!(text, "# serpent utf-8 python3.2\n[\n  1,\n  2\n]");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, SerpentOptions::pretty())
}

/// Serialize any `T: Serialize` to a serpent document with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{to_string_with_options, SerpentOptions};
/// use std::collections::BTreeSet;
///
/// let set: BTreeSet<i32> = [1, 2].into_iter().collect();
/// let options = SerpentOptions::new().with_set_literals(false);
/// let text = to_string_with_options(&serde_serpent::Set(&set), options).unwrap();
/// assert_eq!(text, "# serpent utf-8 python2.6\n(1,2)");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: SerpentOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    tracing::trace!(indent = options.indent, "writing serpent document");
    let text = Serializer::new(options).to_string(value)?;
    tracing::trace!(len = text.len(), "serpent document written");
    Ok(text)
}

/// Serialize any `T: Serialize` to serpent bytes (UTF-8).
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_vec_with_options(value, SerpentOptions::default())
}

/// Serialize any `T: Serialize` to serpent bytes with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options<T>(value: &T, options: SerpentOptions) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, options).map(String::into_bytes)
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// The registry and all write checks apply, so this is exactly the tree the
/// writer would format.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.class_name(), Some("Point"));
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    Serializer::new(SerpentOptions::default()).to_value(value)
}

/// Serialize any `T: Serialize` to a writer as a serpent document.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &(1, "a")).unwrap();
/// assert!(buffer.ends_with(b"(1,'a')"));
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, SerpentOptions::default())
}

/// Serialize any `T: Serialize` to a writer with custom options.
///
/// Nothing is written when serialization fails.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: SerpentOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Parse serpent bytes into a [`Value`] with the default reader profile.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{read, Value};
///
/// let value = read(b"# serpent utf-8 python3.2\n(1, 'a')").unwrap();
/// assert_eq!(value, Value::Tuple(vec![Value::from(1), Value::from("a")]));
/// ```
///
/// # Errors
///
/// Returns an error on embedded NUL bytes, invalid UTF-8, an incompatible
/// header, or anything that is not a pure literal expression.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read(bytes: &[u8]) -> Result<Value> {
    read_with_options(bytes, &ReadOptions::default())
}

/// Parse a serpent string into a [`Value`].
///
/// # Errors
///
/// See [`read`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_str(s: &str) -> Result<Value> {
    read(s.as_bytes())
}

/// Parse serpent bytes into a [`Value`] under an explicit reader profile.
///
/// # Errors
///
/// See [`read`]; additionally fails with
/// [`Error::IncompatibleCapability`] when the header declares set literals
/// the profile does not accept.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_with_options(bytes: &[u8], options: &ReadOptions) -> Result<Value> {
    tracing::trace!(len = bytes.len(), "reading serpent document");
    let input = de::decode_input(bytes)?;
    let value = Deserializer::with_options(input, options).parse_document()?;
    tracing::trace!(kind = value.kind_name(), "serpent document read");
    Ok(value)
}

/// Deserialize an instance of type `T` from a string of serpent text.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("{'__class__':'Point','x':1,'y':2}").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid serpent or cannot be deserialized to type `T`.
/// Parse errors include line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut deserializer = Deserializer::from_str(s);
    T::deserialize(&mut deserializer)
}

/// Deserialize an instance of type `T` from an I/O stream of serpent text.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::from_reader;
/// use std::io::Cursor;
///
/// let numbers: Vec<i64> = from_reader(Cursor::new(b"[1, 2, 3]")).unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not valid
/// serpent, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&buffer)
}

/// Deserialize an instance of type `T` from bytes of serpent text.
///
/// # Errors
///
/// Returns an error if the bytes contain NUL or are not valid UTF-8, are not
/// valid serpent, or cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str(de::decode_input(v)?)
}

/// Deserialize an instance of type `T` from an already parsed [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{from_value, read_str};
///
/// let value = read_str("{'a': 1}").unwrap();
/// let map: std::collections::HashMap<String, u8> = from_value(value).unwrap();
/// assert_eq!(map["a"], 1);
/// ```
///
/// # Errors
///
/// Returns an error if the value does not match the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(de::ValueDeserializer::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    fn alice() -> User {
        User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        }
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let text = to_string(&point).unwrap();
        let point_back: Point = from_str(&text).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let text = to_string(&alice()).unwrap();
        assert!(text.starts_with(HEADER_PY32));
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(alice(), user_back);
    }

    #[test]
    fn test_pretty_printing() {
        let text = to_string_pretty(&alice()).unwrap();
        assert!(text.contains("\n  'active': True,"));
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(alice(), user_back);
    }

    #[test]
    fn test_to_value() {
        let value = to_value(&Point { x: 1, y: 2 }).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get_str(CLASS_KEY), Some(&Value::from("Point")));
        assert_eq!(map.get_str("x"), Some(&Value::from(1)));
        assert_eq!(map.get_str("y"), Some(&Value::from(2)));
    }

    #[test]
    fn test_arrays() {
        let numbers = vec![1, 2, 3, 4, 5];
        let text = to_string(&numbers).unwrap();
        let numbers_back: Vec<i32> = from_str(&text).unwrap();
        assert_eq!(numbers, numbers_back);
    }

    #[test]
    fn test_legacy_profile() {
        let options = SerpentOptions::new().with_set_literals(false);
        let text = to_string_with_options(&alice(), options).unwrap();
        assert!(text.starts_with(HEADER_PY26));
        let strict = ReadOptions::new().with_set_literals(false);
        assert!(read_with_options(text.as_bytes(), &strict).is_ok());
    }

    #[test]
    fn test_writer_leaves_output_untouched_on_error() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1], 2);
        let mut buffer = Vec::new();
        assert!(to_writer(&mut buffer, &map).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_from_slice_rejects_bad_input() {
        assert!(matches!(from_slice::<i32>(b"1\0"), Err(Error::EmbeddedNul { offset: 1 })));
        assert!(matches!(from_slice::<i32>(b"\xff"), Err(Error::InvalidEncoding(_))));
    }
}
