//! Dynamic value representation for serpent data.
//!
//! This module provides the [`Value`] enum, the closed set of shapes a serpent
//! literal expression can describe. Every write goes through a `Value` tree and
//! every read produces one.
//!
//! ## Core Types
//!
//! - [`Value`]: None, bool, int (arbitrary precision), float, complex, str,
//!   bytes, list, tuple, set and dict
//! - [`Complex`]: a pair of IEEE doubles
//!
//! A *tagged object* is a dict whose first key is the string `__class__`;
//! [`Value::tagged`] builds one and [`Value::class_name`] reads the tag back.
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use serde_serpent::{Value, SerpentMap};
//!
//! let none = Value::None;
//! let boolean = Value::from(true);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//! let pair = Value::tuple(vec![Value::from(1), Value::from(2)]);
//!
//! let mut fields = SerpentMap::new();
//! fields.insert(Value::from("x"), Value::from(1));
//! let point = Value::tagged("Point", fields);
//! assert_eq!(point.class_name(), Some("Point"));
//! ```
//!
//! ### Reading Values
//!
//! ```rust
//! use serde_serpent::{read_str, Value};
//!
//! let value = read_str("(1, 'two', 3.0)").unwrap();
//! assert!(value.is_tuple());
//! assert_eq!(value.as_slice().map(|items| items.len()), Some(3));
//! ```
//!
//! ## Equality
//!
//! `Value` is `Eq` and `Hash` so it can key a [`SerpentMap`] and live in a
//! [`SerpentSet`]. Floats compare totally: every NaN equals every other NaN and
//! `0.0 == -0.0`. Dict and set equality ignore order.

use crate::{SerpentMap, SerpentSet};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;
use uuid::Uuid;

/// A dynamically-typed representation of any serpent literal.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::Value;
///
/// let list = Value::List(vec![Value::from(1), Value::None]);
/// assert!(list.is_list());
/// assert_eq!(list.to_string(), "[1,None]");
/// ```
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(BigInt),
    Float(f64),
    Complex(Complex),
    Str(String),
    /// Raw binary payload. Written through the byte codec, never as itself.
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(SerpentSet),
    Map(SerpentMap),
}

/// A complex number with double precision components.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{Complex, Value};
///
/// let z = Complex::new(2.0, -3.0);
/// assert_eq!(Value::Complex(z).to_string(), "(2.0-3.0j)");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    /// Returns `true` if either component is NaN.
    #[inline]
    #[must_use]
    pub fn has_nan(&self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
}

impl PartialEq for Complex {
    fn eq(&self, other: &Self) -> bool {
        float_eq(self.re, other.re) && float_eq(self.im, other.im)
    }
}

impl Eq for Complex {}

impl Hash for Complex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_float(self.re, state);
        hash_float(self.im, state);
    }
}

#[inline]
fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

#[inline]
fn hash_float<H: Hasher>(f: f64, state: &mut H) {
    let bits = if f.is_nan() {
        f64::NAN.to_bits()
    } else if f == 0.0 {
        0u64
    } else {
        f.to_bits()
    };
    bits.hash(state);
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_eq(*a, *b),
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::None => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => hash_float(*f, state),
            Value::Complex(c) => c.hash(state),
            Value::Str(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::List(items) | Value::Tuple(items) => items.hash(state),
            // unordered containers: hash must not depend on iteration order
            Value::Set(set) => set.len().hash(state),
            Value::Map(map) => map.len().hash(state),
        }
    }
}

impl Value {
    /// Builds a tuple value.
    #[must_use]
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(items)
    }

    /// Builds a byte payload value.
    #[must_use]
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    /// Builds a tagged object: a dict whose first key is `__class__`.
    ///
    /// Any `__class__` entry already present in `fields` is replaced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_serpent::{SerpentMap, Value};
    ///
    /// let obj = Value::tagged("Widget", SerpentMap::new());
    /// assert_eq!(obj.to_string(), "{'__class__':'Widget'}");
    /// ```
    #[must_use]
    pub fn tagged(class_name: impl Into<String>, fields: SerpentMap) -> Self {
        let mut map = SerpentMap::with_capacity(fields.len() + 1);
        map.insert(Value::from(crate::CLASS_KEY), Value::Str(class_name.into()));
        for (key, value) in fields {
            if key.as_str() != Some(crate::CLASS_KEY) {
                map.insert(key, value);
            }
        }
        Value::Map(map)
    }

    /// Returns the `__class__` tag of a tagged object.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.as_map()?.get_str(crate::CLASS_KEY)?.as_str()
    }

    /// Returns the serpent name of this value's kind, as a Python reader would see it.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Complex(_) => "complex",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Map(_) => "dict",
        }
    }

    /// Returns `true` if the value may be used as a dict key or set element.
    ///
    /// The allowlist is bool, int, float, complex, str, and tuples made only of those.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_serpent::Value;
    ///
    /// assert!(Value::tuple(vec![Value::from(1), Value::from("a")]).is_hashable());
    /// assert!(!Value::List(vec![]).is_hashable());
    /// assert!(!Value::tuple(vec![Value::List(vec![])]).is_hashable());
    /// ```
    #[must_use]
    pub fn is_hashable(&self) -> bool {
        match self {
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Complex(_) | Value::Str(_) => {
                true
            }
            Value::Tuple(items) => items.iter().all(Value::is_hashable),
            _ => false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_tuple(&self) -> bool {
        matches!(self, Value::Tuple(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Value::Set(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_serpent::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an int that fits in `i64`, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_serpent::Value;
    ///
    /// assert_eq!(Value::from(42).as_i64(), Some(42));
    /// assert_eq!(Value::from(u128::MAX).as_i64(), None);
    /// assert_eq!(Value::from(4.0).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => i64::try_from(i).ok(),
            _ => None,
        }
    }

    /// Returns the value as an `f64` for ints and floats.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => match i64::try_from(i) {
                Ok(small) => Some(small as f64),
                Err(_) => i.to_string().parse().ok(),
            },
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_complex(&self) -> Option<Complex> {
        match self {
            Value::Complex(c) => Some(*c),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the elements of a list or tuple.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_set(&self) -> Option<&SerpentSet> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&SerpentMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Renders the compact serpent expression, without header line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::display(self))
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::display(&Value::Complex(*self)))
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use crate::ser::{BIGINT_TOKEN, COMPLEX_TOKEN, SET_TOKEN};
        use serde::ser::{SerializeMap, SerializeSeq, SerializeTuple};

        match self {
            Value::None => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => {
                if let Ok(small) = i64::try_from(i) {
                    serializer.serialize_i64(small)
                } else if let Ok(unsigned) = u64::try_from(i) {
                    serializer.serialize_u64(unsigned)
                } else {
                    serializer.serialize_newtype_struct(BIGINT_TOKEN, &i.to_string())
                }
            }
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Complex(c) => serializer.serialize_newtype_struct(COMPLEX_TOKEN, &(c.re, c.im)),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Tuple(items) => {
                let mut tuple = serializer.serialize_tuple(items.len())?;
                for item in items {
                    tuple.serialize_element(item)?;
                }
                tuple.end()
            }
            Value::Set(set) => serializer.serialize_newtype_struct(SET_TOKEN, set),
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid serpent value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::Str(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::Str(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Value, E> {
                Ok(Value::Bytes(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Value, E> {
                Ok(Value::Bytes(value))
            }

            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::None)
            }

            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::List(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = SerpentMap::new();
                while let Some((key, value)) = map.next_entry::<Value, Value>()? {
                    values.insert(key, value);
                }
                Ok(Value::Map(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// TryFrom implementations for extracting values from Value
impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match &value {
            Value::Int(i) => i64::try_from(i)
                .map_err(|_| crate::Error::custom(format!("integer {} does not fit in i64", i))),
            _ => Err(crate::Error::type_mismatch("int", value.kind_name())),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| crate::Error::type_mismatch("float", value.kind_name()))
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::type_mismatch("bool", value.kind_name())),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            _ => Err(crate::Error::type_mismatch("str", value.kind_name())),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = crate::Error;

    /// Accepts raw bytes or the base64 byte mapping, like [`crate::decode_bytes`].
    fn try_from(value: Value) -> crate::Result<Self> {
        crate::bytes::decode_bytes(&value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(BigInt::from(value))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Int(value)
    }
}

impl From<Complex> for Value {
    fn from(value: Complex) -> Self {
        Value::Complex(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<SerpentMap> for Value {
    fn from(value: SerpentMap) -> Self {
        Value::Map(value)
    }
}

impl From<SerpentSet> for Value {
    fn from(value: SerpentSet) -> Self {
        Value::Set(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

// Extended types: written as strings, or float seconds for durations.

/// Keeps every digit and the scale: `1.10` stays `'1.10'`.
impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Str(value.hyphenated().to_string())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value
where
    Tz::Offset: fmt::Display,
{
    fn from(value: DateTime<Tz>) -> Self {
        Value::Str(value.to_rfc3339())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Str(value.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Str(value.format("%Y-%m-%d").to_string())
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Str(value.format("%H:%M:%S%.f").to_string())
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Value::Float(value.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_nan_equals_nan() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(-f64::NAN));
        assert_eq!(hash_of(&Value::Float(f64::NAN)), hash_of(&Value::Float(-f64::NAN)));
    }

    #[test]
    fn test_signed_zero_hashes_alike() {
        assert_eq!(Value::Float(0.0), Value::Float(-0.0));
        assert_eq!(hash_of(&Value::Float(0.0)), hash_of(&Value::Float(-0.0)));
    }

    #[test]
    fn test_list_and_tuple_differ() {
        let items = vec![Value::from(1)];
        assert_ne!(Value::List(items.clone()), Value::Tuple(items));
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let mut a = SerpentMap::new();
        a.insert(Value::from(1), Value::from("one"));
        a.insert(Value::from(2), Value::from("two"));
        let mut b = SerpentMap::new();
        b.insert(Value::from(2), Value::from("two"));
        b.insert(Value::from(1), Value::from("one"));
        assert_eq!(Value::Map(a.clone()), Value::Map(b.clone()));
        assert_eq!(hash_of(&Value::Map(a)), hash_of(&Value::Map(b)));
    }

    #[test]
    fn test_tagged_puts_class_first() {
        let mut fields = SerpentMap::new();
        fields.insert(Value::from("attr"), Value::from(1));
        fields.insert(Value::from("__class__"), Value::from("Stale"));
        let obj = Value::tagged("Fresh", fields);
        let map = obj.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().next(), Some(&Value::from("__class__")));
        assert_eq!(obj.class_name(), Some("Fresh"));
    }

    #[test]
    fn test_tryfrom_primitives() {
        assert_eq!(i64::try_from(Value::from(42)).unwrap(), 42);
        assert!(i64::try_from(Value::from(u128::MAX)).is_err());
        assert_eq!(f64::try_from(Value::from(2)).unwrap(), 2.0);
        assert!(bool::try_from(Value::from(1)).is_err());
        assert_eq!(String::try_from(Value::from("x")).unwrap(), "x");
        assert!(matches!(
            String::try_from(Value::None),
            Err(crate::Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_extended_conversions() {
        let id = Uuid::nil();
        assert_eq!(
            Value::from(id),
            Value::from("00000000-0000-0000-0000-000000000000")
        );
        let date = NaiveDate::from_ymd_opt(2013, 1, 20).unwrap();
        assert_eq!(Value::from(date), Value::from("2013-01-20"));
        let dt = date.and_hms_micro_opt(23, 59, 45, 999_888).unwrap();
        assert_eq!(Value::from(dt), Value::from("2013-01-20T23:59:45.999888"));
        assert_eq!(
            Value::from(Duration::from_secs(12345)),
            Value::Float(12345.0)
        );
        let price: BigDecimal = "1.10".parse().unwrap();
        assert_eq!(Value::from(price), Value::from("1.10"));
    }

    #[test]
    fn test_hashable_allowlist() {
        assert!(Value::from(1.5).is_hashable());
        assert!(Value::Complex(Complex::new(1.0, 2.0)).is_hashable());
        assert!(!Value::None.is_hashable());
        assert!(!Value::Map(SerpentMap::new()).is_hashable());
        assert!(!Value::bytes(vec![1u8]).is_hashable());
    }
}
