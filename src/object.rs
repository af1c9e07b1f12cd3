//! Objects with an explicit state mapping, and exception values.
//!
//! Derived `Serialize` impls already give every struct a state mapping (its
//! fields). [`ObjectState`] is for types whose written form should come from
//! code instead: a runtime class name, computed attributes, or no state at
//! all, in which case the write fails with [`Error::UnsupportedType`] unless a
//! registry handler covers the class.
//!
//! [`Error::UnsupportedType`]: crate::Error::UnsupportedType
//!
//! ## Examples
//!
//! ```rust
//! use serde::{Serialize, Serializer};
//! use serde_serpent::{serialize_object, to_string, ObjectState, SerpentMap, Value};
//! use std::borrow::Cow;
//!
//! struct Temperature { kelvin: f64 }
//!
//! impl ObjectState for Temperature {
//!     fn class_name(&self) -> Cow<'_, str> {
//!         Cow::Borrowed("physics.Temperature")
//!     }
//!
//!     fn get_state(&self) -> Option<SerpentMap> {
//!         let mut state = SerpentMap::new();
//!         state.insert(Value::from("celsius"), Value::from(self.kelvin - 273.15));
//!         Some(state)
//!     }
//! }
//!
//! impl Serialize for Temperature {
//!     fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
//!         serialize_object(self, serializer)
//!     }
//! }
//!
//! let text = to_string(&Temperature { kelvin: 300.0 }).unwrap();
//! assert!(text.contains("'__class__':'Temperature'"));
//! ```

use crate::error::UNSUPPORTED_MARKER;
use crate::ser::OBJECT_TOKEN;
use crate::{Error, SerpentMap, Value, CLASS_KEY};
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use std::borrow::Cow;

/// Explicit access to an object's class name and state mapping.
pub trait ObjectState {
    /// The class name; `::` or `.` separated paths are shortened to their
    /// last segment unless qualified class names are enabled.
    fn class_name(&self) -> Cow<'_, str>;

    /// The attributes to write, or `None` if the object has no state mapping.
    fn get_state(&self) -> Option<SerpentMap>;
}

/// Serializes an [`ObjectState`] implementor as a tagged object.
///
/// Intended as the body of a manual `Serialize` impl. Serializers other than
/// this crate's see a plain map with `__class__` first.
///
/// # Errors
///
/// Fails with an unsupported-type error when the object has no state and no
/// registration covers its class.
pub fn serialize_object<O, S>(object: &O, serializer: S) -> Result<S::Ok, S::Error>
where
    O: ?Sized + ObjectState,
    S: Serializer,
{
    let class = object.class_name();
    match object.get_state() {
        Some(state) => serializer.serialize_newtype_struct(
            OBJECT_TOKEN,
            &StateRepr {
                class: &class,
                state: &state,
            },
        ),
        None => serializer.serialize_newtype_struct(OBJECT_TOKEN, &Stateless(&class)),
    }
}

struct StateRepr<'a> {
    class: &'a str,
    state: &'a SerpentMap,
}

impl Serialize for StateRepr<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.state.len() + 1))?;
        map.serialize_entry(CLASS_KEY, self.class)?;
        for (key, value) in self.state {
            if key.as_str() != Some(CLASS_KEY) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

struct Stateless<'a>(&'a str);

impl Serialize for Stateless<'_> {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom(format_args!("{}{}", UNSUPPORTED_MARKER, self.0)))
    }
}

/// An error value, written as
/// `{'__class__':Name,'__exception__':True,'args':(...),'attributes':{...}}`.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{to_string, Exception};
///
/// let err = Exception::new("builtins.ZeroDivisionError").with_arg("division by zero");
/// assert!(to_string(&err).unwrap().ends_with(
///     "{'__class__':'ZeroDivisionError','__exception__':True,'args':('division by zero',),'attributes':{}}"
/// ));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Exception {
    pub class_name: String,
    pub args: Vec<Value>,
    pub attributes: SerpentMap,
}

impl Exception {
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Exception {
            class_name: class_name.into(),
            args: Vec::new(),
            attributes: SerpentMap::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(Value::from(name), value.into());
        self
    }

    /// Captures a Rust error: its type path as class name, its message as the
    /// only argument, and its source (if any) as the `source` attribute.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_serpent::Exception;
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    /// let exc = Exception::from_error(&io);
    /// assert!(exc.class_name.ends_with("Error"));
    /// assert_eq!(exc.args[0].as_str(), Some("no such file"));
    /// ```
    #[must_use]
    pub fn from_error<E>(err: &E) -> Self
    where
        E: ?Sized + std::error::Error,
    {
        let mut exc = Exception::new(std::any::type_name::<E>()).with_arg(err.to_string());
        if let Some(source) = err.source() {
            exc = exc.with_attribute("source", source.to_string());
        }
        exc
    }
}

impl ObjectState for Exception {
    fn class_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.class_name)
    }

    fn get_state(&self) -> Option<SerpentMap> {
        let mut state = SerpentMap::with_capacity(3);
        state.insert(Value::from("__exception__"), Value::Bool(true));
        state.insert(Value::from("args"), Value::Tuple(self.args.clone()));
        state.insert(Value::from("attributes"), Value::Map(self.attributes.clone()));
        Some(state)
    }
}

impl Serialize for Exception {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_object(self, serializer)
    }
}

impl TryFrom<Value> for Exception {
    type Error = Error;

    /// Recognizes the tagged exception shape produced by the writer.
    fn try_from(value: Value) -> crate::Result<Self> {
        let Value::Map(mut map) = value else {
            return Err(Error::type_mismatch("exception", value.kind_name()));
        };
        if map.get_str("__exception__") != Some(&Value::Bool(true)) {
            return Err(Error::type_mismatch("exception", "dict"));
        }
        let class_name = match map.remove(&Value::from(CLASS_KEY)) {
            Some(Value::Str(name)) => name,
            _ => return Err(Error::custom("exception without a class name")),
        };
        let args = match map.remove(&Value::from("args")) {
            Some(Value::Tuple(args)) | Some(Value::List(args)) => args,
            None => Vec::new(),
            Some(other) => return Err(Error::type_mismatch("tuple", other.kind_name())),
        };
        let attributes = match map.remove(&Value::from("attributes")) {
            Some(Value::Map(attributes)) => attributes,
            None => SerpentMap::new(),
            Some(other) => return Err(Error::type_mismatch("dict", other.kind_name())),
        };
        Ok(Exception {
            class_name,
            args,
            attributes,
        })
    }
}
