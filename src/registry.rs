//! Type registry: ordered overrides consulted before default dispatch.
//!
//! A [`Registry`] maps [`TypeMatcher`]s to handlers. While a value is being
//! converted, every named serde shape (struct, enum variant, explicit object,
//! exception) is described by a [`TypeInfo`]; the first registration whose
//! matcher accepts it, in insertion order, receives the value's default
//! conversion and returns the [`Value`] to write instead.
//!
//! Registrations are processed in insertion order, so a general matcher
//! registered first shadows a more specific one registered later.
//! Re-registering an existing matcher replaces its handler in place.
//!
//! The process-wide registry is changed with [`register_type`] and
//! [`unregister_type`]. Each write snapshots it once at entry (an `Arc`
//! clone), so concurrent changes never affect a write in flight. A registry
//! can also be injected per call with
//! [`SerpentOptions::with_registry`](crate::SerpentOptions::with_registry).
//!
//! ## Built-in registrations
//!
//! 1. `KeysView`, `ValuesView`, `ItemsView`: written as a list
//! 2. `OrderedDict`: written as `{'__class__':'OrderedDict','items':[(k,v),...]}`
//! 3. any unit enum variant: written as its ordinal
//!
//! ## Examples
//!
//! ```rust
//! use serde::Serialize;
//! use serde_serpent::{to_string_with_options, Registry, SerpentOptions, Value};
//!
//! #[derive(Serialize)]
//! struct Secret { token: String }
//!
//! let mut registry = Registry::default();
//! registry.register("Secret", |_natural, _ctx| Ok(Value::from("<redacted>")));
//!
//! let options = SerpentOptions::new().with_registry(registry);
//! let text = to_string_with_options(&Secret { token: "hunter2".into() }, options).unwrap();
//! assert!(text.ends_with("'<redacted>'"));
//! ```

use crate::{Result, SerpentMap, SerpentOptions, Value};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// The serde shape of a value reaching the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    UnitStruct,
    NewtypeStruct,
    TupleStruct,
    Struct,
    UnitVariant,
    NewtypeVariant,
    TupleVariant,
    StructVariant,
    /// Matches any enum variant.
    Enum,
    /// A value written through [`crate::ObjectState`]; also matches exceptions.
    Object,
    Exception,
}

impl TypeKind {
    #[must_use]
    pub const fn is_variant(self) -> bool {
        matches!(
            self,
            TypeKind::UnitVariant
                | TypeKind::NewtypeVariant
                | TypeKind::TupleVariant
                | TypeKind::StructVariant
        )
    }

    /// Returns `true` if a matcher for `self` accepts a value of kind `actual`.
    #[must_use]
    pub fn covers(self, actual: TypeKind) -> bool {
        self == actual
            || (self == TypeKind::Enum && actual.is_variant())
            || (self == TypeKind::Object && actual == TypeKind::Exception)
    }
}

/// Selects the values a registration applies to.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{TypeKind, TypeMatcher};
///
/// let by_name = TypeMatcher::from("Point");
/// let by_variant = TypeMatcher::from("Shape::Circle");
/// let every_exception = TypeMatcher::from(TypeKind::Exception);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeMatcher {
    /// A type name: the full name, its last path segment, or `Enum::Variant`.
    Named(Cow<'static, str>),
    Kind(TypeKind),
}

impl TypeMatcher {
    #[must_use]
    pub fn matches(&self, info: &TypeInfo<'_>) -> bool {
        match self {
            TypeMatcher::Named(name) => {
                let name = name.as_ref();
                if info.name == name || short_name(info.name) == name {
                    return true;
                }
                match info.variant {
                    Some(variant) => name
                        .strip_prefix(info.name)
                        .and_then(|rest| rest.strip_prefix("::"))
                        .map_or(false, |rest| rest == variant),
                    None => false,
                }
            }
            TypeMatcher::Kind(kind) => kind.covers(info.kind),
        }
    }
}

impl From<&'static str> for TypeMatcher {
    fn from(name: &'static str) -> Self {
        TypeMatcher::Named(Cow::Borrowed(name))
    }
}

impl From<String> for TypeMatcher {
    fn from(name: String) -> Self {
        TypeMatcher::Named(Cow::Owned(name))
    }
}

impl From<TypeKind> for TypeMatcher {
    fn from(kind: TypeKind) -> Self {
        TypeMatcher::Kind(kind)
    }
}

/// What the dispatcher knows about a value when it consults the registry.
#[derive(Clone, Copy, Debug)]
pub struct TypeInfo<'a> {
    /// The serde container name, or the class name of an explicit object.
    pub name: &'a str,
    pub variant: Option<&'a str>,
    pub variant_index: Option<u32>,
    pub kind: TypeKind,
}

/// Passed to handlers alongside the value's default conversion.
pub struct TypeContext<'a> {
    pub info: TypeInfo<'a>,
    pub options: &'a SerpentOptions,
}

impl TypeContext<'_> {
    /// The class name as configured: qualified or last segment only.
    #[must_use]
    pub fn class_name(&self) -> String {
        class_name(self.info.name, self.options.module_in_classname)
    }
}

/// A registered override.
pub type Handler = Arc<dyn Fn(Value, &TypeContext<'_>) -> Result<Value> + Send + Sync>;

/// An ordered, copy-on-write set of type overrides.
///
/// Cloning is an `Arc` clone; mutation copies the table only when it is shared.
#[derive(Clone)]
pub struct Registry {
    handlers: Arc<IndexMap<TypeMatcher, Handler>>,
}

impl Default for Registry {
    /// A registry holding the built-in registrations.
    fn default() -> Self {
        let mut registry = Registry::empty();
        registry.register("KeysView", keys_view);
        registry.register("ValuesView", values_view);
        registry.register("ItemsView", items_view);
        registry.register("OrderedDict", ordered_dict);
        registry.register(TypeKind::UnitVariant, enum_ordinal);
        registry
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.handlers.keys()).finish()
    }
}

impl Registry {
    /// A registry with no registrations at all.
    #[must_use]
    pub fn empty() -> Self {
        Registry {
            handlers: Arc::new(IndexMap::new()),
        }
    }

    /// Adds a handler, or replaces the handler of an existing matcher in place.
    pub fn register<M, F>(&mut self, matcher: M, handler: F)
    where
        M: Into<TypeMatcher>,
        F: Fn(Value, &TypeContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        let matcher = matcher.into();
        tracing::debug!(?matcher, "registering serpent type handler");
        Arc::make_mut(&mut self.handlers).insert(matcher, Arc::new(handler));
    }

    /// Removes a registration; returns `false` if the matcher was not registered.
    pub fn unregister<M: Into<TypeMatcher>>(&mut self, matcher: M) -> bool {
        let matcher = matcher.into();
        let removed = Arc::make_mut(&mut self.handlers)
            .shift_remove(&matcher)
            .is_some();
        tracing::debug!(?matcher, removed, "unregistering serpent type handler");
        removed
    }

    /// Returns the first handler, in insertion order, whose matcher accepts `info`.
    #[must_use]
    pub fn lookup(&self, info: &TypeInfo<'_>) -> Option<&Handler> {
        self.handlers
            .iter()
            .find(|(matcher, _)| matcher.matches(info))
            .map(|(_, handler)| handler)
    }

    /// The registered matchers in precedence order.
    pub fn matchers(&self) -> impl Iterator<Item = &TypeMatcher> {
        self.handlers.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// A snapshot of the process-wide registry.
    #[must_use]
    pub fn global() -> Registry {
        global_lock()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn global_lock() -> &'static RwLock<Registry> {
    static GLOBAL: OnceLock<RwLock<Registry>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(Registry::default()))
}

/// Registers a handler in the process-wide registry.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_serpent::{register_type, to_string, unregister_type, Value};
///
/// #[derive(Serialize)]
/// struct Celsius(f64);
///
/// register_type("Celsius", |natural, _ctx| {
///     Ok(Value::from(format!("{} C", natural.as_f64().unwrap_or_default())))
/// });
/// assert!(to_string(&Celsius(21.5)).unwrap().ends_with("'21.5 C'"));
/// assert!(unregister_type("Celsius"));
/// ```
pub fn register_type<M, F>(matcher: M, handler: F)
where
    M: Into<TypeMatcher>,
    F: Fn(Value, &TypeContext<'_>) -> Result<Value> + Send + Sync + 'static,
{
    global_lock()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(matcher, handler);
}

/// Removes a registration from the process-wide registry.
pub fn unregister_type<M: Into<TypeMatcher>>(matcher: M) -> bool {
    global_lock()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .unregister(matcher)
}

/// Restores the process-wide registry to the built-in registrations.
pub fn reset_registry() {
    *global_lock().write().unwrap_or_else(PoisonError::into_inner) = Registry::default();
}

/// Formats a type path as a class name: generics dropped, and either the last
/// segment alone or the whole path with `.` separators.
pub(crate) fn class_name(path: &str, qualify: bool) -> String {
    let path = path.split('<').next().unwrap_or(path).trim();
    if qualify {
        path.replace("::", ".")
    } else {
        short_name(path).to_string()
    }
}

fn short_name(path: &str) -> &str {
    let path = path.split('<').next().unwrap_or(path);
    let tail = path.rsplit("::").next().unwrap_or(path);
    tail.rsplit('.').next().unwrap_or(tail)
}

fn keys_view(natural: Value, _ctx: &TypeContext<'_>) -> Result<Value> {
    Ok(match natural {
        Value::Map(map) => Value::List(map.into_iter().map(|(k, _)| k).collect()),
        other => other,
    })
}

fn values_view(natural: Value, _ctx: &TypeContext<'_>) -> Result<Value> {
    Ok(match natural {
        Value::Map(map) => Value::List(map.into_iter().map(|(_, v)| v).collect()),
        other => other,
    })
}

fn items_view(natural: Value, _ctx: &TypeContext<'_>) -> Result<Value> {
    Ok(match natural {
        Value::Map(map) => Value::List(
            map.into_iter()
                .map(|(k, v)| Value::Tuple(vec![k, v]))
                .collect(),
        ),
        other => other,
    })
}

fn ordered_dict(natural: Value, ctx: &TypeContext<'_>) -> Result<Value> {
    let Value::Map(map) = natural else {
        return Ok(natural);
    };
    let class = if ctx.options.module_in_classname {
        "collections.OrderedDict"
    } else {
        "OrderedDict"
    };
    let items = map
        .into_iter()
        .map(|(k, v)| Value::Tuple(vec![k, v]))
        .collect();
    let mut fields = SerpentMap::with_capacity(1);
    fields.insert(Value::from("items"), Value::List(items));
    Ok(Value::tagged(class, fields))
}

fn enum_ordinal(natural: Value, ctx: &TypeContext<'_>) -> Result<Value> {
    Ok(ctx.info.variant_index.map_or(natural, Value::from))
}
