//! Serpent serialization.
//!
//! This module provides the [`Serializer`], which writes any `T: Serialize`
//! as serpent text in two steps:
//!
//! 1. **Dispatch** walks the value through serde and reduces it to a [`Value`]
//!    tree, consulting the type registry, tracking open shared references for
//!    cycle detection and counting depth.
//! 2. **Formatting** writes that tree as text (see [`crate::grammar`]).
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_serpent::{to_string, to_string_pretty};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, y: i32 }
//!
//! let data = Data { x: 1, y: 2 };
//!
//! let compact = to_string(&data).unwrap();
//! assert!(compact.ends_with("{'__class__':'Data','x':1,'y':2}"));
//!
//! let pretty = to_string_pretty(&data).unwrap();
//! ```
//!
//! ## Direct Serializer Usage
//!
//! A [`Serializer`] snapshots the registry once and can be reused for many
//! writes with the same configuration:
//!
//! ```rust
//! use serde_serpent::{Serializer, SerpentOptions};
//!
//! let serializer = Serializer::new(SerpentOptions::new());
//! let text = serializer.to_string(&vec![1, 2, 3]).unwrap();
//! assert_eq!(text, "# serpent utf-8 python3.2\n[1,2,3]");
//! ```
//!
//! ## Shape mapping
//!
//! | Rust | Serpent |
//! |------|---------|
//! | `()`, `None` | `None` |
//! | sequences | list |
//! | tuples, tuple structs | tuple |
//! | maps | dict |
//! | structs | `{'__class__':'Name', field: value, ...}` |
//! | unit structs | `{'__class__':'Name'}` |
//! | newtype structs | the inner value |
//! | unit variants | the variant ordinal |
//! | other variants | `{'Variant': inner}` |
//! | `std::time::Duration` | float seconds |
//! | `&[u8]` via `serialize_bytes` | byte payload |

use crate::registry::{class_name, TypeContext, TypeInfo, TypeKind};
use crate::{Complex, Error, Registry, Result, SerpentMap, SerpentOptions, SerpentSet, Value};
use num_bigint::BigInt;
use serde::{ser, Serialize};
use std::cell::Cell;

pub(crate) const BIGINT_TOKEN: &str = "$serde_serpent::private::BigInt";
pub(crate) const COMPLEX_TOKEN: &str = "$serde_serpent::private::Complex";
pub(crate) const SET_TOKEN: &str = "$serde_serpent::private::Set";
pub(crate) const IDENTITY_TOKEN: &str = "$serde_serpent::private::Identity";
pub(crate) const OBJECT_TOKEN: &str = "$serde_serpent::private::Object";

const EXCEPTION_KEY: &str = "__exception__";

thread_local! {
    static ACTIVE_WRITES: Cell<usize> = const { Cell::new(0) };
}

/// Whether a serpent write is running on this thread.
///
/// [`Shared`](crate::Shared) only reports its identity then, and serializes
/// as its plain value everywhere else.
pub(crate) fn write_in_progress() -> bool {
    ACTIVE_WRITES.with(|n| n.get() > 0)
}

struct ActiveWrite;

impl ActiveWrite {
    fn enter() -> Self {
        ACTIVE_WRITES.with(|n| n.set(n.get() + 1));
        ActiveWrite
    }
}

impl Drop for ActiveWrite {
    fn drop(&mut self) {
        ACTIVE_WRITES.with(|n| n.set(n.get().saturating_sub(1)));
    }
}

/// The serpent serializer.
///
/// Holds the options and a registry snapshot taken at construction.
pub struct Serializer {
    options: SerpentOptions,
    registry: Registry,
}

impl Serializer {
    /// Creates a serializer; the registry is taken from `options`, or
    /// snapshotted from the process-wide registry.
    pub fn new(options: SerpentOptions) -> Self {
        let registry = options.registry.clone().unwrap_or_else(Registry::global);
        Serializer { options, registry }
    }

    pub fn options(&self) -> &SerpentOptions {
        &self.options
    }

    /// Reduces `value` to a [`Value`] tree without formatting it.
    ///
    /// # Errors
    ///
    /// Fails on circular shared references, excessive nesting, unhashable
    /// dict keys or set elements, and objects without state.
    pub fn to_value<T>(&self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let _active = ActiveWrite::enter();
        let mut ctx = Context::new(&self.options, &self.registry);
        value.serialize(ValueSerializer { ctx: &mut ctx })
    }

    /// Writes `value` as a serpent document, header line included.
    ///
    /// # Errors
    ///
    /// Everything [`Serializer::to_value`] rejects, plus NaN dict keys.
    pub fn to_string<T>(&self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        let tree = self.to_value(value)?;
        crate::format::write_document(&tree, &self.options)
    }
}

/// Per-write dispatch state.
struct Context<'a> {
    options: &'a SerpentOptions,
    registry: &'a Registry,
    /// Kinds of the containers currently open, outermost first.
    kinds: Vec<&'static str>,
    /// Shared identities being written: address and the `kinds` index their
    /// content opened at.
    open: Vec<(usize, usize)>,
    identity_pending: bool,
    /// Kind name for the next container opened, set by wrapper tokens.
    kind_override: Option<&'static str>,
}

impl<'a> Context<'a> {
    fn new(options: &'a SerpentOptions, registry: &'a Registry) -> Self {
        Context {
            options,
            registry,
            kinds: Vec::new(),
            open: Vec::new(),
            identity_pending: false,
            kind_override: None,
        }
    }

    /// Serializes an internal payload outside the depth and identity tracking.
    fn scratch<T>(&self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut scratch = Context::new(self.options, self.registry);
        value.serialize(ValueSerializer { ctx: &mut scratch })
    }

    /// Serializes an element of the innermost open container.
    fn child<T>(&mut self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        if self.kinds.len() > self.options.max_depth {
            return Err(Error::NestingTooDeep {
                limit: self.options.max_depth,
            });
        }
        value.serialize(ValueSerializer { ctx: self })
    }

    fn key<T>(&mut self, key: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let key = self.child(key)?;
        if key.is_hashable() {
            Ok(key)
        } else {
            Err(Error::non_hashable(key.kind_name()))
        }
    }

    fn open(&mut self, kind: &'static str) {
        let kind = self.kind_override.take().unwrap_or(kind);
        self.kinds.push(kind);
    }

    fn close(&mut self, count: usize) {
        let keep = self.kinds.len().saturating_sub(count);
        self.kinds.truncate(keep);
    }

    fn qualify(&self) -> bool {
        self.options.module_in_classname
    }

    /// Hands the natural conversion to the first matching registration.
    fn dispatch(&self, info: TypeInfo<'_>, natural: Value) -> Result<Value> {
        let registry: &'a Registry = self.registry;
        match registry.lookup(&info) {
            Some(handler) => {
                let ctx = TypeContext {
                    info,
                    options: self.options,
                };
                handler(natural, &ctx)
            }
            None => Ok(natural),
        }
    }
}

fn info<'n>(name: &'n str, kind: TypeKind) -> TypeInfo<'n> {
    TypeInfo {
        name,
        variant: None,
        variant_index: None,
        kind,
    }
}

fn variant_info<'n>(name: &'n str, index: u32, variant: &'n str, kind: TypeKind) -> TypeInfo<'n> {
    TypeInfo {
        name,
        variant: Some(variant),
        variant_index: Some(index),
        kind,
    }
}

fn single_entry(key: &str, value: Value) -> Value {
    let mut map = SerpentMap::with_capacity(1);
    map.insert(Value::from(key), value);
    Value::Map(map)
}

/// Converts one value into a [`Value`] within a write.
struct ValueSerializer<'s, 'a> {
    ctx: &'s mut Context<'a>,
}

impl<'s, 'a> ser::Serializer for ValueSerializer<'s, 'a> {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec<'s, 'a>;
    type SerializeTuple = SerializeVec<'s, 'a>;
    type SerializeTupleStruct = SerializeVec<'s, 'a>;
    type SerializeTupleVariant = SerializeVec<'s, 'a>;
    type SerializeMap = SerializeMap<'s, 'a>;
    type SerializeStruct = SerializeMap<'s, 'a>;
    type SerializeStructVariant = SerializeMap<'s, 'a>;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::None)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        let natural = Value::tagged(class_name(name, self.ctx.qualify()), SerpentMap::new());
        self.ctx.dispatch(info(name, TypeKind::UnitStruct), natural)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        let info = variant_info(name, variant_index, variant, TypeKind::UnitVariant);
        self.ctx.dispatch(info, Value::from(variant))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        match name {
            BIGINT_TOKEN => {
                let digits = self.ctx.scratch(value)?;
                digits
                    .as_str()
                    .and_then(|s| s.parse::<BigInt>().ok())
                    .map(Value::Int)
                    .ok_or_else(|| Error::custom("invalid big integer payload"))
            }
            COMPLEX_TOKEN => {
                let parts = self.ctx.scratch(value)?;
                match parts.as_slice() {
                    Some([re, im]) => match (re.as_f64(), im.as_f64()) {
                        (Some(re), Some(im)) => Ok(Value::Complex(Complex::new(re, im))),
                        _ => Err(Error::custom("invalid complex payload")),
                    },
                    _ => Err(Error::custom("invalid complex payload")),
                }
            }
            SET_TOKEN => {
                self.ctx.kind_override = Some("set");
                let items = value.serialize(ValueSerializer { ctx: &mut *self.ctx });
                self.ctx.kind_override = None;
                let items = match items? {
                    Value::List(items) | Value::Tuple(items) => items,
                    other => return Err(Error::type_mismatch("set elements", other.kind_name())),
                };
                let mut set = SerpentSet::with_capacity(items.len());
                for item in items {
                    if !item.is_hashable() {
                        return Err(Error::non_hashable(item.kind_name()));
                    }
                    set.insert(item);
                }
                Ok(Value::Set(set))
            }
            IDENTITY_TOKEN => {
                self.ctx.identity_pending = true;
                let result = value.serialize(ValueSerializer { ctx: &mut *self.ctx });
                self.ctx.identity_pending = false;
                result
            }
            OBJECT_TOKEN => serialize_object_state(self.ctx, value),
            _ => {
                let natural = value.serialize(ValueSerializer { ctx: &mut *self.ctx })?;
                self.ctx
                    .dispatch(info(name, TypeKind::NewtypeStruct), natural)
            }
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        self.ctx.open("dict");
        let inner = self.ctx.child(value);
        self.ctx.close(1);
        let natural = single_entry(variant, inner?);
        let info = variant_info(name, variant_index, variant, TypeKind::NewtypeVariant);
        self.ctx.dispatch(info, natural)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec<'s, 'a>> {
        Ok(SerializeVec::open(self.ctx, SeqShape::List, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec<'s, 'a>> {
        if std::mem::take(&mut self.ctx.identity_pending) {
            return Ok(SerializeVec::identity(self.ctx));
        }
        Ok(SerializeVec::open(self.ctx, SeqShape::Tuple, len))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<SerializeVec<'s, 'a>> {
        Ok(SerializeVec::open(self.ctx, SeqShape::TupleStruct { name }, len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec<'s, 'a>> {
        self.ctx.open("dict");
        let shape = SeqShape::TupleVariant {
            name,
            variant_index,
            variant,
        };
        Ok(SerializeVec::open(self.ctx, shape, len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap<'s, 'a>> {
        Ok(SerializeMap::open(self.ctx, MapShape::Map, len.unwrap_or(0)))
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<SerializeMap<'s, 'a>> {
        Ok(SerializeMap::open(self.ctx, MapShape::Struct { name }, len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap<'s, 'a>> {
        self.ctx.open("dict");
        let shape = MapShape::StructVariant {
            name,
            variant_index,
            variant,
        };
        Ok(SerializeMap::open(self.ctx, shape, len))
    }
}

/// Finishes a value written through [`crate::ObjectState`].
fn serialize_object_state<T>(ctx: &mut Context<'_>, value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    ctx.kind_override = Some("class");
    let state = value.serialize(ValueSerializer { ctx: &mut *ctx });
    ctx.kind_override = None;
    match state {
        Ok(Value::Map(state)) => {
            let class = state
                .get_str(crate::CLASS_KEY)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let kind = match state.get_str(EXCEPTION_KEY) {
                Some(Value::Bool(true)) => TypeKind::Exception,
                _ => TypeKind::Object,
            };
            let natural = Value::tagged(class_name(&class, ctx.qualify()), state);
            ctx.dispatch(info(&class, kind), natural)
        }
        Ok(other) => Err(Error::type_mismatch("object state", other.kind_name())),
        Err(Error::UnsupportedType(class)) => {
            // no state mapping: only a registration can write it
            let info = info(&class, TypeKind::Object);
            if ctx.registry.lookup(&info).is_none() {
                return Err(Error::UnsupportedType(class));
            }
            let natural = Value::tagged(class_name(&class, ctx.qualify()), SerpentMap::new());
            ctx.dispatch(info, natural)
        }
        Err(err) => Err(err),
    }
}

#[derive(Clone, Copy)]
enum SeqShape {
    List,
    Tuple,
    TupleStruct {
        name: &'static str,
    },
    TupleVariant {
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    },
    /// `(address, content)` emitted by [`crate::Shared`].
    Identity,
}

struct SerializeVec<'s, 'a> {
    ctx: &'s mut Context<'a>,
    shape: SeqShape,
    vec: Vec<Value>,
    address: Option<usize>,
}

impl<'s, 'a> SerializeVec<'s, 'a> {
    fn open(ctx: &'s mut Context<'a>, shape: SeqShape, len: usize) -> Self {
        ctx.open(match shape {
            SeqShape::List => "list",
            _ => "tuple",
        });
        SerializeVec {
            ctx,
            shape,
            vec: Vec::with_capacity(len),
            address: None,
        }
    }

    fn identity(ctx: &'s mut Context<'a>) -> Self {
        SerializeVec {
            ctx,
            shape: SeqShape::Identity,
            vec: Vec::with_capacity(1),
            address: None,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let SeqShape::Identity = self.shape {
            return self.push_identity(value);
        }
        let item = self.ctx.child(value)?;
        self.vec.push(item);
        Ok(())
    }

    fn push_identity<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let Some(address) = self.address else {
            let address = value.serialize(ValueSerializer { ctx: &mut *self.ctx })?;
            self.address = address.as_bigint().and_then(|a| usize::try_from(a).ok());
            return match self.address {
                Some(_) => Ok(()),
                None => Err(Error::custom("invalid shared reference address")),
            };
        };
        if let Some(&(_, index)) = self.ctx.open.iter().find(|(open, _)| *open == address) {
            let kind = self.ctx.kinds.get(index).copied().unwrap_or("object");
            tracing::debug!(kind, "rejected circular reference");
            return Err(Error::circular(kind));
        }
        let frame = (address, self.ctx.kinds.len());
        self.ctx.open.push(frame);
        let content = value.serialize(ValueSerializer { ctx: &mut *self.ctx });
        self.ctx.open.pop();
        self.vec.push(content?);
        Ok(())
    }

    fn finish(self) -> Result<Value> {
        let SerializeVec {
            ctx, shape, mut vec, ..
        } = self;
        match shape {
            SeqShape::Identity => vec
                .pop()
                .ok_or_else(|| Error::custom("shared reference without content")),
            SeqShape::List => {
                ctx.close(1);
                Ok(Value::List(vec))
            }
            SeqShape::Tuple => {
                ctx.close(1);
                Ok(Value::Tuple(vec))
            }
            SeqShape::TupleStruct { name } => {
                ctx.close(1);
                ctx.dispatch(info(name, TypeKind::TupleStruct), Value::Tuple(vec))
            }
            SeqShape::TupleVariant {
                name,
                variant_index,
                variant,
            } => {
                // the tuple and its enclosing variant dict
                ctx.close(2);
                let natural = single_entry(variant, Value::Tuple(vec));
                let info = variant_info(name, variant_index, variant, TypeKind::TupleVariant);
                ctx.dispatch(info, natural)
            }
        }
    }
}

impl ser::SerializeSeq for SerializeVec<'_, '_> {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTuple for SerializeVec<'_, '_> {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SerializeVec<'_, '_> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SerializeVec<'_, '_> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

#[derive(Clone, Copy)]
enum MapShape {
    Map,
    Struct {
        name: &'static str,
    },
    StructVariant {
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    },
}

struct SerializeMap<'s, 'a> {
    ctx: &'s mut Context<'a>,
    shape: MapShape,
    map: SerpentMap,
    current_key: Option<Value>,
}

impl<'s, 'a> SerializeMap<'s, 'a> {
    fn open(ctx: &'s mut Context<'a>, shape: MapShape, len: usize) -> Self {
        ctx.open(match shape {
            MapShape::Struct { .. } => "class",
            _ => "dict",
        });
        SerializeMap {
            ctx,
            shape,
            map: SerpentMap::with_capacity(len),
            current_key: None,
        }
    }

    fn field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = self.ctx.child(value)?;
        self.map.insert(Value::from(key), value);
        Ok(())
    }

    fn finish(self) -> Result<Value> {
        let SerializeMap { ctx, shape, map, .. } = self;
        match shape {
            MapShape::Map => {
                ctx.close(1);
                Ok(Value::Map(map))
            }
            MapShape::Struct { name } => {
                ctx.close(1);
                let natural = match duration_seconds(name, &map) {
                    Some(seconds) => Value::Float(seconds),
                    None => Value::tagged(class_name(name, ctx.qualify()), map),
                };
                ctx.dispatch(info(name, TypeKind::Struct), natural)
            }
            MapShape::StructVariant {
                name,
                variant_index,
                variant,
            } => {
                ctx.close(2);
                let natural = single_entry(variant, Value::Map(map));
                let info = variant_info(name, variant_index, variant, TypeKind::StructVariant);
                ctx.dispatch(info, natural)
            }
        }
    }
}

/// `std::time::Duration` serializes as `Duration { secs, nanos }`.
fn duration_seconds(name: &str, fields: &SerpentMap) -> Option<f64> {
    if name != "Duration" || fields.len() != 2 {
        return None;
    }
    let secs = fields.get_str("secs")?.as_bigint()?;
    let nanos = fields.get_str("nanos")?.as_i64()?;
    let secs = u64::try_from(secs).ok()?;
    Some(std::time::Duration::new(secs, u32::try_from(nanos).ok()?).as_secs_f64())
}

impl ser::SerializeMap for SerializeMap<'_, '_> {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(self.ctx.key(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        let value = self.ctx.child(value)?;
        self.map.insert(key, value);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStruct for SerializeMap<'_, '_> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for SerializeMap<'_, '_> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}
