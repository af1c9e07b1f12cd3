//! Wrapper types that select a serpent form serde has no shape for.
//!
//! - [`Set`]: write any sequence as a set literal
//! - [`OrderedDict`]: an insertion-ordered mapping, written with its class tag
//! - [`KeysView`], [`ValuesView`], [`ItemsView`]: views of a mapping, written as lists
//! - [`Shared`]: a shared, mutable reference whose identity is tracked for cycle detection
//!
//! ## Examples
//!
//! ```rust
//! use serde_serpent::{to_string, Set};
//! use std::collections::BTreeSet;
//!
//! let tags: BTreeSet<&str> = ["ops", "admin"].into_iter().collect();
//!
//! // a plain set is a sequence to serde, and is written as a list
//! assert!(to_string(&tags).unwrap().ends_with("['admin','ops']"));
//! assert!(to_string(&Set(&tags)).unwrap().ends_with("{'admin','ops'}"));
//! ```

use crate::ser::{IDENTITY_TOKEN, SET_TOKEN};
use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::rc::Rc;

/// Writes the wrapped sequence as a set literal.
///
/// Reads back transparently: any sequence type can be filled from a set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Set<T>(pub T);

impl<T: Serialize> Serialize for Set<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(SET_TOKEN, &self.0)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Set<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Set)
    }
}

/// An insertion-ordered mapping.
///
/// Written through the `OrderedDict` registration as
/// `{'__class__':'OrderedDict','items':[(k,v),...]}`, which keeps the order
/// through readers that do not preserve dict order. Reads back from that form
/// or from a plain dict.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{from_str, to_string, OrderedDict};
///
/// let mut dict = OrderedDict::new();
/// dict.insert("b".to_string(), 2);
/// dict.insert("a".to_string(), 1);
///
/// let text = to_string(&dict).unwrap();
/// assert!(text.ends_with("{'__class__':'OrderedDict','items':[('b',2),('a',1)]}"));
///
/// let back: OrderedDict<String, i32> = from_str(&text).unwrap();
/// assert_eq!(back, dict);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderedDict<K: Hash + Eq, V>(pub IndexMap<K, V>);

impl<K: Hash + Eq, V> Default for OrderedDict<K, V> {
    fn default() -> Self {
        OrderedDict(IndexMap::new())
    }
}

impl<K: Hash + Eq, V> OrderedDict<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.0.insert(key, value)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
        self.0.iter()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for OrderedDict<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        OrderedDict(iter.into_iter().collect())
    }
}

/// Serializes an `IndexMap` as a map in its own order.
struct Entries<'a, K, V>(&'a IndexMap<K, V>);

impl<K: Serialize, V: Serialize> Serialize for Entries<'_, K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Hash + Eq + Serialize, V: Serialize> Serialize for OrderedDict<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct("OrderedDict", &Entries(&self.0))
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedDict<K, V>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        #[serde(bound(deserialize = "K: Deserialize<'de> + Hash + Eq, V: Deserialize<'de>"))]
        enum Repr<K, V> {
            Tagged {
                #[serde(rename = "__class__")]
                _class: String,
                items: Vec<(K, V)>,
            },
            Plain(PlainMap<K, V>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Tagged { items, .. } => items.into_iter().collect(),
            Repr::Plain(PlainMap(map)) => OrderedDict(map),
        })
    }
}

struct PlainMap<K, V>(IndexMap<K, V>);

impl<'de, K, V> Deserialize<'de> for PlainMap<K, V>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PlainVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K, V> Visitor<'de> for PlainVisitor<K, V>
        where
            K: Deserialize<'de> + Hash + Eq,
            V: Deserialize<'de>,
        {
            type Value = PlainMap<K, V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a dict")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry()? {
                    map.insert(key, value);
                }
                Ok(PlainMap(map))
            }
        }

        deserializer.deserialize_map(PlainVisitor(PhantomData))
    }
}

/// The keys of a mapping, written as a list.
#[derive(Clone, Copy, Debug)]
pub struct KeysView<'a, M: ?Sized>(pub &'a M);

/// The values of a mapping, written as a list.
#[derive(Clone, Copy, Debug)]
pub struct ValuesView<'a, M: ?Sized>(pub &'a M);

/// The `(key, value)` pairs of a mapping, written as a list of tuples.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{to_string, ItemsView};
/// use std::collections::BTreeMap;
///
/// let scores: BTreeMap<&str, i32> = [("ann", 3), ("bob", 5)].into_iter().collect();
/// assert!(to_string(&ItemsView(&scores)).unwrap().ends_with("[('ann',3),('bob',5)]"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ItemsView<'a, M: ?Sized>(pub &'a M);

macro_rules! impl_view {
    ($($view:ident),*) => {
        $(
            impl<M: ?Sized + Serialize> Serialize for $view<'_, M> {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_newtype_struct(stringify!($view), self.0)
                }
            }
        )*
    };
}

impl_view!(KeysView, ValuesView, ItemsView);

/// A shared, mutable value whose identity the writer tracks.
///
/// Plain Rust ownership cannot form a cycle, but `Rc<RefCell<_>>` can. Writing
/// a `Shared` that is reached again from inside itself fails with
/// [`Error::CircularReference`](crate::Error::CircularReference); the same
/// `Shared` appearing twice side by side is fine and is written twice.
/// Other serializers see only the wrapped value and get no cycle detection.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_serpent::{to_string, Shared};
///
/// #[derive(Serialize)]
/// struct Folder {
///     name: String,
///     parent: Option<Shared<Folder>>,
///     children: Vec<Shared<Folder>>,
/// }
///
/// let root = Shared::new(Folder { name: "root".into(), parent: None, children: vec![] });
/// let docs = Shared::new(Folder { name: "docs".into(), parent: Some(root.clone()), children: vec![] });
/// root.borrow_mut().children.push(docs.clone());
///
/// let err = to_string(&root).unwrap_err();
/// assert_eq!(err.to_string(), "Circular reference detected (class)");
/// # docs.borrow_mut().parent = None;
/// ```
#[derive(Debug, Default)]
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    /// # Panics
    ///
    /// Panics if the value is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// # Panics
    ///
    /// Panics if the value is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Returns `true` if both handles point at the same value.
    pub fn ptr_eq(&self, other: &Shared<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T> From<Rc<RefCell<T>>> for Shared<T> {
    fn from(inner: Rc<RefCell<T>>) -> Self {
        Shared(inner)
    }
}

impl<T: Serialize> Serialize for Shared<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let inner = self
            .0
            .try_borrow()
            .map_err(|_| S::Error::custom("shared value is mutably borrowed"))?;
        if crate::ser::write_in_progress() {
            serializer.serialize_newtype_struct(IDENTITY_TOKEN, &(self.address(), &*inner))
        } else {
            (*inner).serialize(serializer)
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Shared<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Shared::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{to_string_with_options, Error, Registry, SerpentOptions, Value};
    use std::collections::BTreeMap;

    fn body<T: Serialize>(value: &T) -> String {
        let options = SerpentOptions::new().with_registry(Registry::default());
        let header = options.header().len();
        to_string_with_options(value, options).unwrap()[header..].to_string()
    }

    #[derive(Serialize)]
    struct Node {
        name: &'static str,
        children: Vec<Shared<Node>>,
    }

    #[derive(Serialize)]
    #[serde(untagged)]
    enum Item {
        Leaf(i32),
        List(Shared<Vec<Item>>),
    }

    #[test]
    fn test_self_containing_list() {
        let list = Shared::new(vec![Item::Leaf(1)]);
        list.borrow_mut().push(Item::List(list.clone()));

        let err = to_string_with_options(&list, SerpentOptions::new()).unwrap_err();
        assert!(matches!(err, Error::CircularReference { ref kind } if kind == "list"));

        list.borrow_mut().clear();
    }

    #[test]
    fn test_cycle_through_struct() {
        let root = Shared::new(Node {
            name: "root",
            children: Vec::new(),
        });
        let child = Shared::new(Node {
            name: "child",
            children: vec![root.clone()],
        });
        root.borrow_mut().children.push(child);

        let err = to_string_with_options(&root, SerpentOptions::new()).unwrap_err();
        assert!(matches!(err, Error::CircularReference { ref kind } if kind == "class"));
        assert_eq!(err.to_string(), "Circular reference detected (class)");

        // break the cycle so the Rc pair can be dropped
        root.borrow_mut().children.clear();
    }

    #[test]
    fn test_diamond_is_allowed() {
        let leaf = Shared::new(Node {
            name: "leaf",
            children: Vec::new(),
        });
        let top = Node {
            name: "top",
            children: vec![leaf.clone(), leaf],
        };
        let text = body(&top);
        assert_eq!(text.matches("'leaf'").count(), 2);
    }

    #[test]
    fn test_other_serializers_see_the_plain_value() {
        let shared = Shared::new(vec![1, 2]);
        assert_eq!(serde_json::to_string(&shared).unwrap(), "[1,2]");
        let nested = vec![shared.clone(), shared];
        assert_eq!(serde_json::to_string(&nested).unwrap(), "[[1,2],[1,2]]");
        // a serpent write in between does not leak its identity tracking
        assert!(to_string_with_options(&nested, SerpentOptions::new()).is_ok());
        assert_eq!(serde_json::to_string(&nested).unwrap(), "[[1,2],[1,2]]");
    }

    #[test]
    fn test_mutably_borrowed_shared_is_an_error() {
        let shared = Shared::new(1);
        let _guard = shared.borrow_mut();
        assert!(to_string_with_options(&shared, SerpentOptions::new()).is_err());
    }

    #[test]
    fn test_views() {
        let map: BTreeMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
        assert_eq!(body(&KeysView(&map)), "[1,2]");
        assert_eq!(body(&ValuesView(&map)), "['one','two']");
        assert_eq!(body(&ItemsView(&map)), "[(1,'one'),(2,'two')]");
    }

    #[test]
    fn test_set_wrapper() {
        assert_eq!(body(&Set(vec![3, 1, 3])), "{3,1}");
        assert_eq!(body(&Set(Vec::<i32>::new())), "()");
    }

    #[test]
    fn test_ordered_dict_qualified() {
        let dict: OrderedDict<i32, i32> = [(2, 20), (1, 10)].into_iter().collect();
        let options = SerpentOptions::new()
            .with_module_in_classname(true)
            .with_registry(Registry::default());
        let text = to_string_with_options(&dict, options).unwrap();
        assert!(text.ends_with("{'__class__':'collections.OrderedDict','items':[(2,20),(1,10)]}"));
    }

    #[test]
    fn test_ordered_dict_from_plain_dict() {
        let dict: OrderedDict<String, i32> = crate::from_str("{'z':1,'a':2}").unwrap();
        let keys: Vec<_> = dict.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
