//! Ordered containers for serpent dicts and sets.
//!
//! This module provides [`SerpentMap`] and [`SerpentSet`], thin wrappers around
//! [`IndexMap`] and [`IndexSet`] keyed by [`Value`]. Both keep insertion order,
//! which is the order compact output uses; indented output sorts a copy.
//!
//! Equality is order-insensitive, as it is for the dict and set literals they
//! stand for.
//!
//! ## Examples
//!
//! ```rust
//! use serde_serpent::{SerpentMap, Value};
//!
//! let mut map = SerpentMap::new();
//! map.insert(Value::from("name"), Value::from("Alice"));
//! map.insert(Value::from(30), Value::from("age as a key"));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get_str("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Value;
use indexmap::{IndexMap, IndexSet};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// An insertion-ordered map of serpent values to serpent values.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{SerpentMap, Value};
///
/// let mut map = SerpentMap::new();
/// map.insert(Value::from("first"), Value::from(1));
/// map.insert(Value::from("second"), Value::from(2));
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = map.keys().filter_map(Value::as_str).collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerpentMap(IndexMap<Value, Value>);

impl SerpentMap {
    #[must_use]
    pub fn new() -> Self {
        SerpentMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        SerpentMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// An existing key keeps its position and gets the new value; the old
    /// value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_serpent::{SerpentMap, Value};
    ///
    /// let mut map = SerpentMap::new();
    /// assert!(map.insert(Value::from("key"), Value::from(42)).is_none());
    /// assert!(map.insert(Value::from("key"), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.get(key)
    }

    /// Looks up a string key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.0.get(&Value::Str(key.to_string()))
    }

    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Value, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Value, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Value> {
        self.0.iter()
    }
}

impl IntoIterator for SerpentMap {
    type Item = (Value, Value);
    type IntoIter = indexmap::map::IntoIter<Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SerpentMap {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(Value, Value)> for SerpentMap {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        SerpentMap(IndexMap::from_iter(iter))
    }
}

impl Serialize for SerpentMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// An insertion-ordered set of serpent values.
///
/// Duplicates merge on insert. Written as a set literal `{a,b}`, or as a
/// tuple when set literals are disabled; the empty set is always `()`.
///
/// # Examples
///
/// ```rust
/// use serde_serpent::{SerpentSet, Value};
///
/// let set: SerpentSet = [1, 2, 2, 3].into_iter().map(Value::from).collect();
/// assert_eq!(set.len(), 3);
/// assert!(set.contains(&Value::from(2)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerpentSet(IndexSet<Value>);

impl SerpentSet {
    #[must_use]
    pub fn new() -> Self {
        SerpentSet(IndexSet::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        SerpentSet(IndexSet::with_capacity(capacity))
    }

    /// Adds a value; returns `false` if an equal value was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        self.0.insert(value)
    }

    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, Value> {
        self.0.iter()
    }
}

impl IntoIterator for SerpentSet {
    type Item = Value;
    type IntoIter = indexmap::set::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SerpentSet {
    type Item = &'a Value;
    type IntoIter = indexmap::set::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Value> for SerpentSet {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        SerpentSet(IndexSet::from_iter(iter))
    }
}

impl Serialize for SerpentSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self.iter() {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reinsert_keeps_position() {
        let mut map = SerpentMap::new();
        map.insert(Value::from("a"), Value::from(1));
        map.insert(Value::from("b"), Value::from(2));
        map.insert(Value::from("a"), Value::from(3));
        let pairs: Vec<_> = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        assert_eq!(
            pairs,
            vec![
                (Value::from("a"), Value::from(3)),
                (Value::from("b"), Value::from(2))
            ]
        );
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut map: SerpentMap = (1..=4).map(|i| (Value::from(i), Value::None)).collect();
        map.remove(&Value::from(2));
        let keys: Vec<_> = map.keys().filter_map(Value::as_i64).collect();
        assert_eq!(keys, vec![1, 3, 4]);
    }

    #[test]
    fn test_set_merges_duplicates() {
        let mut set = SerpentSet::new();
        assert!(set.insert(Value::from("x")));
        assert!(!set.insert(Value::from("x")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_set_equality_ignores_order() {
        let a: SerpentSet = [1, 2, 3].into_iter().map(Value::from).collect();
        let b: SerpentSet = [3, 1, 2].into_iter().map(Value::from).collect();
        assert_eq!(a, b);
    }
}
