//! Ordered map type for TOML tables.
//!
//! This module provides [`TomlMap`], a wrapper around [`IndexMap`] that keeps
//! keys in first-definition order. TOML documents are written by people, so
//! a decode → inspect → report workflow should see keys in the order the
//! file defines them rather than in hash order.
//!
//! ## Examples
//!
//! ```rust
//! use toml_decode::{TomlMap, Value};
//!
//! let mut map = TomlMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of string keys to TOML values.
///
/// # Examples
///
/// ```rust
/// use toml_decode::{TomlMap, Value};
///
/// let mut map = TomlMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TomlMap(IndexMap<String, crate::Value>);

impl TomlMap {
    /// Creates an empty `TomlMap`.
    #[must_use]
    pub fn new() -> Self {
        TomlMap(IndexMap::new())
    }

    /// Creates an empty `TomlMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TomlMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key is already present its value is replaced in place (the
    /// key keeps its original position) and the old value is returned.
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[must_use]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut crate::Value> {
        self.0.get_mut(key)
    }

    /// Returns `true` if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in
    /// insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, crate::Value>> for TomlMap {
    fn from(map: HashMap<String, crate::Value>) -> Self {
        TomlMap(map.into_iter().collect())
    }
}

impl From<TomlMap> for HashMap<String, crate::Value> {
    fn from(map: TomlMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for TomlMap {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TomlMap {
    type Item = (&'a String, &'a crate::Value);
    type IntoIter = indexmap::map::Iter<'a, String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, crate::Value)> for TomlMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        TomlMap(IndexMap::from_iter(iter))
    }
}
