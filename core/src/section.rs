//! Insertion-ordered keyed results.
//!
//! Parsers that split output into named records (one per volume, device, ...)
//! return a [`SectionMap`]. It keeps records in the order they appeared in the
//! captured output and offers the lookup, membership and iteration helpers
//! that consumers use.

use std::ops::Index;

use indexmap::IndexMap;
use serde::Serialize;

/// Named records in first-appearance order.
///
/// Inserting an existing name replaces its value but keeps its original
/// position. Serializes as a map in that order.
///
/// # Examples
///
/// ```
/// use hostfacts_core::SectionMap;
///
/// let mut volumes = SectionMap::new();
/// volumes.insert("data", 3);
/// volumes.insert("logs", 1);
/// volumes.insert("data", 6);
///
/// assert_eq!(volumes.get("data"), Some(&6));
/// assert!(volumes.contains("logs"));
/// assert_eq!(volumes.names().collect::<Vec<_>>(), vec!["data", "logs"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionMap<V> {
    entries: IndexMap<String, V>,
}

impl<V> Default for SectionMap<V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<V> SectionMap<V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `name`, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(name.into(), value)
    }

    /// Looks up a record by name.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.get(name)
    }

    /// Returns `true` if a record named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Record names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(name, record)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Records in order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Index<&str> for SectionMap<V> {
    type Output = V;

    /// # Panics
    ///
    /// Panics if no record named `name` exists.
    fn index(&self, name: &str) -> &V {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no section named '{name}'"),
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for SectionMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        }
    }
}

impl<V> IntoIterator for SectionMap<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
