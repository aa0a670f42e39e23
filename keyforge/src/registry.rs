//! A keyed, insertion-ordered store for entities.

use rand::{Rng, thread_rng};

/// A string-keyed store that preserves insertion order.
///
/// A [`Registry`] holds no relationship to the validity of its entries; membership is
/// external bookkeeping and entries are only removed by explicit call.
/// [`add`][`Registry::add`] follows an idempotent-registration contract: adding under
/// an existing key without `replace` keeps and returns the stored value.
///
/// Iteration, [`find`][`Registry::find`], [`filter`][`Registry::filter`] and
/// [`map`][`Registry::map`] all observe insertion order.
///
/// # Examples
///
/// ```
/// use keyforge::Registry;
///
/// let mut registry = Registry::new();
/// registry.add("first", 1, false);
/// registry.add("second", 2, false);
///
/// // adding under an existing key without replace keeps the stored value
/// assert_eq!(registry.add("first", 10, false), &1);
/// assert_eq!(registry.add("first", 10, true), &10);
///
/// assert_eq!(registry.find(|value| *value > 1), Some(&2));
/// ```
#[derive(Clone, Debug)]
pub struct Registry<T> {
    entries: Vec<(String, T)>,
}

impl<T> Registry<T> {
    /// Creates a new empty [`Registry`].
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a value under a key and returns a reference to the stored value.
    ///
    /// If the key is taken and `replace` is false, the registry is left unchanged and
    /// the existing value is returned.
    /// If `replace` is true, the value is replaced in place, keeping its position in
    /// the iteration order.
    pub fn add(&mut self, key: impl Into<String>, value: T, replace: bool) -> &T {
        let key = key.into();
        if let Some(position) = self.entries.iter().position(|(stored, _)| *stored == key) {
            if replace {
                self.entries[position].1 = value;
            }
            &self.entries[position].1
        } else {
            self.entries.push((key, value));
            &self.entries[self.entries.len() - 1].1
        }
    }

    /// Adds a value under a key, replacing any existing entry.
    pub fn update(&mut self, key: impl Into<String>, value: T) -> &T {
        self.add(key, value, true)
    }

    /// Returns the value stored under a key.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(stored, _)| stored == key)
            .map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value stored under a key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(stored, _)| stored == key)
            .map(|(_, value)| value)
    }

    /// Checks whether a key is taken.
    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(stored, _)| stored == key)
    }

    /// Removes and returns the value stored under a key.
    ///
    /// Removing a missing key returns [`None`], never an error.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        let position = self.entries.iter().position(|(stored, _)| stored == key)?;
        Some(self.entries.remove(position).1)
    }

    /// Returns the first value satisfying a predicate, in insertion order.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.entries
            .iter()
            .find(|(_, value)| predicate(value))
            .map(|(_, value)| value)
    }

    /// Returns all values satisfying a predicate, in insertion order.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<&T> {
        self.entries
            .iter()
            .filter(|(_, value)| predicate(value))
            .map(|(_, value)| value)
            .collect()
    }

    /// Maps every value, in insertion order.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Vec<U> {
        self.entries.iter().map(|(_, value)| f(value)).collect()
    }

    /// Checks whether any value satisfies a predicate.
    pub fn some(&self, predicate: impl Fn(&T) -> bool) -> bool {
        self.entries.iter().any(|(_, value)| predicate(value))
    }

    /// Returns a uniformly selected value, or [`None`] if the registry is empty.
    ///
    /// Selection uses a general-purpose random source; entries are already validated,
    /// so no cryptographic guarantee is needed here.
    pub fn random(&self) -> Option<&T> {
        if self.entries.is_empty() {
            return None;
        }
        let index = thread_rng().gen_range(0..self.entries.len());
        self.entries.get(index).map(|(_, value)| value)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Returns the values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Returns the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry<&'static str> {
        let mut registry = Registry::new();
        registry.add("a", "alpha", false);
        registry.add("b", "beta", false);
        registry.add("c", "gamma", false);
        registry
    }

    #[test]
    fn add_without_replace_keeps_the_existing_value() {
        let mut registry = registry();
        assert_eq!(registry.add("a", "replacement", false), &"alpha");
        assert_eq!(registry.get("a"), Some(&"alpha"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn add_with_replace_keeps_the_position() {
        let mut registry = registry();
        assert_eq!(registry.add("b", "replacement", true), &"replacement");
        assert_eq!(
            registry.values().copied().collect::<Vec<_>>(),
            ["alpha", "replacement", "gamma"]
        );
    }

    #[test]
    fn update_replaces_or_inserts() {
        let mut registry = registry();
        assert_eq!(registry.update("a", "updated"), &"updated");
        assert_eq!(registry.update("d", "delta"), &"delta");
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn remove_returns_the_value_or_none() {
        let mut registry = registry();
        assert_eq!(registry.remove("b"), Some("beta"));
        assert_eq!(registry.remove("b"), None);
        assert!(!registry.has("b"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn find_filter_map_observe_insertion_order() {
        let registry = registry();
        assert_eq!(registry.find(|value| value.contains('m')), Some(&"gamma"));
        assert_eq!(registry.find(|_| false), None);
        assert_eq!(
            registry.filter(|value| value.len() == 5),
            [&"alpha", &"gamma"]
        );
        assert_eq!(
            registry.map(|value| value.to_uppercase()),
            ["ALPHA", "BETA", "GAMMA"]
        );
        assert!(registry.some(|value| *value == "beta"));
        assert!(!registry.some(|value| *value == "delta"));
    }

    #[test]
    fn random_selects_a_contained_value() {
        let registry = registry();
        for _ in 0..16 {
            let value = registry.random().copied();
            assert!(registry.some(|stored| Some(*stored) == value));
        }
        assert_eq!(Registry::<&str>::new().random(), None);
    }

    #[test]
    fn keys_and_iter_observe_insertion_order() {
        let registry = registry();
        assert_eq!(registry.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(
            registry.iter().collect::<Vec<_>>(),
            [("a", &"alpha"), ("b", &"beta"), ("c", &"gamma")]
        );
    }
}
