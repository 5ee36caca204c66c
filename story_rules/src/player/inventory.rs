//! Inventory of item ids.

use serde::{Deserialize, Deserializer, Serialize};

/// An ordered set of item ids.
///
/// Items keep the order they were first added in; adding an item that is
/// already present does nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Inventory {
    items: Vec<String>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item if absent. Returns `true` if it was inserted.
    pub fn insert(&mut self, item: impl Into<String>) -> bool {
        let item = item.into();
        if self.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove an item. Returns `true` if it was present.
    pub fn remove(&mut self, item: &str) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }

    /// Check that every required item is held.
    pub fn satisfies<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required.iter().all(|r| self.contains(r.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn join(&self, sep: &str) -> String {
        self.items.join(sep)
    }
}

impl FromIterator<String> for Inventory {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for item in iter {
            inventory.insert(item);
        }
        inventory
    }
}

// Deserialize through the deduplicating constructor.
impl<'de> Deserialize<'de> for Inventory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<String>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut inv = Inventory::new();
        assert!(inv.insert("key"));
        assert!(!inv.insert("key"));
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut inv = Inventory::new();
        inv.insert("torch");
        inv.insert("key");
        inv.insert("map");
        inv.remove("key");
        inv.insert("key");

        let items: Vec<_> = inv.iter().collect();
        assert_eq!(items, vec!["torch", "map", "key"]);
    }

    #[test]
    fn test_remove_missing() {
        let mut inv = Inventory::new();
        assert!(!inv.remove("ghost"));
    }

    #[test]
    fn test_satisfies() {
        let mut inv = Inventory::new();
        assert!(inv.satisfies::<&str>(&[]));
        assert!(!inv.satisfies(&["A"]));

        inv.insert("A");
        assert!(inv.satisfies(&["A"]));
        assert!(!inv.satisfies(&["A", "B"]));
    }

    #[test]
    fn test_deserialize_drops_duplicates() {
        let inv: Inventory = serde_json::from_str(r#"["a", "b", "a"]"#).unwrap();
        assert_eq!(inv.as_slice(), ["a", "b"]);
        assert_eq!(serde_json::to_string(&inv).unwrap(), r#"["a","b"]"#);
    }
}
