//! Saved fragrance lists over a key-value store
//!
//! The store mirrors the browser's `storage.local` contract: `get` returns the
//! subset of requested keys that exist, `set` merges the given keys. Writes are
//! read-modify-write with no concurrency control; the last writer wins.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::{Error, Result};
use crate::models::{ListItem, ListKind};
use serde_json::{Map, Value};

/// Partial record of stored keys
pub type Record = Map<String, Value>;

pub trait KeyValueStore {
    fn get(&self, keys: &[&str]) -> Result<Record>;

    fn set(&mut self, record: Record) -> Result<()>;
}

/// Typed access to the wishlist and collection
#[derive(Debug, Clone)]
pub struct ListStore<S> {
    store: S,
}

impl<S: KeyValueStore> ListStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Items in stored order; a missing list is empty
    pub fn items(&self, kind: ListKind) -> Result<Vec<ListItem>> {
        let mut record = self.store.get(&[kind.key()])?;
        match record.remove(kind.key()) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| Error::Storage(format!("malformed {} list: {}", kind, e))),
        }
    }

    /// Append an item, returning the new length
    pub fn add(&mut self, kind: ListKind, item: ListItem) -> Result<usize> {
        let mut items = self.items(kind)?;
        items.push(item);
        let len = items.len();
        self.write(kind, &items)?;
        Ok(len)
    }

    /// Remove the item at `index`, keeping the others in order. Out-of-range
    /// indices leave the list untouched and return `None`.
    pub fn remove_at(&mut self, kind: ListKind, index: usize) -> Result<Option<ListItem>> {
        let mut items = self.items(kind)?;
        if index >= items.len() {
            return Ok(None);
        }
        let removed = items.remove(index);
        self.write(kind, &items)?;
        Ok(Some(removed))
    }

    fn write(&mut self, kind: ListKind, items: &[ListItem]) -> Result<()> {
        let mut record = Record::new();
        record.insert(kind.key().to_string(), serde_json::to_value(items)?);
        self.store.set(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(name: &str) -> ListItem {
        ListItem::new(name, format!("https://example.com/{}", name), format!("https://example.com/{}.jpg", name))
    }

    #[test]
    fn test_missing_list_is_empty() {
        let lists = ListStore::new(MemoryStore::new());
        assert!(lists.items(ListKind::Wishlist).unwrap().is_empty());
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut lists = ListStore::new(MemoryStore::new());
        for name in ["a", "b", "c", "d"] {
            lists.add(ListKind::Collection, item(name)).unwrap();
        }

        let removed = lists.remove_at(ListKind::Collection, 1).unwrap();
        assert_eq!(removed, Some(item("b")));

        let names: Vec<String> = lists
            .items(ListKind::Collection)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_out_of_range_remove_is_noop() {
        let mut lists = ListStore::new(MemoryStore::new());
        lists.add(ListKind::Wishlist, item("a")).unwrap();

        assert_eq!(lists.remove_at(ListKind::Wishlist, 5).unwrap(), None);
        assert_eq!(lists.items(ListKind::Wishlist).unwrap().len(), 1);
    }

    #[test]
    fn test_lists_are_independent() {
        let mut lists = ListStore::new(MemoryStore::new());
        lists.add(ListKind::Wishlist, item("a")).unwrap();
        lists.add(ListKind::Collection, item("b")).unwrap();
        lists.remove_at(ListKind::Wishlist, 0).unwrap();

        assert!(lists.items(ListKind::Wishlist).unwrap().is_empty());
        assert_eq!(lists.items(ListKind::Collection).unwrap(), vec![item("b")]);
    }

    #[test]
    fn test_malformed_list_is_an_error() {
        let mut store = MemoryStore::new();
        let mut record = Record::new();
        record.insert("wishlist".to_string(), Value::String("oops".to_string()));
        store.set(record).unwrap();

        let lists = ListStore::new(store);
        assert!(matches!(lists.items(ListKind::Wishlist), Err(Error::Storage(_))));
    }
}
