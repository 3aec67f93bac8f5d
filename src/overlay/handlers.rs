//! Side table of per-container hover bindings
//!
//! Keeps listener handles out of host-owned objects. Lookups go through the
//! host's hashable node key, so element handles are never compared one by one.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct HandlerTable<K, N, H> {
    entries: HashMap<K, (N, H)>,
    order: Vec<K>,
}

impl<K, N, H> Default for HandlerTable<K, N, H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Hash, N, H> HandlerTable<K, N, H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handler` for `node`, returning the binding it replaces
    pub fn replace(&mut self, key: K, node: N, handler: H) -> Option<H> {
        match self.entries.insert(key, (node, handler)) {
            Some((_, previous)) => Some(previous),
            None => {
                self.order.push(key);
                None
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<(N, H)> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    pub fn get(&self, key: &K) -> Option<&H> {
        self.entries.get(key).map(|(_, h)| h)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys and nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (K, &N)> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).map(|(node, _)| (*key, node)))
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.iter().map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry, in insertion order
    pub fn drain(&mut self) -> impl Iterator<Item = (N, H)> + '_ {
        let entries = &mut self.entries;
        self.order.drain(..).filter_map(move |key| entries.remove(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_returns_previous_binding() {
        let mut table = HandlerTable::new();
        assert_eq!(table.replace(7, "card", 1), None);
        assert_eq!(table.replace(7, "card", 2), Some(1));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&7), Some(&2));
    }

    #[test]
    fn test_insertion_order_and_removal() {
        let mut table = HandlerTable::new();
        table.replace(1, "a", 10);
        table.replace(2, "b", 20);
        table.replace(3, "c", 30);

        assert_eq!(table.remove(&2), Some(("b", 20)));
        assert_eq!(table.nodes().copied().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(!table.contains(&2));
        assert_eq!(table.remove(&2), None);

        // Re-adding a removed key appends it at the end
        table.replace(2, "b", 21);
        assert_eq!(table.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec![1, 3, 2]);

        let drained: Vec<_> = table.drain().collect();
        assert_eq!(drained, vec![("a", 10), ("c", 30), ("b", 21)]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_large_table_lookups() {
        let mut table = HandlerTable::new();
        for key in 0..1_000u32 {
            table.replace(key, key, ());
        }
        for key in (0..1_000u32).step_by(2) {
            table.remove(&key);
        }

        assert_eq!(table.len(), 500);
        assert!(table.contains(&999));
        assert!(!table.contains(&998));
        assert_eq!(table.nodes().next(), Some(&1));
    }
}
