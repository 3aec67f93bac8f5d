//! In-memory key-value store

use super::{KeyValueStore, Record};
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Record,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, keys: &[&str]) -> Result<Record> {
        Ok(keys
            .iter()
            .filter_map(|key| self.data.get(*key).map(|value| (key.to_string(), value.clone())))
            .collect())
    }

    fn set(&mut self, record: Record) -> Result<()> {
        self.data.extend(record);
        Ok(())
    }
}
