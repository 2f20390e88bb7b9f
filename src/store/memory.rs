use std::collections::HashMap;
use std::sync::RwLock;

use bytes::Bytes;

use crate::store::{ResourceStore, StoreError, validate_name};

/// Keeps resources in a map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceStore for MemoryStore {
    fn read(&self, name: &str) -> Result<Bytes, StoreError> {
        validate_name(name)?;
        let entries = self
            .entries
            .read()
            .map_err(|_| std::io::Error::other("memory store lock poisoned"))?;
        entries
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        validate_name(name)?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| std::io::Error::other("memory store lock poisoned"))?;
        entries.insert(name.to_string(), Bytes::copy_from_slice(bytes));
        Ok(())
    }
}
