use crate::token_store::{StorageKey, StorageResult, TokenStore};

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-process storage; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<StorageKey, String>> {
        // A panicked writer cannot leave a half-written String behind.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: StorageKey) -> StorageResult<Option<String>> {
        Ok(self.entries().get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        self.entries().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> StorageResult<()> {
        self.entries().remove(&key);
        Ok(())
    }
}
