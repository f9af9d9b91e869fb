//! Ready-made implementations of the loader and storage ports.
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::events::{CatalogError, EventCatalog, load_builtin_catalog};
use crate::{DataLoader, GameStorage};

/// Loads the event catalog compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedDataLoader;

impl DataLoader for EmbeddedDataLoader {
    type Error = CatalogError;

    fn load_event_catalog(&self) -> Result<EventCatalog, Self::Error> {
        load_builtin_catalog()
    }
}

/// In-memory key-value store. Clones share the same entries, so a handle
/// kept by a test observes what the engine wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl GameStorage for MemoryStorage {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.write("k", "v").unwrap();
        assert_eq!(handle.read("k").unwrap().as_deref(), Some("v"));
        handle.remove("k").unwrap();
        assert!(storage.is_empty());
        assert!(storage.read("k").unwrap().is_none());
    }

    #[test]
    fn embedded_loader_returns_full_catalog() {
        let catalog = EmbeddedDataLoader.load_event_catalog().unwrap();
        assert_eq!(catalog.len(), 13);
    }
}
