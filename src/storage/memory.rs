use std::cell::RefCell;
use std::collections::HashMap;

use super::KeyValueStorage;
use crate::error::Result;

/// In-process storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());

        storage.set_item("projects", "[]").unwrap();
        assert_eq!(storage.get_item("projects").unwrap().as_deref(), Some("[]"));

        storage.set_item("projects", "[1]").unwrap();
        assert_eq!(storage.get_item("projects").unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.len(), 1);

        storage.remove_item("projects").unwrap();
        assert_eq!(storage.get_item("projects").unwrap(), None);
    }
}
