//! Ordered map storage keyed by uuid.

use crate::model::resume::Resume;
use crate::storage::{StorageBackend, StorageError, StorageResult};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct MapStorage {
    storage: BTreeMap<String, Resume>,
}

impl MapStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MapStorage {
    type SearchKey = String;

    fn search_key(&self, uuid: &str) -> String {
        uuid.to_string()
    }

    fn is_exist(&self, key: &String) -> StorageResult<bool> {
        Ok(self.storage.contains_key(key))
    }

    fn do_save(&mut self, resume: &Resume, key: String) -> StorageResult<()> {
        self.storage.insert(key, resume.clone());
        Ok(())
    }

    fn do_update(&mut self, resume: &Resume, key: String) -> StorageResult<()> {
        self.storage.insert(key, resume.clone());
        Ok(())
    }

    fn do_delete(&mut self, key: String) -> StorageResult<()> {
        self.storage.remove(&key);
        Ok(())
    }

    fn do_get(&self, key: &String) -> StorageResult<Resume> {
        self.storage
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.clone()))
    }

    fn do_copy_all(&self) -> StorageResult<Vec<Resume>> {
        Ok(self.storage.values().cloned().collect())
    }

    fn do_size(&self) -> StorageResult<usize> {
        Ok(self.storage.len())
    }

    fn do_clear(&mut self) -> StorageResult<()> {
        self.storage.clear();
        Ok(())
    }
}
