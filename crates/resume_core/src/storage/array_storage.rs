//! Unsorted fixed-capacity array storage.
//!
//! Search key is the slot index found by linear scan. Deletion moves the last
//! element into the freed slot, so slot order carries no meaning.

use crate::model::resume::Resume;
use crate::storage::{StorageBackend, StorageError, StorageResult};

/// Default capacity of array-backed storages.
pub const STORAGE_LIMIT: usize = 10_000;

#[derive(Debug, Clone)]
pub struct ArrayStorage {
    storage: Vec<Resume>,
    limit: usize,
}

impl ArrayStorage {
    pub fn new() -> Self {
        Self::with_limit(STORAGE_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            storage: Vec::new(),
            limit,
        }
    }
}

impl Default for ArrayStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for ArrayStorage {
    type SearchKey = Option<usize>;

    fn search_key(&self, uuid: &str) -> Option<usize> {
        self.storage.iter().position(|resume| resume.uuid() == uuid)
    }

    fn is_exist(&self, key: &Option<usize>) -> StorageResult<bool> {
        Ok(key.is_some())
    }

    fn do_save(&mut self, resume: &Resume, _key: Option<usize>) -> StorageResult<()> {
        if self.storage.len() >= self.limit {
            return Err(StorageError::Overflow(resume.uuid().to_string()));
        }
        self.storage.push(resume.clone());
        Ok(())
    }

    fn do_update(&mut self, resume: &Resume, key: Option<usize>) -> StorageResult<()> {
        let index = key.ok_or_else(|| StorageError::NotFound(resume.uuid().to_string()))?;
        self.storage[index] = resume.clone();
        Ok(())
    }

    fn do_delete(&mut self, key: Option<usize>) -> StorageResult<()> {
        if let Some(index) = key {
            self.storage.swap_remove(index);
        }
        Ok(())
    }

    fn do_get(&self, key: &Option<usize>) -> StorageResult<Resume> {
        key.and_then(|index| self.storage.get(index))
            .cloned()
            .ok_or_else(|| StorageError::invalid_data(None, "array slot out of range"))
    }

    fn do_copy_all(&self) -> StorageResult<Vec<Resume>> {
        Ok(self.storage.clone())
    }

    fn do_size(&self) -> StorageResult<usize> {
        Ok(self.storage.len())
    }

    fn do_clear(&mut self) -> StorageResult<()> {
        self.storage.clear();
        Ok(())
    }
}
