//! Fixed-capacity array storage kept sorted by uuid.
//!
//! Search key is the `binary_search` outcome: `Ok(index)` when present,
//! `Err(insertion_point)` when absent.

use crate::model::resume::Resume;
use crate::storage::array_storage::STORAGE_LIMIT;
use crate::storage::{StorageBackend, StorageError, StorageResult};

#[derive(Debug, Clone)]
pub struct SortedArrayStorage {
    storage: Vec<Resume>,
    limit: usize,
}

impl SortedArrayStorage {
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

impl Default for SortedArrayStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for SortedArrayStorage {
    type SearchKey = Result<usize, usize>;

    fn search_key(&self, uuid: &str) -> Result<usize, usize> {
        self.storage
            .binary_search_by(|resume| resume.uuid().cmp(uuid))
    }

    fn is_exist(&self, key: &Result<usize, usize>) -> StorageResult<bool> {
        Ok(key.is_ok())
    }

    fn do_save(&mut self, resume: &Resume, key: Result<usize, usize>) -> StorageResult<()> {
        let insertion_point = match key {
            Err(point) => point,
            Ok(_) => return Err(StorageError::Conflict(resume.uuid().to_string())),
        };
        if self.storage.len() >= self.limit {
            return Err(StorageError::Overflow(resume.uuid().to_string()));
        }
        self.storage.insert(insertion_point, resume.clone());
        Ok(())
    }

    fn do_update(&mut self, resume: &Resume, key: Result<usize, usize>) -> StorageResult<()> {
        let index = key.map_err(|_| StorageError::NotFound(resume.uuid().to_string()))?;
        self.storage[index] = resume.clone();
        Ok(())
    }

    fn do_delete(&mut self, key: Result<usize, usize>) -> StorageResult<()> {
        if let Ok(index) = key {
            self.storage.remove(index);
        }
        Ok(())
    }

    fn do_get(&self, key: &Result<usize, usize>) -> StorageResult<Resume> {
        key.ok()
            .and_then(|index| self.storage.get(index))
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
