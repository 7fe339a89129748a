//! Directory-backed storage: one file per resume.
//!
//! # Invariants
//! - File name is the percent-encoded resume uuid; content is one
//!   `StreamSerializer` document.
//! - Every uuid maps to a plain file name inside the directory: separators,
//!   dots and `%` are always escaped.
//! - Only regular files in the directory count as resumes.

use crate::model::resume::Resume;
use crate::serializer::StreamSerializer;
use crate::storage::{StorageBackend, StorageError, StorageResult};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Bytes escaped in file names; alphanumerics, `-` and `_` pass through.
const FILE_NAME_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

pub struct PathStorage<S> {
    directory: PathBuf,
    serializer: S,
}

impl<S: StreamSerializer> PathStorage<S> {
    /// Opens storage over `directory`, creating it when missing.
    pub fn new(directory: impl Into<PathBuf>, serializer: S) -> StorageResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|err| StorageError::io(None, err))?;
        if !directory.is_dir() {
            return Err(StorageError::invalid_data(
                None,
                format!("`{}` is not a directory", directory.display()),
            ));
        }
        Ok(Self {
            directory,
            serializer,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn write_file(&self, resume: &Resume, path: &Path) -> StorageResult<()> {
        let uuid = resume.uuid();
        let file = File::create(path).map_err(|err| StorageError::io(Some(uuid), err))?;
        let mut writer = BufWriter::new(file);
        self.serializer
            .write(resume, &mut writer)
            .map_err(|err| err.with_uuid(uuid))?;
        writer
            .flush()
            .map_err(|err| StorageError::io(Some(uuid), err))
    }

    fn read_file(&self, path: &Path) -> StorageResult<Resume> {
        let uuid = file_uuid(path);
        let file = File::open(path).map_err(|err| StorageError::io(uuid.as_deref(), err))?;
        let mut reader = BufReader::new(file);
        let resume = self.serializer.read(&mut reader).map_err(|err| match &uuid {
            Some(uuid) => err.with_uuid(uuid),
            None => err,
        })?;

        if path.file_name() != Some(OsStr::new(&file_name(resume.uuid()))) {
            return Err(StorageError::invalid_data(
                uuid.as_deref(),
                format!("file `{}` holds resume {}", path.display(), resume.uuid()),
            ));
        }
        Ok(resume)
    }

    fn list_files(&self) -> StorageResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.directory).map_err(|err| StorageError::io(None, err))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| StorageError::io(None, err))?;
            let file_type = entry
                .file_type()
                .map_err(|err| StorageError::io(None, err))?;
            if file_type.is_file() {
                files.push(entry.path());
            }
        }
        Ok(files)
    }
}

impl<S: StreamSerializer> StorageBackend for PathStorage<S> {
    type SearchKey = PathBuf;

    fn search_key(&self, uuid: &str) -> PathBuf {
        self.directory.join(file_name(uuid))
    }

    fn is_exist(&self, key: &PathBuf) -> StorageResult<bool> {
        Ok(key.is_file())
    }

    fn do_save(&mut self, resume: &Resume, key: PathBuf) -> StorageResult<()> {
        self.write_file(resume, &key)
    }

    fn do_update(&mut self, resume: &Resume, key: PathBuf) -> StorageResult<()> {
        self.write_file(resume, &key)
    }

    fn do_delete(&mut self, key: PathBuf) -> StorageResult<()> {
        fs::remove_file(&key).map_err(|err| StorageError::io(file_uuid(&key).as_deref(), err))
    }

    fn do_get(&self, key: &PathBuf) -> StorageResult<Resume> {
        self.read_file(key)
    }

    fn do_copy_all(&self) -> StorageResult<Vec<Resume>> {
        self.list_files()?
            .iter()
            .map(|path| self.read_file(path))
            .collect()
    }

    fn do_size(&self) -> StorageResult<usize> {
        Ok(self.list_files()?.len())
    }

    fn do_clear(&mut self) -> StorageResult<()> {
        for path in self.list_files()? {
            fs::remove_file(&path)
                .map_err(|err| StorageError::io(file_uuid(&path).as_deref(), err))?;
        }
        Ok(())
    }
}

fn file_name(uuid: &str) -> String {
    utf8_percent_encode(uuid, FILE_NAME_ESCAPES).to_string()
}

fn file_uuid(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    percent_decode_str(name)
        .decode_utf8()
        .ok()
        .map(|uuid| uuid.into_owned())
}

#[cfg(test)]
mod tests {
    use super::PathStorage;
    use crate::model::resume::Resume;
    use crate::serializer::JsonStreamSerializer;
    use crate::storage::{FailureCause, Storage, StorageError};

    #[test]
    fn new_rejects_path_that_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("occupied");
        std::fs::write(&file_path, b"x").unwrap();

        let err = PathStorage::new(&file_path, JsonStreamSerializer)
            .err()
            .expect("file path must be rejected");
        assert!(matches!(err, StorageError::Failure { .. }));
    }

    #[test]
    fn uuid_with_path_components_stays_inside_directory() {
        let root = tempfile::tempdir().unwrap();
        let mut storage = PathStorage::new(root.path().join("store"), JsonStreamSerializer).unwrap();
        let resume = Resume::with_id("../escaped/a.b", "Escaper");

        storage.save(&resume).unwrap();

        assert!(!root.path().join("escaped").exists());
        let names: Vec<_> = std::fs::read_dir(storage.directory())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("%2E%2E%2Fescaped%2Fa%2Eb")]);
        assert_eq!(storage.size().unwrap(), 1);
        assert_eq!(storage.get_all_sorted().unwrap(), vec![resume.clone()]);
        assert_eq!(storage.get("../escaped/a.b").unwrap(), resume);

        storage.delete("../escaped/a.b").unwrap();
        assert_eq!(storage.size().unwrap(), 0);
    }

    #[test]
    fn file_holding_another_uuid_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = PathStorage::new(dir.path(), JsonStreamSerializer).unwrap();
        storage.save(&Resume::with_id("uuid1", "One")).unwrap();
        std::fs::rename(dir.path().join("uuid1"), dir.path().join("uuid2")).unwrap();

        let err = storage.get("uuid2").unwrap_err();
        assert!(matches!(
            err,
            StorageError::Failure {
                uuid: Some(ref uuid),
                cause: FailureCause::InvalidData(_),
            } if uuid == "uuid2"
        ));
    }

    #[test]
    fn corrupt_file_surfaces_failure_with_uuid() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PathStorage::new(dir.path(), JsonStreamSerializer).unwrap();
        std::fs::write(dir.path().join("uuid1"), b"{ not json").unwrap();

        let err = storage.get("uuid1").unwrap_err();
        assert!(matches!(
            err,
            StorageError::Failure { uuid: Some(ref uuid), .. } if uuid == "uuid1"
        ));
    }
}
