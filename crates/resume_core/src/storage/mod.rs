//! Storage contract, shared existence-checking driver and backends.
//!
//! # Responsibility
//! - Define the uniform CRUD contract (`Storage`) consumed by callers.
//! - Define backend hooks (`StorageBackend`) keyed by a backend-specific
//!   search key.
//! - Enforce existence rules once, before any backend mutation runs.
//!
//! # Invariants
//! - `save` never overwrites: an existing uuid yields `Conflict`.
//! - `update`/`delete`/`get` on a missing uuid yield `NotFound`.
//! - Business errors are raised before any mutation, so they never leave
//!   partial state behind.
//! - `get_all_sorted` is ordered by `(full_name, uuid)` with one entry per uuid.

use crate::db::DbError;
use crate::model::resume::{Resume, ResumeValidationError};
use log::debug;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod array_storage;
pub mod map_storage;
pub mod path_storage;
pub mod sorted_array_storage;
pub mod sql_storage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Lower-level cause carried by `StorageError::Failure`.
#[derive(Debug)]
pub enum FailureCause {
    Db(DbError),
    Io(std::io::Error),
    /// Encoding/decoding failure from a stream serializer.
    Codec(Box<dyn Error + Send + Sync + 'static>),
    /// Persisted state that cannot be mapped back to a resume.
    InvalidData(String),
}

impl Display for FailureCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

/// Error taxonomy for every storage backend.
#[derive(Debug)]
pub enum StorageError {
    /// Operation required an existing resume that was absent.
    NotFound(String),
    /// `save` attempted on a uuid that already exists.
    Conflict(String),
    /// Resume rejected before any mutation.
    Invalid(ResumeValidationError),
    /// Fixed-capacity backend is full.
    Overflow(String),
    /// I/O, connectivity or transaction failure not caused by a business rule.
    Failure {
        uuid: Option<String>,
        cause: FailureCause,
    },
}

impl StorageError {
    pub fn failure(uuid: Option<&str>, cause: FailureCause) -> Self {
        Self::Failure {
            uuid: uuid.map(str::to_string),
            cause,
        }
    }

    pub fn io(uuid: Option<&str>, err: std::io::Error) -> Self {
        Self::failure(uuid, FailureCause::Io(err))
    }

    pub fn codec(err: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::failure(None, FailureCause::Codec(err.into()))
    }

    pub fn invalid_data(uuid: Option<&str>, message: impl Into<String>) -> Self {
        Self::failure(uuid, FailureCause::InvalidData(message.into()))
    }

    /// Attaches `uuid` to a `Failure` that does not carry one yet.
    pub fn with_uuid(self, uuid: &str) -> Self {
        match self {
            Self::Failure { uuid: None, cause } => Self::Failure {
                uuid: Some(uuid.to_string()),
                cause,
            },
            other => other,
        }
    }

    /// Returns whether this is one of the existence business errors.
    pub fn is_business(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Conflict(_))
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(uuid) => write!(f, "resume {uuid} does not exist"),
            Self::Conflict(uuid) => write!(f, "resume {uuid} already exists"),
            Self::Invalid(err) => write!(f, "invalid resume: {err}"),
            Self::Overflow(uuid) => write!(f, "storage overflow while saving resume {uuid}"),
            Self::Failure {
                uuid: Some(uuid),
                cause,
            } => write!(f, "storage failure for resume {uuid}: {cause}"),
            Self::Failure { uuid: None, cause } => write!(f, "storage failure: {cause}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Failure { cause, .. } => match cause {
                FailureCause::Db(err) => Some(err),
                FailureCause::Io(err) => Some(err),
                FailureCause::Codec(err) => Some(err.as_ref()),
                FailureCause::InvalidData(_) => None,
            },
            Self::NotFound(_) | Self::Conflict(_) | Self::Overflow(_) => None,
        }
    }
}

impl From<ResumeValidationError> for StorageError {
    fn from(value: ResumeValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::failure(None, FailureCause::Db(value))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::from(DbError::Sqlite(value))
    }
}

/// Uniform resume CRUD contract.
pub trait Storage {
    /// Persists a new resume. Fails with `Conflict` if the uuid is taken.
    fn save(&mut self, resume: &Resume) -> StorageResult<()>;
    /// Replaces name and full contact set of an existing resume.
    fn update(&mut self, resume: &Resume) -> StorageResult<()>;
    fn delete(&mut self, uuid: &str) -> StorageResult<()>;
    fn get(&self, uuid: &str) -> StorageResult<Resume>;
    /// Every stored resume ordered by `(full_name, uuid)`.
    fn get_all_sorted(&self) -> StorageResult<Vec<Resume>>;
    /// Number of distinct resumes.
    fn size(&self) -> StorageResult<usize>;
    fn clear(&mut self) -> StorageResult<()>;
}

/// Backend hooks driven by the shared existence-checking protocol.
///
/// Implementors get `Storage` through the blanket impl below; the `do_*`
/// hooks run only after the required existence state has been asserted.
pub trait StorageBackend {
    type SearchKey;

    /// Resolves a uuid to the backend lookup key. Pure and infallible.
    fn search_key(&self, uuid: &str) -> Self::SearchKey;
    fn is_exist(&self, key: &Self::SearchKey) -> StorageResult<bool>;

    fn do_save(&mut self, resume: &Resume, key: Self::SearchKey) -> StorageResult<()>;
    fn do_update(&mut self, resume: &Resume, key: Self::SearchKey) -> StorageResult<()>;
    fn do_delete(&mut self, key: Self::SearchKey) -> StorageResult<()>;
    fn do_get(&self, key: &Self::SearchKey) -> StorageResult<Resume>;
    fn do_copy_all(&self) -> StorageResult<Vec<Resume>>;
    fn do_size(&self) -> StorageResult<usize>;
    fn do_clear(&mut self) -> StorageResult<()>;

    /// Copies every resume in `(full_name, uuid)` order.
    ///
    /// Backends that already retrieve in that order override this.
    fn do_copy_all_sorted(&self) -> StorageResult<Vec<Resume>> {
        let mut resumes = self.do_copy_all()?;
        resumes.sort_by(compare_by_name_then_uuid);
        Ok(resumes)
    }
}

/// Listing order shared by all backends.
pub fn compare_by_name_then_uuid(left: &Resume, right: &Resume) -> Ordering {
    left.full_name()
        .cmp(right.full_name())
        .then_with(|| left.uuid().cmp(right.uuid()))
}

fn existed_search_key<B: StorageBackend + ?Sized>(
    backend: &B,
    uuid: &str,
) -> StorageResult<B::SearchKey> {
    let key = backend.search_key(uuid);
    if !backend.is_exist(&key)? {
        debug!("event=storage_op module=storage status=error error_code=not_found uuid={uuid}");
        return Err(StorageError::NotFound(uuid.to_string()));
    }
    Ok(key)
}

fn not_existed_search_key<B: StorageBackend + ?Sized>(
    backend: &B,
    uuid: &str,
) -> StorageResult<B::SearchKey> {
    let key = backend.search_key(uuid);
    if backend.is_exist(&key)? {
        debug!("event=storage_op module=storage status=error error_code=conflict uuid={uuid}");
        return Err(StorageError::Conflict(uuid.to_string()));
    }
    Ok(key)
}

impl<B: StorageBackend> Storage for B {
    fn save(&mut self, resume: &Resume) -> StorageResult<()> {
        resume.validate()?;
        let key = not_existed_search_key(self, resume.uuid())?;
        self.do_save(resume, key)
    }

    fn update(&mut self, resume: &Resume) -> StorageResult<()> {
        resume.validate()?;
        let key = existed_search_key(self, resume.uuid())?;
        self.do_update(resume, key)
    }

    fn delete(&mut self, uuid: &str) -> StorageResult<()> {
        let key = existed_search_key(self, uuid)?;
        self.do_delete(key)
    }

    fn get(&self, uuid: &str) -> StorageResult<Resume> {
        let key = existed_search_key(self, uuid)?;
        self.do_get(&key)
    }

    fn get_all_sorted(&self) -> StorageResult<Vec<Resume>> {
        self.do_copy_all_sorted()
    }

    fn size(&self) -> StorageResult<usize> {
        self.do_size()
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.do_clear()
    }
}
