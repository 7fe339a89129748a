//! Resume persistence core.
//! One CRUD contract over in-memory, file-stream and SQLite backends.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod serializer;
pub mod sql;
pub mod storage;

pub use config::{load_config, AppConfig, ConfigError, StorageKind};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::resume::{ContactType, Resume, ResumeValidationError};
pub use serializer::{
    JsonStreamSerializer, ObjectStreamSerializer, StreamSerializer, XmlStreamSerializer,
};
pub use sql::{ConnectionFactory, SqlHelper, SqliteFileFactory};
pub use storage::array_storage::ArrayStorage;
pub use storage::map_storage::MapStorage;
pub use storage::path_storage::PathStorage;
pub use storage::sorted_array_storage::SortedArrayStorage;
pub use storage::sql_storage::SqlStorage;
pub use storage::{FailureCause, Storage, StorageBackend, StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
