//! Application configuration loaded from TOML.
//!
//! # Responsibility
//! - Describe which backend to open and where its data lives.
//! - Carry log settings for `init_logging`.
//!
//! # Invariants
//! - Every field has a default; an empty file is a valid config.
//! - Relative paths in a config file resolve against the file's directory.

use crate::logging::default_log_level;
use crate::serializer::{JsonStreamSerializer, ObjectStreamSerializer, XmlStreamSerializer};
use crate::storage::array_storage::ArrayStorage;
use crate::storage::map_storage::MapStorage;
use crate::storage::path_storage::PathStorage;
use crate::storage::sorted_array_storage::SortedArrayStorage;
use crate::storage::sql_storage::SqlStorage;
use crate::storage::{Storage, StorageResult};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_FILE: &str = "resumes.toml";

/// Backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageKind {
    Array,
    SortedArray,
    Map,
    ObjectFile,
    XmlFile,
    JsonFile,
    #[default]
    Sql,
}

impl StorageKind {
    pub const ALL: [StorageKind; 7] = [
        StorageKind::Array,
        StorageKind::SortedArray,
        StorageKind::Map,
        StorageKind::ObjectFile,
        StorageKind::XmlFile,
        StorageKind::JsonFile,
        StorageKind::Sql,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::SortedArray => "sorted-array",
            Self::Map => "map",
            Self::ObjectFile => "object-file",
            Self::XmlFile => "xml-file",
            Self::JsonFile => "json-file",
            Self::Sql => "sql",
        }
    }
}

impl Display for StorageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unsupported storage `{value}`; expected one of {}",
                    Self::ALL.map(StorageKind::as_str).join("|")
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("resumes.sqlite3"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Log directory. Logging stays off when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageKind,
    /// Directory used by file-backed storages.
    pub storage_dir: PathBuf,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::default(),
            storage_dir: PathBuf::from("storage"),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        source: toml::de::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse {
                path: Some(path),
                source,
            } => write!(f, "invalid config `{}`: {source}", path.display()),
            Self::Parse { path: None, source } => write!(f, "invalid config: {source}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl AppConfig {
    /// Parses TOML text. Relative paths are left as written.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse { path: None, source })
    }

    /// Rebases relative storage, database and log paths onto `base`.
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        if self.storage_dir.is_relative() {
            self.storage_dir = base.join(&self.storage_dir);
        }
        if self.database.path.is_relative() {
            self.database.path = base.join(&self.database.path);
        }
        if let Some(dir) = self.logging.dir.take() {
            self.logging.dir = Some(if dir.is_relative() { base.join(dir) } else { dir });
        }
        self
    }

    /// Opens the configured backend.
    pub fn open_storage(&self) -> StorageResult<Box<dyn Storage>> {
        let storage: Box<dyn Storage> = match self.storage {
            StorageKind::Array => Box::new(ArrayStorage::new()),
            StorageKind::SortedArray => Box::new(SortedArrayStorage::new()),
            StorageKind::Map => Box::new(MapStorage::new()),
            StorageKind::ObjectFile => {
                Box::new(PathStorage::new(&self.storage_dir, ObjectStreamSerializer)?)
            }
            StorageKind::XmlFile => {
                Box::new(PathStorage::new(&self.storage_dir, XmlStreamSerializer)?)
            }
            StorageKind::JsonFile => {
                Box::new(PathStorage::new(&self.storage_dir, JsonStreamSerializer)?)
            }
            StorageKind::Sql => Box::new(SqlStorage::open(&self.database.path)),
        };
        Ok(storage)
    }
}

/// Loads config from `path`, resolving relative paths against its directory.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: Some(path.to_path_buf()),
        source,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.resolve_relative_to(base))
}

#[cfg(test)]
mod tests {
    use super::{load_config, AppConfig, ConfigError, StorageKind};
    use std::path::PathBuf;

    #[test]
    fn empty_text_yields_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage, StorageKind::Sql);
    }

    #[test]
    fn parses_all_sections() {
        let config = AppConfig::from_toml_str(
            r#"
storage = "xml-file"
storage_dir = "/var/lib/resumes"

[database]
path = "/var/lib/resumes.sqlite3"

[logging]
level = "debug"
dir = "/var/log/resumes"
"#,
        )
        .unwrap();

        assert_eq!(config.storage, StorageKind::XmlFile);
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/resumes"));
        assert_eq!(config.database.path, PathBuf::from("/var/lib/resumes.sqlite3"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.dir, Some(PathBuf::from("/var/log/resumes")));
    }

    #[test]
    fn unknown_storage_kind_is_a_parse_error() {
        let err = AppConfig::from_toml_str(r#"storage = "ldap""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn load_config_resolves_relative_paths_against_file_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resumes.toml");
        std::fs::write(
            &path,
            "storage_dir = \"files\"\n[database]\npath = \"db/r.sqlite3\"\n[logging]\ndir = \"logs\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.storage_dir, dir.path().join("files"));
        assert_eq!(config.database.path, dir.path().join("db/r.sqlite3"));
        assert_eq!(config.logging.dir, Some(dir.path().join("logs")));
    }

    #[test]
    fn load_config_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn storage_kind_from_str_accepts_known_names() {
        assert_eq!("SQL".parse::<StorageKind>(), Ok(StorageKind::Sql));
        assert_eq!(
            " sorted-array ".parse::<StorageKind>(),
            Ok(StorageKind::SortedArray)
        );
        assert!("ldap".parse::<StorageKind>().unwrap_err().contains("expected"));
    }
}
