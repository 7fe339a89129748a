//! Connection provider and transactional statement runner.
//!
//! # Responsibility
//! - Produce one live connection per storage operation.
//! - Run single statements or multi-statement units of work.
//!
//! # Invariants
//! - A unit of work commits only when it returns `Ok`.
//! - Any `Err` rolls the transaction back before it reaches the caller.
//! - The connection is released on every path.

use crate::db::{open_db, DbResult};
use crate::storage::{StorageError, StorageResult};
use log::{debug, error, warn};
use rusqlite::{Connection, ErrorCode, Statement, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Factory producing a migrated, ready-to-use connection.
pub trait ConnectionFactory {
    fn connect(&self) -> DbResult<Connection>;
}

impl<F> ConnectionFactory for F
where
    F: Fn() -> DbResult<Connection>,
{
    fn connect(&self) -> DbResult<Connection> {
        self()
    }
}

/// Opens the SQLite database file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteFileFactory {
    path: PathBuf,
}

impl SqliteFileFactory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionFactory for SqliteFileFactory {
    fn connect(&self) -> DbResult<Connection> {
        open_db(&self.path)
    }
}

/// Statement runner scoped to one connection per call.
#[derive(Debug, Clone)]
pub struct SqlHelper<F> {
    factory: F,
}

impl<F: ConnectionFactory> SqlHelper<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Prepares `sql` on a fresh connection and hands the statement to `work`.
    pub fn execute<T>(
        &self,
        sql: &str,
        work: impl FnOnce(&mut Statement<'_>) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let conn = self.factory.connect()?;
        let mut stmt = conn.prepare(sql)?;
        work(&mut stmt)
    }

    /// Runs `work` inside one immediate transaction.
    ///
    /// Commits on `Ok`; rolls back and returns the original error on `Err`.
    pub fn transactional_execute<T>(
        &self,
        work: impl FnOnce(&Transaction<'_>) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let started_at = Instant::now();
        let mut conn = self.factory.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        match work(&tx) {
            Ok(value) => {
                tx.commit()?;
                debug!(
                    "event=sql_tx module=sql status=ok action=commit duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    error!(
                        "event=sql_tx module=sql status=error action=rollback error_code=rollback_failed error={rollback_err}"
                    );
                }
                warn!(
                    "event=sql_tx module=sql status=error action=rollback duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}

/// Returns whether `err` is a primary-key or unique constraint violation.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && matches!(
                    failure.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                )
        }
        _ => false,
    }
}

/// Maps a failed insert of `uuid` to `Conflict` when the key is taken.
pub fn map_insert_error(err: rusqlite::Error, uuid: &str) -> StorageError {
    if is_unique_violation(&err) {
        StorageError::Conflict(uuid.to_string())
    } else {
        StorageError::from(err).with_uuid(uuid)
    }
}
