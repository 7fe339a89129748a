//! Relational storage over the `resume` + `contact` tables.
//!
//! # Responsibility
//! - Keep a resume row and its contact rows consistent under every write.
//! - Fold row-per-contact join results back into one resume per uuid.
//!
//! # Invariants
//! - `save` and `update` run as a single transaction; a resume is never
//!   visible without its contacts.
//! - `update` replaces the whole contact set (delete, then re-insert).
//! - Contact rows never outlive their resume (`ON DELETE CASCADE`).
//! - Listing order comes from SQL (`full_name, uuid`) and is not re-sorted.

use crate::model::resume::{ContactType, Resume};
use crate::sql::{map_insert_error, ConnectionFactory, SqlHelper, SqliteFileFactory};
use crate::storage::{StorageBackend, StorageError, StorageResult};
use rusqlite::{params, Row, Rows, Transaction};
use std::collections::HashMap;
use std::path::PathBuf;

const RESUME_JOIN_SQL: &str = "SELECT
    r.uuid AS uuid,
    r.full_name AS full_name,
    c.type AS type,
    c.value AS value
FROM resume r
LEFT JOIN contact c ON r.uuid = c.resume_uuid";

pub struct SqlStorage<F> {
    helper: SqlHelper<F>,
}

impl SqlStorage<SqliteFileFactory> {
    /// Storage over the SQLite file at `path`; each operation opens it anew.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(SqliteFileFactory::new(path))
    }
}

impl<F: ConnectionFactory> SqlStorage<F> {
    pub fn new(factory: F) -> Self {
        Self {
            helper: SqlHelper::new(factory),
        }
    }

    pub fn helper(&self) -> &SqlHelper<F> {
        &self.helper
    }

    fn query_ordered(&self) -> StorageResult<Vec<Resume>> {
        let sql = format!("{RESUME_JOIN_SQL} ORDER BY r.full_name, r.uuid, c.id;");
        self.helper.execute(&sql, |stmt| {
            let rows = stmt.query([])?;
            fold_rows(rows)
        })
    }
}

impl<F: ConnectionFactory> StorageBackend for SqlStorage<F> {
    type SearchKey = String;

    fn search_key(&self, uuid: &str) -> String {
        uuid.to_string()
    }

    fn is_exist(&self, key: &String) -> StorageResult<bool> {
        self.helper
            .execute(
                "SELECT EXISTS(SELECT 1 FROM resume WHERE uuid = ?1);",
                |stmt| {
                    let exists: i64 = stmt.query_row([key], |row| row.get(0))?;
                    Ok(exists == 1)
                },
            )
            .map_err(|err| err.with_uuid(key))
    }

    fn do_save(&mut self, resume: &Resume, key: String) -> StorageResult<()> {
        self.helper
            .transactional_execute(|tx| {
                tx.execute(
                    "INSERT INTO resume (uuid, full_name) VALUES (?1, ?2);",
                    params![key, resume.full_name()],
                )
                .map_err(|err| map_insert_error(err, &key))?;
                insert_contacts(tx, &key, resume)
            })
            .map_err(|err| err.with_uuid(&key))
    }

    fn do_update(&mut self, resume: &Resume, key: String) -> StorageResult<()> {
        self.helper
            .transactional_execute(|tx| {
                let changed = tx.execute(
                    "UPDATE resume SET full_name = ?1 WHERE uuid = ?2;",
                    params![resume.full_name(), key],
                )?;
                if changed == 0 {
                    return Err(StorageError::NotFound(key.clone()));
                }
                tx.execute("DELETE FROM contact WHERE resume_uuid = ?1;", [&key])?;
                insert_contacts(tx, &key, resume)
            })
            .map_err(|err| err.with_uuid(&key))
    }

    fn do_delete(&mut self, key: String) -> StorageResult<()> {
        self.helper
            .execute("DELETE FROM resume WHERE uuid = ?1;", |stmt| {
                if stmt.execute([&key])? == 0 {
                    return Err(StorageError::NotFound(key.clone()));
                }
                Ok(())
            })
            .map_err(|err| err.with_uuid(&key))
    }

    fn do_get(&self, key: &String) -> StorageResult<Resume> {
        let sql = format!("{RESUME_JOIN_SQL} WHERE r.uuid = ?1 ORDER BY c.id;");
        self.helper
            .execute(&sql, |stmt| {
                let rows = stmt.query([key])?;
                fold_rows(rows)?
                    .into_iter()
                    .next()
                    .ok_or_else(|| StorageError::NotFound(key.clone()))
            })
            .map_err(|err| err.with_uuid(key))
    }

    fn do_copy_all(&self) -> StorageResult<Vec<Resume>> {
        self.query_ordered()
    }

    fn do_copy_all_sorted(&self) -> StorageResult<Vec<Resume>> {
        self.query_ordered()
    }

    fn do_size(&self) -> StorageResult<usize> {
        self.helper.execute("SELECT count(*) FROM resume;", |stmt| {
            let count: i64 = stmt.query_row([], |row| row.get(0))?;
            usize::try_from(count)
                .map_err(|_| StorageError::invalid_data(None, format!("negative count {count}")))
        })
    }

    fn do_clear(&mut self) -> StorageResult<()> {
        self.helper.execute("DELETE FROM resume;", |stmt| {
            stmt.execute([])?;
            Ok(())
        })
    }
}

fn insert_contacts(tx: &Transaction<'_>, uuid: &str, resume: &Resume) -> StorageResult<()> {
    let mut stmt =
        tx.prepare_cached("INSERT INTO contact (resume_uuid, type, value) VALUES (?1, ?2, ?3);")?;
    for (kind, value) in resume.contacts() {
        stmt.execute(params![uuid, kind.as_db_str(), value])?;
    }
    Ok(())
}

/// Insertion-ordered accumulator folding join rows into resumes.
#[derive(Default)]
struct ResumeAccumulator {
    resumes: Vec<Resume>,
    positions: HashMap<String, usize>,
}

impl ResumeAccumulator {
    fn push_row(&mut self, row: &Row<'_>) -> StorageResult<()> {
        let uuid: String = row.get("uuid")?;
        let index = match self.positions.get(&uuid) {
            Some(index) => *index,
            None => {
                let full_name: String = row.get("full_name")?;
                self.resumes.push(Resume::with_id(uuid.clone(), full_name));
                let index = self.resumes.len() - 1;
                self.positions.insert(uuid.clone(), index);
                index
            }
        };

        let value: Option<String> = row.get("value")?;
        let Some(value) = value else {
            return Ok(());
        };
        let type_text: String = row.get("type")?;
        let kind = ContactType::parse_db_str(&type_text).ok_or_else(|| {
            StorageError::invalid_data(
                Some(uuid.as_str()),
                format!("invalid contact type `{type_text}` in contact.type"),
            )
        })?;
        self.resumes[index].add_contact(kind, value);
        Ok(())
    }

    fn into_resumes(self) -> Vec<Resume> {
        self.resumes
    }
}

fn fold_rows(mut rows: Rows<'_>) -> StorageResult<Vec<Resume>> {
    let mut accumulator = ResumeAccumulator::default();
    while let Some(row) = rows.next()? {
        accumulator.push_row(row)?;
    }
    Ok(accumulator.into_resumes())
}

