use resume_core::db::open_db;
use resume_core::{
    ContactType, FailureCause, Resume, SqlStorage, Storage, StorageBackend, StorageError,
};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn temp_db() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resumes.sqlite3");
    (dir, path)
}

fn count(path: &Path, sql: &str) -> i64 {
    let conn = open_db(path).unwrap();
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

fn with_contacts(uuid: &str, full_name: &str) -> Resume {
    let mut resume = Resume::with_id(uuid, full_name);
    resume.add_contact(ContactType::Email, "a@b.com");
    resume.add_contact(ContactType::Phone, "123");
    resume
}

#[test]
fn failed_contact_insert_rolls_back_resume_row() {
    let (_dir, path) = temp_db();
    let conn = open_db(&path).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_contact BEFORE INSERT ON contact
         WHEN NEW.value = 'boom'
         BEGIN
            SELECT RAISE(ABORT, 'contact rejected');
         END;",
    )
    .unwrap();
    drop(conn);

    let mut storage = SqlStorage::open(&path);
    let mut resume = Resume::with_id("uuid1", "FullName1");
    resume.add_contact(ContactType::Email, "fine@example.com");
    resume.add_contact(ContactType::Skype, "boom");

    let err = storage.save(&resume).unwrap_err();
    match err {
        StorageError::Failure {
            uuid: Some(uuid),
            cause: FailureCause::Db(_),
        } => assert_eq!(uuid, "uuid1"),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(storage.size().unwrap(), 0);
    assert_eq!(count(&path, "SELECT count(*) FROM contact;"), 0);
    assert!(matches!(
        storage.get("uuid1").unwrap_err(),
        StorageError::NotFound(_)
    ));
}

#[test]
fn failed_update_keeps_previous_contacts() {
    let (_dir, path) = temp_db();
    let mut storage = SqlStorage::open(&path);
    let original = with_contacts("uuid1", "FullName1");
    storage.save(&original).unwrap();

    let conn = open_db(&path).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_contact BEFORE INSERT ON contact
         WHEN NEW.value = 'boom'
         BEGIN
            SELECT RAISE(ABORT, 'contact rejected');
         END;",
    )
    .unwrap();
    drop(conn);

    let mut changed = Resume::with_id("uuid1", "Renamed");
    changed.add_contact(ContactType::GitHub, "boom");
    assert!(storage.update(&changed).is_err());

    assert_eq!(storage.get("uuid1").unwrap(), original);
}

#[test]
fn delete_leaves_no_orphan_contacts() {
    let (_dir, path) = temp_db();
    let mut storage = SqlStorage::open(&path);
    storage.save(&with_contacts("uuid1", "FullName1")).unwrap();
    storage.save(&with_contacts("uuid2", "FullName2")).unwrap();
    assert_eq!(count(&path, "SELECT count(*) FROM contact;"), 4);

    storage.delete("uuid1").unwrap();
    assert_eq!(
        count(
            &path,
            "SELECT count(*) FROM contact WHERE resume_uuid = 'uuid1';"
        ),
        0
    );

    storage.clear().unwrap();
    assert_eq!(count(&path, "SELECT count(*) FROM contact;"), 0);
}

#[test]
fn size_counts_resumes_not_contact_rows() {
    let (_dir, path) = temp_db();
    let mut storage = SqlStorage::open(&path);
    storage.save(&with_contacts("uuid1", "FullName1")).unwrap();
    storage.save(&Resume::with_id("uuid2", "FullName2")).unwrap();

    assert_eq!(storage.size().unwrap(), 2);
    assert_eq!(storage.get_all_sorted().unwrap().len(), 2);
}

#[test]
fn data_survives_reopening_the_database() {
    let (_dir, path) = temp_db();
    let resume = with_contacts("uuid1", "FullName1");
    SqlStorage::open(&path).save(&resume).unwrap();

    let reopened = SqlStorage::open(&path);
    assert_eq!(reopened.get("uuid1").unwrap(), resume);
}

#[test]
fn open_targets_the_given_database_file() {
    let (_dir, path) = temp_db();
    let mut storage = SqlStorage::open(&path);
    assert_eq!(storage.helper().factory().path(), path.as_path());

    storage.save(&Resume::with_id("uuid1", "FullName1")).unwrap();
    assert_eq!(count(&path, "SELECT count(*) FROM resume;"), 1);
}

#[test]
fn primary_key_violation_maps_to_conflict() {
    let (_dir, path) = temp_db();
    let mut storage = SqlStorage::open(&path);
    storage.save(&Resume::with_id("uuid1", "FullName1")).unwrap();

    // Bypasses the existence check to hit the insert path directly.
    let err = storage
        .do_save(&Resume::with_id("uuid1", "Other"), "uuid1".to_string())
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict(ref uuid) if uuid == "uuid1"));
    assert_eq!(storage.get("uuid1").unwrap().full_name(), "FullName1");
}

#[test]
fn unknown_contact_type_in_row_is_reported_as_failure() {
    let (_dir, path) = temp_db();
    let mut storage = SqlStorage::open(&path);
    storage.save(&Resume::with_id("uuid1", "FullName1")).unwrap();

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO contact (resume_uuid, type, value) VALUES ('uuid1', 'FAX', '42');",
        [],
    )
    .unwrap();
    drop(conn);

    let err = storage.get("uuid1").unwrap_err();
    assert!(matches!(
        err,
        StorageError::Failure {
            cause: FailureCause::InvalidData(_),
            ..
        }
    ));
}

#[test]
fn unreachable_database_is_a_failure_not_a_business_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let storage = SqlStorage::open(blocker.join("resumes.sqlite3"));
    let err = storage.get("uuid1").unwrap_err();
    assert!(!err.is_business());
    assert!(matches!(
        err,
        StorageError::Failure {
            uuid: Some(ref uuid),
            ..
        } if uuid == "uuid1"
    ));
}

#[test]
fn contact_rows_use_persisted_type_names() {
    let (_dir, path) = temp_db();
    let mut storage = SqlStorage::open(&path);
    let mut resume = Resume::with_id("uuid1", "FullName1");
    resume.add_contact(ContactType::LinkedIn, "https://linkedin.com/in/one");
    storage.save(&resume).unwrap();

    let conn = Connection::open(&path).unwrap();
    let kind: String = conn
        .query_row(
            "SELECT type FROM contact WHERE resume_uuid = 'uuid1';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(kind, "LINKEDIN");
}
