use std::fs;
use std::path::Path;
use std::time::Duration;

use diary_core::crypto::{decrypt, derive_key, encrypt};
use diary_core::storage::{NewNote, NoteId, NoteStore, SqliteStore, StoreOptions, DB_FILE_NAME};
use diary_core::{DiaryError, InitOutcome, NoteDraft, Session};
use rusqlite::Connection;
use secrecy::SecretString;
use tempfile::tempdir;

fn open(dir: &Path) -> SqliteStore {
    SqliteStore::open(dir, &StoreOptions::default()).expect("open should succeed")
}

/// Concatenated bytes of the database file and its WAL, as hex.
fn on_disk_hex(dir: &Path) -> String {
    let mut bytes = Vec::new();
    for name in [DB_FILE_NAME.to_string(), format!("{}-wal", DB_FILE_NAME)] {
        if let Ok(content) = fs::read(dir.join(name)) {
            bytes.extend(content);
        }
    }
    hex::encode(bytes)
}

#[test]
fn test_end_to_end_scenario() {
    let dir = tempdir().expect("tempdir should succeed");
    let store = open(dir.path());
    assert_eq!(
        store.initialize().expect("initialize should succeed"),
        InitOutcome::Created
    );

    let salt = store.get_salt().expect("salt should exist");
    let key = derive_key("correct-password", &salt);

    let note = NewNote {
        title: encrypt(&key, b"Diary").expect("encrypt should succeed"),
        tags: encrypt(&key, b"personal").expect("encrypt should succeed"),
        body: encrypt(&key, b"Today was fine").expect("encrypt should succeed"),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    };
    let id = store.insert_note(&note).expect("insert should succeed");
    assert_eq!(id, NoteId(1));

    let listed = store.list_notes().expect("list should succeed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, NoteId(1));
    assert_eq!(listed[0].created_at, "2024-01-01T00:00:00Z");

    let record = store.get_note(NoteId(1)).expect("get should succeed");
    assert_eq!(&*decrypt(&key, &record.title).unwrap(), b"Diary");
    assert_eq!(&*decrypt(&key, &record.tags).unwrap(), b"personal");
    assert_eq!(&*decrypt(&key, &record.body).unwrap(), b"Today was fine");

    let wrong = derive_key("wrong-password", &salt);
    assert!(matches!(
        decrypt(&wrong, &record.title),
        Err(DiaryError::Decryption)
    ));
}

#[test]
fn test_body_only_match_found_case_insensitively() {
    let dir = tempdir().expect("tempdir should succeed");
    let store = open(dir.path());
    store.initialize().expect("initialize should succeed");

    let session = Session::unlock(&store, &SecretString::from("pw".to_string()))
        .expect("unlock should succeed");
    session
        .add_note(
            &store,
            &NoteDraft {
                title: "Errands".to_string(),
                tags: String::new(),
                body: "post office".to_string(),
            },
        )
        .expect("add should succeed");
    let target = session
        .add_note(
            &store,
            &NoteDraft {
                title: "Monday".to_string(),
                tags: "work".to_string(),
                body: "Met the Quarterly Review deadline".to_string(),
            },
        )
        .expect("add should succeed");

    let hits = session
        .search(&store, "quarterly review")
        .expect("search should succeed");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, target);
    assert!(hits[0].in_body);
    assert!(!hits[0].in_title);
}

#[test]
fn test_no_plaintext_reaches_disk() {
    let dir = tempdir().expect("tempdir should succeed");
    let store = open(dir.path());
    store.initialize().expect("initialize should succeed");

    let session = Session::unlock(&store, &SecretString::from("pw".to_string()))
        .expect("unlock should succeed");
    session
        .add_note(
            &store,
            &NoteDraft {
                title: "UniqueTitleMarker".to_string(),
                tags: "UniqueTagMarker".to_string(),
                body: "UniqueBodyMarker".to_string(),
            },
        )
        .expect("add should succeed");

    let disk = on_disk_hex(dir.path());
    assert!(!disk.is_empty());
    for marker in ["UniqueTitleMarker", "UniqueTagMarker", "UniqueBodyMarker"] {
        assert!(!disk.contains(&hex::encode(marker)), "{} leaked", marker);
    }
}

#[test]
fn test_key_debug_is_redacted() {
    let dir = tempdir().expect("tempdir should succeed");
    let store = open(dir.path());
    store.initialize().expect("initialize should succeed");

    let key = derive_key("pw", &store.get_salt().unwrap());
    let debug = format!("{:?}", key);
    assert!(debug.contains("REDACTED"));
    assert!(!debug.contains(&hex::encode(key.as_bytes())));
}

#[test]
fn test_second_handle_sees_committed_notes() {
    let dir = tempdir().expect("tempdir should succeed");
    let writer = open(dir.path());
    writer.initialize().expect("initialize should succeed");
    let reader = open(dir.path());

    assert_eq!(
        reader.initialize().expect("initialize should succeed"),
        InitOutcome::AlreadyInitialized
    );
    assert_eq!(writer.get_salt().unwrap(), reader.get_salt().unwrap());

    let session = Session::unlock(&writer, &SecretString::from("pw".to_string()))
        .expect("unlock should succeed");
    let id = session
        .add_note(
            &writer,
            &NoteDraft {
                title: "shared".to_string(),
                tags: String::new(),
                body: String::new(),
            },
        )
        .expect("add should succeed");

    assert_eq!(session.read_note(&reader, id).unwrap().title, "shared");
}

#[test]
fn test_locked_writer_surfaces_busy_while_reads_proceed() {
    let dir = tempdir().expect("tempdir should succeed");
    let options = StoreOptions {
        busy_timeout: Duration::from_millis(20),
        busy_retries: 2,
        retry_backoff: Duration::from_millis(5),
    };
    let store = SqliteStore::open(dir.path(), &options).expect("open should succeed");
    store.initialize().expect("initialize should succeed");

    let note = NewNote {
        title: vec![1],
        tags: vec![2],
        body: vec![3],
        created_at: "2024-01-01T00:00:00Z".to_string(),
    };
    store.insert_note(&note).expect("insert should succeed");

    let blocker = Connection::open(dir.path().join(DB_FILE_NAME)).expect("raw open");
    blocker
        .execute_batch("BEGIN IMMEDIATE")
        .expect("raw lock should succeed");

    // WAL readers are not blocked by the pending writer.
    assert_eq!(store.list_notes().expect("list should succeed").len(), 1);

    let result = store.insert_note(&note);
    assert!(matches!(result, Err(DiaryError::Busy { attempts: 2 })));
    assert_eq!(store.note_count().unwrap(), 1);

    blocker.execute_batch("COMMIT").expect("raw commit");
    let id = store.insert_note(&note).expect("insert after release");
    assert_eq!(id, NoteId(2));
}

#[test]
fn test_backup_is_readable_with_same_password() {
    let dir = tempdir().expect("tempdir should succeed");
    let store = open(dir.path());
    store.initialize().expect("initialize should succeed");
    let password = SecretString::from("pw".to_string());

    let session = Session::unlock(&store, &password).expect("unlock should succeed");
    session
        .add_note(
            &store,
            &NoteDraft {
                title: "kept".to_string(),
                tags: "a".to_string(),
                body: "safe".to_string(),
            },
        )
        .expect("add should succeed");

    let dest = dir.path().join("out").join("backup.db");
    store.backup_to(&dest).expect("backup should succeed");

    let copy = SqliteStore::open_file(&dest, &StoreOptions::default()).expect("open copy");
    copy.check_integrity().expect("copy should be intact");
    let restored = Session::unlock(&copy, &password).expect("unlock copy");
    assert_eq!(restored.verify_all(&copy).unwrap(), 1);
}
