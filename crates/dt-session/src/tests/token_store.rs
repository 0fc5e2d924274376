use crate::token_store::{
    FileTokenStore, MemoryTokenStore, PersistedSession, StorageError, StorageKey, TokenStore,
};

use std::sync::{Arc, Barrier};
use std::thread;

use googletest::assert_that;
use googletest::prelude::{eq, none, some};
use tempfile::TempDir;

fn sample_session() -> PersistedSession {
    PersistedSession::new("tok-123", "Admin User", "1")
}

#[test]
fn test_storage_key_names() {
    let names: Vec<&str> = StorageKey::ALL.iter().map(|k| k.as_str()).collect();
    assert_eq!(names, vec!["token", "username", "userId"]);
}

#[test]
fn given_empty_memory_store_when_read_then_nothing_stored() {
    let store = MemoryTokenStore::new();

    assert_that!(store.read_token().unwrap(), none());
    assert!(store.is_empty());
}

#[test]
fn given_memory_store_when_write_then_all_entries_readable() {
    let store = MemoryTokenStore::new();

    store.write(&sample_session()).unwrap();

    assert_that!(store.read_token().unwrap(), some(eq("tok-123")));
    assert_that!(store.read_username().unwrap(), some(eq("Admin User")));
    assert_that!(store.read_user_id().unwrap(), some(eq("1")));
    assert_eq!(store.len(), 3);
}

#[test]
fn given_memory_store_when_clear_twice_then_empty_and_no_error() {
    let store = MemoryTokenStore::new();
    store.write(&sample_session()).unwrap();

    store.clear().unwrap();
    store.clear().unwrap();

    assert!(store.is_empty());
}

#[test]
fn given_missing_directory_when_file_store_reads_then_none() {
    let temp = TempDir::new().unwrap();
    let store = FileTokenStore::new(temp.path().join("does-not-exist"));

    assert_that!(store.read_token().unwrap(), none());
}

#[test]
fn given_file_store_when_write_then_directory_created_and_entries_persist() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("session");
    let store = FileTokenStore::new(&dir);

    store.write(&sample_session()).unwrap();

    // A second handle on the same directory sees the same entries
    let reopened = FileTokenStore::new(&dir);
    assert_that!(reopened.read_token().unwrap(), some(eq("tok-123")));
    assert_that!(reopened.read_user_id().unwrap(), some(eq("1")));
    assert!(dir.join("userId").exists());
}

#[test]
fn given_file_store_when_overwrite_then_no_temp_files_left() {
    let temp = TempDir::new().unwrap();
    let store = FileTokenStore::new(temp.path());

    store.set(StorageKey::Token, "first").unwrap();
    store.set(StorageKey::Token, "second").unwrap();

    assert_that!(store.read_token().unwrap(), some(eq("second")));
    let leftovers = std::fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn given_file_store_when_clear_then_entries_removed() {
    let temp = TempDir::new().unwrap();
    let store = FileTokenStore::new(temp.path());
    store.write(&sample_session()).unwrap();

    store.clear().unwrap();

    assert_that!(store.read_token().unwrap(), none());
    assert_that!(store.read_username().unwrap(), none());
    assert_that!(store.read_user_id().unwrap(), none());
}

#[test]
fn given_file_store_when_remove_missing_entry_then_ok() {
    let temp = TempDir::new().unwrap();
    let store = FileTokenStore::new(temp.path());

    assert!(store.remove(StorageKey::Username).is_ok());
}

#[test]
fn given_directory_path_is_a_file_when_write_then_non_transient_error() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("session");
    std::fs::write(&blocker, "not a directory").unwrap();
    let store = FileTokenStore::new(&blocker);

    let err = store.write(&sample_session()).unwrap_err();

    assert_eq!(store.dir(), blocker.as_path());
    assert!(matches!(err, StorageError::DirCreation { .. }));
    assert!(!err.is_transient());
}

#[test]
fn given_two_threads_when_write_same_directory_concurrently_then_every_write_succeeds() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FileTokenStore::new(temp.path()));

    for round in 0..100 {
        let barrier = Arc::new(Barrier::new(2));
        let writers: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|who| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    store.write(&PersistedSession::new(
                        &format!("tok-{who}-{round}"),
                        who,
                        &round.to_string(),
                    ))
                })
            })
            .collect();

        for writer in writers {
            assert!(writer.join().unwrap().is_ok(), "round {round}");
        }
    }

    let token = store.read_token().unwrap().unwrap();
    assert!(token == "tok-a-99" || token == "tok-b-99");
    assert_that!(store.read_user_id().unwrap(), some(eq("99")));
}
