use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use minihttpd::store::{FileStore, MemoryStore, ResourceStore, StoreError, validate_name};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

fn scratch_dir() -> PathBuf {
    let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("minihttpd-store-{}-{}", std::process::id(), n))
}

#[test]
fn test_file_store_round_trip() {
    let root = scratch_dir();
    let store = FileStore::new(&root);

    store.write("greeting", b"hello\x00world").unwrap();
    let read = store.read("greeting").unwrap();

    assert_eq!(read.as_ref(), b"hello\x00world");
    assert!(root.join("greeting").exists());
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn test_file_store_creates_root() {
    let root = scratch_dir().join("nested");
    let store = FileStore::new(&root);

    store.write("a", b"1").unwrap();

    assert_eq!(store.root(), root.as_path());
    assert!(root.is_dir());
    std::fs::remove_dir_all(root.parent().unwrap()).ok();
}

#[test]
fn test_file_store_overwrites() {
    let root = scratch_dir();
    let store = FileStore::new(&root);

    store.write("a", b"first version").unwrap();
    store.write("a", b"second").unwrap();

    assert_eq!(store.read("a").unwrap(), "second");
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn test_file_store_missing_is_not_found() {
    let store = FileStore::new(scratch_dir());

    assert!(matches!(store.read("ghost"), Err(StoreError::NotFound(name)) if name == "ghost"));
}

#[test]
fn test_file_store_rejects_traversal() {
    let store = FileStore::new(scratch_dir());

    assert!(matches!(store.read(".."), Err(StoreError::InvalidName(_))));
    assert!(matches!(store.write("../escape", b"x"), Err(StoreError::InvalidName(_))));
}

#[test]
fn test_validate_name() {
    assert!(validate_name("report.txt").is_ok());
    assert!(validate_name("..hidden").is_ok());
    assert!(validate_name("").is_err());
    assert!(validate_name(".").is_err());
    assert!(validate_name("..").is_err());
    assert!(validate_name("a/b").is_err());
    assert!(validate_name("a\\b").is_err());
    assert!(validate_name("a\0b").is_err());
}

#[test]
fn test_memory_store() {
    let store = MemoryStore::new();
    assert!(store.is_empty());

    store.write("k", b"v").unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.read("k").unwrap(), "v");
    assert!(matches!(store.read("other"), Err(StoreError::NotFound(_))));
}
