use gonv_fs::{AtomicWriteOptions, Workspace, atomic_write, publish_dir, PublishOptions};
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

#[test]
fn test_atomic_write_replaces_existing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version");

    std::fs::write(&path, "1.20.0").unwrap();
    atomic_write(&path, b"1.21.0", AtomicWriteOptions::new()).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"1.21.0");
}

#[test]
fn test_concurrent_writers_never_tear() {
    let dir = tempdir().unwrap();
    let path = Arc::new(dir.path().join("shared"));
    let payloads: Vec<Vec<u8>> = (0..8u8).map(|i| vec![b'a' + i; 4096]).collect();

    let handles: Vec<_> = payloads
        .iter()
        .cloned()
        .map(|payload| {
            let path = Arc::clone(&path);
            thread::spawn(move || {
                for _ in 0..10 {
                    atomic_write(path.as_path(), &payload, AtomicWriteOptions::new()).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let content = std::fs::read(path.as_path()).unwrap();
    assert!(payloads.contains(&content));
}

#[test]
fn test_racing_publishes_have_one_winner() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("versions").join("1.21.0");

    let first = Workspace::sibling(&dest).unwrap();
    std::fs::write(first.path().join("owner"), "first").unwrap();
    let second = Workspace::sibling(&dest).unwrap();
    std::fs::write(second.path().join("owner"), "second").unwrap();

    first.commit().unwrap();
    let err = second.commit().unwrap_err();
    assert!(err.is_conflict());

    assert_eq!(std::fs::read_to_string(dest.join("owner")).unwrap(), "first");
    let leftovers = std::fs::read_dir(dir.path().join("versions")).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn test_publish_dir_missing_source() {
    let dir = tempdir().unwrap();
    let err = publish_dir(
        dir.path().join("nope"),
        dir.path().join("dest"),
        PublishOptions::new(),
    )
    .unwrap_err();
    assert!(err.is_not_found());
}
