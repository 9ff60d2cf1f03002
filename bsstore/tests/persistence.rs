//! Stores survive a reopen and tolerate concurrent writers

use bsstore::{PlaylistStore, StarredStore, StoreError};
use std::sync::Arc;

#[tokio::test]
async fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let starred = StarredStore::new(dir.path());
        starred.star(["abc123", "def456"]).await.unwrap();
        let playlists = PlaylistStore::new(dir.path());
        playlists.create("Mix", "12345").await.unwrap();
    }

    let starred = StarredStore::new(dir.path());
    assert_eq!(starred.list().await.unwrap(), vec!["abc123", "def456"]);

    let playlists = PlaylistStore::new(dir.path());
    let all = playlists.list().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "bili-12345");
    assert_eq!(all[0].name, "Mix");
}

#[tokio::test]
async fn test_concurrent_stars_are_all_kept() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(StarredStore::new(dir.path()));

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.star([format!("id{i}")]).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let mut ids = store.list().await.unwrap();
    ids.sort();
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn test_corrupt_playlist_file_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("playlists.dat"), "{not json").unwrap();

    let store = PlaylistStore::new(dir.path());
    assert!(matches!(store.list().await, Err(StoreError::Json(_))));
}

#[tokio::test]
async fn test_store_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("deep").join("data");

    let store = StarredStore::new(&nested);
    store.star(["x"]).await.unwrap();
    assert!(nested.join("starred.dat").is_file());
}
