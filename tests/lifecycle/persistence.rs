use std::fs;

use dataset_registry::cache::DirectorySource;
use dataset_registry::{
    DatasetCache, DatasetLifecycle, DatasetState, FileMetadataStore, FsDatasetCache,
    LifecycleError,
};
use tempfile::tempdir;

use crate::support::{cosmos_qa, options, quoref, ALICE, SYNC_TIMEOUT};

fn mirror_dataset(root: &std::path::Path, name: &str, body: &[u8]) {
    let dir = root.join(name.replace('/', "--"));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("validation.jsonl"), body).unwrap();
}

#[test]
fn file_store_and_fs_cache_end_to_end() {
    let mirror = tempdir().unwrap();
    let metadata = tempdir().unwrap();
    let cache_root = tempdir().unwrap();
    mirror_dataset(mirror.path(), "quoref", b"{\"id\":\"q1\"}\n");

    let lifecycle = DatasetLifecycle::new(
        FileMetadataStore::open(metadata.path()).unwrap(),
        FsDatasetCache::open(cache_root.path(), DirectorySource::new(mirror.path())).unwrap(),
        options(),
    );

    lifecycle.create(quoref(), ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    let entry = lifecycle.cache().entry_dir("quoref").unwrap();
    assert_eq!(
        fs::read(entry.join("validation.jsonl")).unwrap(),
        b"{\"id\":\"q1\"}\n"
    );

    mirror_dataset(mirror.path(), "quoref", b"{\"id\":\"q2\"}\n");
    lifecycle.update(quoref(), ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    let entry = lifecycle.cache().entry_dir("quoref").unwrap();
    assert_eq!(
        fs::read(entry.join("validation.jsonl")).unwrap(),
        b"{\"id\":\"q2\"}\n"
    );

    lifecycle.delete("quoref", ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert!(!lifecycle.cache().exists("quoref"));
}

#[test]
fn metadata_survives_restart() {
    let mirror = tempdir().unwrap();
    let metadata = tempdir().unwrap();
    let cache_root = tempdir().unwrap();
    mirror_dataset(mirror.path(), "quoref", b"q");

    {
        let lifecycle = DatasetLifecycle::new(
            FileMetadataStore::open(metadata.path()).unwrap(),
            FsDatasetCache::open(cache_root.path(), DirectorySource::new(mirror.path())).unwrap(),
            options(),
        );
        lifecycle.create(quoref(), ALICE).unwrap();
        // cosmos_qa is not mirrored: its fetch fails.
        lifecycle.create(cosmos_qa(), ALICE).unwrap();
        assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    }

    let lifecycle = DatasetLifecycle::new(
        FileMetadataStore::open(metadata.path()).unwrap(),
        FsDatasetCache::open(cache_root.path(), DirectorySource::new(mirror.path())).unwrap(),
        options(),
    );
    assert_eq!(lifecycle.list().unwrap(), vec!["cosmos_qa", "quoref"]);
    assert_eq!(lifecycle.get("cosmos_qa").unwrap(), cosmos_qa());
    assert_eq!(lifecycle.sync_status("quoref").unwrap(), DatasetState::Synced);
    // The failure record did not survive the restart; the missing copy did.
    assert_eq!(
        lifecycle.sync_status("cosmos_qa").unwrap(),
        DatasetState::SyncFailed { error: None }
    );

    mirror_dataset(mirror.path(), "cosmos_qa", b"c");
    assert_eq!(lifecycle.reconcile(ALICE).unwrap(), vec!["cosmos_qa"]);
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(
        lifecycle.sync_status("cosmos_qa").unwrap(),
        DatasetState::Synced
    );
}

#[test]
fn encoded_separator_does_not_reach_prefixed_dataset() {
    let mirror = tempdir().unwrap();
    let metadata = tempdir().unwrap();
    let cache_root = tempdir().unwrap();
    mirror_dataset(mirror.path(), "allenai/quoref", b"q");

    let lifecycle = DatasetLifecycle::new(
        FileMetadataStore::open(metadata.path()).unwrap(),
        FsDatasetCache::open(cache_root.path(), DirectorySource::new(mirror.path())).unwrap(),
        options(),
    );
    let mut record = quoref();
    record.name = "allenai/quoref".into();
    lifecycle.create(record.clone(), ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));

    let alias = "allenai%2Fquoref";
    assert_eq!(
        lifecycle.get(alias),
        Err(LifecycleError::NotFound(alias.into()))
    );
    assert_eq!(
        lifecycle.sync_status(alias).unwrap(),
        DatasetState::Unregistered
    );
    assert!(matches!(
        lifecycle.delete(alias, ALICE),
        Err(LifecycleError::InvalidName { .. })
    ));
    assert!(matches!(
        lifecycle.resync(alias, ALICE),
        Err(LifecycleError::InvalidName { .. })
    ));
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));

    assert_eq!(lifecycle.get("allenai/quoref").unwrap(), record);
    assert!(lifecycle.cache().exists("allenai/quoref"));
    assert!(lifecycle.sync_failures().is_empty());
    assert_eq!(lifecycle.list().unwrap(), vec!["allenai/quoref"]);
}
