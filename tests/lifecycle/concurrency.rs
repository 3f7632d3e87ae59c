use std::sync::{Arc, Barrier};
use std::thread;

use dataset_registry::{DatasetLifecycle, InMemoryDatasetCache, InMemoryMetadataStore, LifecycleError, MetadataStore};

use crate::support::{options, quoref, Lifecycle, ALICE, SYNC_TIMEOUT};

fn shared_lifecycle(published: &[&str]) -> (Arc<Lifecycle>, InMemoryMetadataStore, InMemoryDatasetCache) {
    let store = InMemoryMetadataStore::new();
    let cache = InMemoryDatasetCache::new();
    for name in published {
        cache.publish(name);
    }
    let lifecycle = DatasetLifecycle::new(store.clone(), cache.clone(), options());
    (Arc::new(lifecycle), store, cache)
}

#[test]
fn concurrent_update_and_delete_leave_one_outcome() {
    for _ in 0..50 {
        let (lifecycle, store, _) = shared_lifecycle(&["quoref"]);
        lifecycle.create(quoref(), ALICE).unwrap();

        let barrier = Arc::new(Barrier::new(2));
        let updater = {
            let lifecycle = Arc::clone(&lifecycle);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut record = quoref();
                record.metric = "accuracy".into();
                barrier.wait();
                lifecycle.update(record, ALICE)
            })
        };
        let deleter = {
            let lifecycle = Arc::clone(&lifecycle);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                lifecycle.delete("quoref", ALICE)
            })
        };

        let updated = updater.join().unwrap();
        let deleted = deleter.join().unwrap();
        assert_eq!(deleted, Ok(()));

        match updated {
            // Update committed first, then the delete removed it.
            Ok(()) => {}
            Err(LifecycleError::NotFound(name)) => assert_eq!(name, "quoref"),
            Err(other) => panic!("unexpected update error {:?}", other),
        }
        assert!(store.get("quoref").unwrap().is_none());
        assert!(store.list().unwrap().is_empty());
        assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    }
}

#[test]
fn concurrent_creates_of_one_name_admit_exactly_one() {
    let (lifecycle, store, _) = shared_lifecycle(&["quoref"]);
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let lifecycle = Arc::clone(&lifecycle);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut record = quoref();
                record.metric = if i % 2 == 0 { "squad" } else { "accuracy" }.into();
                barrier.wait();
                lifecycle.create(record, ALICE)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let created = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(created, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == LifecycleError::AlreadyExists("quoref".into())));
    assert_eq!(store.len(), 1);
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(lifecycle.sync_stats().scheduled, 1);
}

#[test]
fn creates_on_different_names_proceed_independently() {
    let names: Vec<String> = (0..16).map(|i| format!("dataset-{i}")).collect();
    let published: Vec<&str> = names.iter().map(String::as_str).collect();
    let (lifecycle, store, cache) = shared_lifecycle(&published);

    let handles: Vec<_> = names
        .iter()
        .cloned()
        .map(|name| {
            let lifecycle = Arc::clone(&lifecycle);
            thread::spawn(move || {
                let mut record = quoref();
                record.name = name;
                lifecycle.create(record, ALICE)
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(store.len(), 16);
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    for name in &names {
        assert_eq!(cache.cached_revision(name), Some(1));
    }
    assert_eq!(lifecycle.sync_stats().fetched, 16);
}
