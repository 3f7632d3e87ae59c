use std::time::Duration;

use dataset_registry::cache::CacheOp;
use dataset_registry::sync::SyncAction;
use dataset_registry::{
    CacheError, DatasetCache, DatasetLifecycle, DatasetState, InMemoryDatasetCache,
    InMemoryMetadataStore, LifecycleError,
};

use crate::support::{lifecycle_with, options, quoref, ALICE, SYNC_TIMEOUT};

#[test]
fn pending_while_fetch_runs() {
    let cache = InMemoryDatasetCache::new().with_delay(Duration::from_millis(300));
    cache.publish("quoref");
    let lifecycle = DatasetLifecycle::new(InMemoryMetadataStore::new(), cache, options());

    lifecycle.create(quoref(), ALICE).unwrap();
    assert_eq!(
        lifecycle.sync_status("quoref").unwrap(),
        DatasetState::PendingSync
    );
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(lifecycle.sync_status("quoref").unwrap(), DatasetState::Synced);
}

#[test]
fn create_then_delete_runs_in_trigger_order() {
    let cache = InMemoryDatasetCache::new().with_delay(Duration::from_millis(20));
    cache.publish("quoref");
    let lifecycle = DatasetLifecycle::new(InMemoryMetadataStore::new(), cache.clone(), options());

    for _ in 0..3 {
        lifecycle.create(quoref(), ALICE).unwrap();
        lifecycle.delete("quoref", ALICE).unwrap();
    }
    lifecycle.create(quoref(), ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));

    let ops = cache.operations();
    assert_eq!(ops.len(), 7);
    for (i, op) in ops.iter().enumerate() {
        let expected = if i % 2 == 0 {
            CacheOp::Fetch("quoref".into())
        } else {
            CacheOp::Remove("quoref".into())
        };
        assert_eq!(op, &expected);
    }
    assert!(cache.exists("quoref"));
}

#[test]
fn transient_failure_then_resync() {
    let (lifecycle, _, cache) = lifecycle_with(&["quoref"]);
    cache.fail_with("quoref", CacheError::Transient {
        name: "quoref".into(),
        reason: "connection reset".into(),
    });

    lifecycle.create(quoref(), ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert!(matches!(
        lifecycle.sync_status("quoref").unwrap(),
        DatasetState::SyncFailed { error: Some(_) }
    ));

    cache.clear_failure("quoref");
    lifecycle.resync("quoref", ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(lifecycle.sync_status("quoref").unwrap(), DatasetState::Synced);
    assert!(lifecycle.sync_failures().is_empty());
}

#[test]
fn resync_requires_registration_and_identity() {
    let (lifecycle, _, _) = lifecycle_with(&["quoref"]);
    assert_eq!(
        lifecycle.resync("quoref", ALICE),
        Err(LifecycleError::NotFound("quoref".into()))
    );
    lifecycle.create(quoref(), ALICE).unwrap();
    assert!(matches!(
        lifecycle.resync("quoref", None),
        Err(LifecycleError::Forbidden(_))
    ));
}

#[test]
fn reconcile_schedules_only_diverged_datasets() {
    let (lifecycle, _, cache) = lifecycle_with(&["squad"]);
    let mut squad = quoref();
    squad.name = "squad".into();

    lifecycle.create(quoref(), ALICE).unwrap();
    lifecycle.create(squad, ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(lifecycle.sync_status("squad").unwrap(), DatasetState::Synced);

    // quoref becomes available upstream after its fetch failed.
    cache.publish("quoref");
    assert_eq!(lifecycle.reconcile(Some("ops-bot")).unwrap(), vec!["quoref"]);
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(lifecycle.sync_status("quoref").unwrap(), DatasetState::Synced);
    assert!(lifecycle.reconcile(Some("ops-bot")).unwrap().is_empty());
}

#[test]
fn missing_cache_copy_is_reported_without_error() {
    let (lifecycle, _, cache) = lifecycle_with(&["quoref"]);
    lifecycle.create(quoref(), ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));

    // Evicted behind the registry's back.
    cache.remove("quoref").unwrap();
    assert_eq!(
        lifecycle.sync_status("quoref").unwrap(),
        DatasetState::SyncFailed { error: None }
    );
    assert_eq!(lifecycle.reconcile(ALICE).unwrap(), vec!["quoref"]);
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert!(cache.exists("quoref"));
}

#[test]
fn mutations_succeed_after_sync_shutdown() {
    let (lifecycle, _, cache) = lifecycle_with(&["quoref"]);
    lifecycle.shutdown_sync();

    assert_eq!(lifecycle.create(quoref(), ALICE).unwrap(), "quoref");
    assert_eq!(lifecycle.get("quoref").unwrap(), quoref());
    assert!(!cache.exists("quoref"));
    match lifecycle.sync_status("quoref").unwrap() {
        DatasetState::SyncFailed { error: Some(error) } => {
            assert_eq!(error, "sync queue is shut down")
        }
        other => panic!("unexpected state {:?}", other),
    }
}

#[test]
fn reconcile_replaces_copy_kept_after_failed_refresh() {
    let (lifecycle, _, cache) = lifecycle_with(&["quoref"]);
    lifecycle.create(quoref(), ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(cache.cached_revision("quoref"), Some(1));

    cache.publish("quoref");
    cache.fail_with("quoref", CacheError::Transient {
        name: "quoref".into(),
        reason: "connection reset".into(),
    });
    let mut updated = quoref();
    updated.metric = "accuracy".into();
    lifecycle.update(updated, ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert!(matches!(
        lifecycle.sync_status("quoref").unwrap(),
        DatasetState::SyncFailed { error: Some(_) }
    ));
    assert_eq!(cache.cached_revision("quoref"), Some(1));

    cache.clear_failure("quoref");
    assert_eq!(lifecycle.reconcile(ALICE).unwrap(), vec!["quoref"]);
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(lifecycle.sync_status("quoref").unwrap(), DatasetState::Synced);
    assert_eq!(cache.cached_revision("quoref"), Some(2));
    assert_eq!(
        cache.operations().last(),
        Some(&CacheOp::Refresh("quoref".into()))
    );
}

#[test]
fn resync_downloads_current_revision() {
    let (lifecycle, _, cache) = lifecycle_with(&["quoref"]);
    lifecycle.create(quoref(), ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));

    cache.publish("quoref");
    lifecycle.resync("quoref", ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(cache.cached_revision("quoref"), Some(2));
}

#[test]
fn failed_remove_is_recorded_and_delete_stands() {
    let (lifecycle, _, cache) = lifecycle_with(&["quoref"]);
    lifecycle.create(quoref(), ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));

    cache.fail_with("quoref", CacheError::Remove {
        name: "quoref".into(),
        reason: "device busy".into(),
    });
    lifecycle.delete("quoref", ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));

    assert_eq!(
        lifecycle.get("quoref"),
        Err(LifecycleError::NotFound("quoref".into()))
    );
    assert_eq!(
        lifecycle.sync_status("quoref").unwrap(),
        DatasetState::Unregistered
    );
    assert!(cache.exists("quoref"));

    let failures = lifecycle.sync_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "quoref");
    assert_eq!(failures[0].1.action, SyncAction::Remove);
    assert!(failures[0].1.error().unwrap().contains("device busy"));
    assert_eq!(lifecycle.sync_stats().failed, 1);

    // The registry keeps serving after the failed removal.
    cache.clear_failure("quoref");
    lifecycle.create(quoref(), ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(lifecycle.sync_status("quoref").unwrap(), DatasetState::Synced);
    assert!(lifecycle.sync_failures().is_empty());
}
