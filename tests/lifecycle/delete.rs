use dataset_registry::cache::CacheOp;
use dataset_registry::{DatasetCache, DatasetState, LifecycleError};

use crate::support::{lifecycle_with, quoref, ALICE, SYNC_TIMEOUT};

#[test]
fn delete_then_get_is_not_found() {
    let (lifecycle, _, cache) = lifecycle_with(&["quoref"]);
    lifecycle.create(quoref(), ALICE).unwrap();
    lifecycle.delete("quoref", ALICE).unwrap();

    assert_eq!(
        lifecycle.get("quoref"),
        Err(LifecycleError::NotFound("quoref".into()))
    );
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert!(!cache.exists("quoref"));
    assert_eq!(
        lifecycle.sync_status("quoref").unwrap(),
        DatasetState::Unregistered
    );
}

#[test]
fn second_delete_is_not_found_and_schedules_nothing() {
    let (lifecycle, _, cache) = lifecycle_with(&["quoref"]);
    lifecycle.create(quoref(), ALICE).unwrap();
    lifecycle.delete("quoref", ALICE).unwrap();
    assert_eq!(
        lifecycle.delete("quoref", ALICE),
        Err(LifecycleError::NotFound("quoref".into()))
    );
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(
        cache.operations(),
        vec![
            CacheOp::Fetch("quoref".into()),
            CacheOp::Remove("quoref".into())
        ]
    );
}

#[test]
fn delete_requires_allowed_identity() {
    let (lifecycle, _, _) = lifecycle_with(&["quoref"]);
    lifecycle.create(quoref(), ALICE).unwrap();
    assert!(matches!(
        lifecycle.delete("quoref", Some("mallory")),
        Err(LifecycleError::Forbidden(_))
    ));
    assert!(lifecycle.get("quoref").is_ok());
}
