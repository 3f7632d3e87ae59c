use dataset_registry::sync::SyncAction;
use dataset_registry::{DatasetState, LifecycleError, MetadataStore};
use serde_json::json;

use crate::support::{cosmos_qa, lifecycle_with, quoref, ALICE, SYNC_TIMEOUT};

#[test]
fn create_then_get_returns_input() {
    let (lifecycle, _, _) = lifecycle_with(&["quoref", "cosmos_qa"]);

    assert_eq!(lifecycle.create(quoref(), ALICE).unwrap(), "quoref");
    assert_eq!(lifecycle.create(cosmos_qa(), ALICE).unwrap(), "cosmos_qa");

    assert_eq!(lifecycle.get("quoref").unwrap(), quoref());
    assert_eq!(lifecycle.get("cosmos_qa").unwrap(), cosmos_qa());
    assert_eq!(lifecycle.list().unwrap(), vec!["cosmos_qa", "quoref"]);
}

#[test]
fn create_schedules_fetch() {
    let (lifecycle, _, cache) = lifecycle_with(&["quoref"]);
    lifecycle.create(quoref(), ALICE).unwrap();

    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert!(dataset_registry::DatasetCache::exists(&cache, "quoref"));
    assert_eq!(lifecycle.sync_status("quoref").unwrap(), DatasetState::Synced);
    assert_eq!(lifecycle.sync_stats().fetched, 1);
}

#[test]
fn duplicate_create_keeps_original() {
    let (lifecycle, store, _) = lifecycle_with(&["quoref"]);
    lifecycle.create(quoref(), ALICE).unwrap();

    let mut second = quoref();
    second.metric = "accuracy".into();
    assert_eq!(
        lifecycle.create(second, ALICE),
        Err(LifecycleError::AlreadyExists("quoref".into()))
    );
    assert_eq!(store.get("quoref").unwrap().unwrap().metric, "squad");
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(lifecycle.sync_stats().scheduled, 1);
}

#[test]
fn quoref_survives_failed_fetch() {
    // Not published upstream: the deferred fetch fails.
    let (lifecycle, _, _) = lifecycle_with(&[]);
    assert_eq!(lifecycle.create(quoref(), ALICE).unwrap(), "quoref");
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));

    assert_eq!(lifecycle.get("quoref").unwrap(), quoref());
    match lifecycle.sync_status("quoref").unwrap() {
        DatasetState::SyncFailed { error: Some(error) } => {
            assert!(error.contains("not found on source"), "{}", error)
        }
        other => panic!("unexpected state {:?}", other),
    }
    let failures = lifecycle.sync_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "quoref");
    assert_eq!(failures[0].1.action, SyncAction::Fetch);
}

#[test]
fn multiple_choice_missing_answer_index_is_rejected() {
    let (lifecycle, store, _) = lifecycle_with(&["cosmos_qa"]);
    let mut record = cosmos_qa();
    record.mapping = json!({
        "id_column": "id",
        "question_column": "question",
        "choices_columns": ["answer0", "answer1"],
        "choices_key_mapping_column": null
    });

    match lifecycle.create(record, ALICE) {
        Err(LifecycleError::SchemaMismatch { skill_type, errors }) => {
            assert_eq!(skill_type, "multiple-choice");
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "answer_index_column");
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert!(store.is_empty());
    assert_eq!(lifecycle.sync_stats().scheduled, 0);
}

#[test]
fn choices_key_mapping_column_is_optional() {
    let (lifecycle, _, _) = lifecycle_with(&[]);
    let mut record = cosmos_qa();
    record.name = "commonsense_qa".into();
    record.mapping = json!({
        "id_column": "id",
        "question_column": "question",
        "choices_columns": ["choices.text"],
        "choices_key_mapping_column": "choices.label",
        "answer_index_column": "answerKey"
    });
    lifecycle.create(record, ALICE).unwrap();

    let mut record = cosmos_qa();
    record.mapping.as_object_mut().unwrap().remove("choices_key_mapping_column");
    lifecycle.create(record, ALICE).unwrap();
}

#[test]
fn unsupported_skill_type_lists_registered_set() {
    let (lifecycle, store, _) = lifecycle_with(&[]);
    let mut record = quoref();
    record.skill_type = "abstractive-qa".into();

    assert_eq!(
        lifecycle.create(record, ALICE),
        Err(LifecycleError::UnsupportedSkillType {
            skill_type: "abstractive-qa".into(),
            supported: vec!["extractive-qa".into(), "multiple-choice".into()],
        })
    );
    assert!(store.is_empty());
}

#[test]
fn forbidden_caller_changes_nothing() {
    let (lifecycle, store, _) = lifecycle_with(&["quoref"]);
    assert!(matches!(
        lifecycle.create(quoref(), Some("mallory")),
        Err(LifecycleError::Forbidden(_))
    ));
    assert!(matches!(
        lifecycle.create(quoref(), None),
        Err(LifecycleError::Forbidden(_))
    ));
    assert!(store.is_empty());
}

#[test]
fn unknown_metric_and_bad_name_are_rejected() {
    let (lifecycle, store, _) = lifecycle_with(&[]);

    let mut record = quoref();
    record.metric = "bleu".into();
    assert_eq!(
        lifecycle.create(record, ALICE),
        Err(LifecycleError::UnknownMetric("bleu".into()))
    );

    let mut record = quoref();
    record.name = "quoref/../../etc".into();
    assert!(matches!(
        lifecycle.create(record, ALICE),
        Err(LifecycleError::InvalidName { .. })
    ));
    assert!(store.is_empty());
}

#[test]
fn prefixed_names_are_accepted() {
    let (lifecycle, _, cache) = lifecycle_with(&["allenai/quoref"]);
    let mut record = quoref();
    record.name = "allenai/quoref".into();
    lifecycle.create(record, ALICE).unwrap();
    assert!(lifecycle.wait_for_sync(SYNC_TIMEOUT));
    assert_eq!(cache.cached_revision("allenai/quoref"), Some(1));
}
