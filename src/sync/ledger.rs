use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use serde::Serialize;

use super::SyncAction;

/// How a deferred task ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    Succeeded,
    Failed { error: String },
}

/// The last deferred task run for a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncRecord {
    pub action: SyncAction,
    pub outcome: SyncOutcome,
    pub finished_at: SystemTime,
}

impl SyncRecord {
    pub fn failed(&self) -> bool {
        matches!(self.outcome, SyncOutcome::Failed { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            SyncOutcome::Failed { error } => Some(error),
            SyncOutcome::Succeeded => None,
        }
    }
}

/// Last sync outcome per dataset name.
///
/// This is the operational signal for metadata/cache divergence: a record whose
/// last task failed stays visible here until a later task for the same name
/// succeeds.
#[derive(Debug, Default)]
pub struct SyncLedger {
    records: Mutex<HashMap<String, SyncRecord>>,
}

impl SyncLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, SyncRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, name: &str, action: SyncAction, outcome: SyncOutcome) {
        self.records().insert(
            name.to_string(),
            SyncRecord {
                action,
                outcome,
                finished_at: SystemTime::now(),
            },
        );
    }

    pub fn last(&self, name: &str) -> Option<SyncRecord> {
        self.records().get(name).cloned()
    }

    /// Datasets whose last task failed, sorted by name.
    pub fn failures(&self) -> Vec<(String, SyncRecord)> {
        let mut failures: Vec<_> = self
            .records()
            .iter()
            .filter(|(_, record)| record.failed())
            .map(|(name, record)| (name.clone(), record.clone()))
            .collect();
        failures.sort_by(|a, b| a.0.cmp(&b.0));
        failures
    }
}
