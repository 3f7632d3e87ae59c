use crate::access::AccessError;
use crate::dataset::InvalidName;
use crate::schema::{FieldError, SchemaError};
use crate::store::StoreError;

/// Errors returned synchronously by [`DatasetLifecycle`](super::DatasetLifecycle).
///
/// Every one of these is detected before the store is mutated, except `Store`,
/// in which case the mutation did not happen. Deferred cache failures never
/// show up here; see [`SyncLedger`](crate::sync::SyncLedger).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Forbidden(#[from] AccessError),
    #[error("invalid dataset name {name:?}: {reason}")]
    InvalidName {
        name: String,
        #[source]
        reason: InvalidName,
    },
    #[error("unknown metric {0:?}")]
    UnknownMetric(String),
    #[error("skill type {skill_type:?} is not supported; supported skill types: {}", .supported.join(", "))]
    UnsupportedSkillType {
        skill_type: String,
        supported: Vec<String>,
    },
    #[error("mapping does not match skill type {skill_type:?}: {}", join_errors(.errors))]
    SchemaMismatch {
        skill_type: String,
        errors: Vec<FieldError>,
    },
    #[error("dataset already exists: {0}")]
    AlreadyExists(String),
    #[error("dataset not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(StoreError),
}

impl LifecycleError {
    pub(crate) fn invalid_name(name: &str, reason: InvalidName) -> Self {
        LifecycleError::InvalidName {
            name: name.to_string(),
            reason,
        }
    }

    /// Whether the request was rejected for its content (name, metric,
    /// skill type or mapping).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LifecycleError::InvalidName { .. }
                | LifecycleError::UnknownMetric(_)
                | LifecycleError::UnsupportedSkillType { .. }
                | LifecycleError::SchemaMismatch { .. }
        )
    }
}

impl From<SchemaError> for LifecycleError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::UnsupportedSkillType {
                skill_type,
                supported,
            } => LifecycleError::UnsupportedSkillType {
                skill_type,
                supported,
            },
            SchemaError::Mismatch { skill_type, errors } => {
                LifecycleError::SchemaMismatch { skill_type, errors }
            }
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => LifecycleError::NotFound(name),
            StoreError::AlreadyExists(name) => LifecycleError::AlreadyExists(name),
            other => LifecycleError::Store(other),
        }
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
