//! Dataset metadata records and dataset name rules.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::SkillMapping;

/// Longest dataset name accepted by the registry.
pub const MAX_NAME_LEN: usize = 200;

/// A persisted metadata record describing one evaluation dataset.
///
/// The record is keyed by `name`. `mapping` is kept as raw JSON so that skill
/// types registered at runtime can be stored alongside the built-in ones; use
/// [`DatasetMetadata::mapping_as`] to decode it into a typed mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    #[serde(alias = "dataset_name")]
    pub name: String,
    pub skill_type: String,
    pub metric: String,
    pub mapping: Value,
}

impl DatasetMetadata {
    pub fn new(
        name: impl Into<String>,
        skill_type: impl Into<String>,
        metric: impl Into<String>,
        mapping: Value,
    ) -> Self {
        Self {
            name: name.into(),
            skill_type: skill_type.into(),
            metric: metric.into(),
            mapping,
        }
    }

    /// Decode the mapping into `M` if the record's skill type is `M`'s tag.
    ///
    /// Returns `None` for a different skill type or a mapping that does not
    /// deserialize.
    pub fn mapping_as<M: SkillMapping>(&self) -> Option<M> {
        if self.skill_type != M::SKILL_TYPE {
            return None;
        }
        serde_json::from_value(self.mapping.clone()).ok()
    }
}

/// Why a dataset name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidName {
    #[error("dataset name is empty")]
    Empty,
    #[error("dataset name longer than {} characters", MAX_NAME_LEN)]
    TooLong,
    #[error("dataset name contains invalid character {0:?}")]
    InvalidChar(char),
    #[error("dataset name has a malformed organisation prefix")]
    MalformedPrefix,
    #[error("dataset name segments must not start with '.' or contain '..'")]
    DotPrefix,
}

/// Check a dataset name before it is used as a store key or cache key.
///
/// Accepts ASCII alphanumerics, `-`, `_`, `.` and at most one `/` separating an
/// organisation prefix (`allenai/quoref`). Segments may not start with `.`.
pub fn validate_dataset_name(name: &str) -> Result<(), InvalidName> {
    if name.is_empty() {
        return Err(InvalidName::Empty);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(InvalidName::TooLong);
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')))
    {
        return Err(InvalidName::InvalidChar(c));
    }
    let segments: Vec<&str> = name.split('/').collect();
    if segments.len() > 2 || segments.iter().any(|s| s.is_empty()) {
        return Err(InvalidName::MalformedPrefix);
    }
    if segments.iter().any(|s| s.starts_with('.')) || name.contains("..") {
        return Err(InvalidName::DotPrefix);
    }
    Ok(())
}
