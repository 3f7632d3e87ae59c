use std::collections::BTreeMap;

use serde_json::Value;

use super::error::SchemaError;
use super::field::MappingSchema;
use super::mapping::{ExtractiveQaMapping, MultipleChoiceMapping, SkillMapping};

/// Skill-type tag → mapping schema.
///
/// Pure and immutable once built, so a registry can be shared across threads
/// and consulted concurrently. `SchemaRegistry::default()` holds the built-in
/// skill types; `SchemaRegistry::new()` starts empty.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, MappingSchema>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
            .register_mapping::<ExtractiveQaMapping>()
            .register_mapping::<MultipleChoiceMapping>()
    }
}

impl SchemaRegistry {
    /// Create a registry with no skill types.
    pub fn new() -> Self {
        Self {
            schemas: BTreeMap::new(),
        }
    }

    /// Register a schema under its skill type, replacing any previous one.
    pub fn register(mut self, schema: MappingSchema) -> Self {
        self.schemas.insert(schema.skill_type().to_string(), schema);
        self
    }

    /// Register the schema of a typed mapping.
    pub fn register_mapping<M: SkillMapping>(self) -> Self {
        self.register(M::schema())
    }

    /// Registered skill types in sorted order.
    pub fn skill_types(&self) -> Vec<&str> {
        self.schemas.keys().map(|s| s.as_str()).collect()
    }

    pub fn schema(&self, skill_type: &str) -> Option<&MappingSchema> {
        self.schemas.get(skill_type)
    }

    pub fn supports(&self, skill_type: &str) -> bool {
        self.schemas.contains_key(skill_type)
    }

    /// Validate `mapping` against the schema registered for `skill_type`.
    pub fn validate(&self, skill_type: &str, mapping: &Value) -> Result<(), SchemaError> {
        let schema =
            self.schemas
                .get(skill_type)
                .ok_or_else(|| SchemaError::UnsupportedSkillType {
                    skill_type: skill_type.to_string(),
                    supported: self.schemas.keys().cloned().collect(),
                })?;

        schema
            .check(mapping)
            .map_err(|errors| SchemaError::Mismatch {
                skill_type: skill_type.to_string(),
                errors,
            })
    }
}
