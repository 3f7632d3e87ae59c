use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::field::{FieldKind, MappingSchema};

/// A typed mapping for one skill type.
///
/// Implementors pair a skill-type tag with the schema the registry validates
/// raw mappings against. Adding a skill type means adding an implementor and
/// registering it with [`SchemaRegistry::register_mapping`](super::SchemaRegistry::register_mapping).
pub trait SkillMapping: Serialize + DeserializeOwned {
    const SKILL_TYPE: &'static str;

    fn schema() -> MappingSchema;
}

/// Column mapping for extractive question answering datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractiveQaMapping {
    pub id_column: String,
    pub question_column: String,
    pub context_column: String,
    pub answers_column: String,
}

impl SkillMapping for ExtractiveQaMapping {
    const SKILL_TYPE: &'static str = "extractive-qa";

    fn schema() -> MappingSchema {
        MappingSchema::new(Self::SKILL_TYPE)
            .required("id_column", FieldKind::String)
            .required("question_column", FieldKind::String)
            .required("context_column", FieldKind::String)
            .required("answers_column", FieldKind::String)
    }
}

/// Column mapping for multiple-choice datasets.
///
/// `choices_key_mapping_column` names the column holding the choice labels
/// (e.g. `choices.label`) when the answer column refers to a label rather than
/// an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultipleChoiceMapping {
    pub id_column: String,
    pub question_column: String,
    pub choices_columns: Vec<String>,
    #[serde(default)]
    pub choices_key_mapping_column: Option<String>,
    pub answer_index_column: String,
}

impl SkillMapping for MultipleChoiceMapping {
    const SKILL_TYPE: &'static str = "multiple-choice";

    fn schema() -> MappingSchema {
        MappingSchema::new(Self::SKILL_TYPE)
            .required("id_column", FieldKind::String)
            .required("question_column", FieldKind::String)
            .required("choices_columns", FieldKind::StringList)
            .optional("choices_key_mapping_column", FieldKind::NullableString)
            .required("answer_index_column", FieldKind::String)
    }
}
