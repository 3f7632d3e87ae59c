use std::fmt;

/// What went wrong with a single mapping field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// A required field is absent.
    Missing,
    /// The field holds a value of the wrong JSON type.
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    /// A list field holds no entries.
    EmptyList,
    /// The field is not declared by the schema.
    Unexpected,
    /// The mapping itself is not a JSON object.
    NotAnObject { found: &'static str },
}

/// A problem with one field of a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Missing => write!(f, "{}: missing required field", self.field),
            FieldErrorKind::WrongType { expected, found } => {
                write!(f, "{}: expected {}, found {}", self.field, expected, found)
            }
            FieldErrorKind::EmptyList => write!(f, "{}: list must not be empty", self.field),
            FieldErrorKind::Unexpected => write!(f, "{}: unexpected field", self.field),
            FieldErrorKind::NotAnObject { found } => {
                write!(f, "{}: mapping must be an object, found {}", self.field, found)
            }
        }
    }
}

/// Errors from [`SchemaRegistry::validate`](super::SchemaRegistry::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The skill type has no registered schema.
    #[error("skill type {skill_type:?} is not supported; supported skill types: {}", .supported.join(", "))]
    UnsupportedSkillType {
        skill_type: String,
        supported: Vec<String>,
    },
    /// The mapping does not match the schema of its skill type.
    #[error("mapping does not match skill type {skill_type:?}: {}", join_errors(.errors))]
    Mismatch {
        skill_type: String,
        errors: Vec<FieldError>,
    },
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
