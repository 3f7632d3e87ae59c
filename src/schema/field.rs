use serde_json::{Map, Value};

use super::error::{FieldError, FieldErrorKind};

/// The JSON shape a mapping field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A column name.
    String,
    /// An ordered, non-empty list of column names.
    StringList,
    /// A column name or `null`.
    NullableString,
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::StringList => "list of strings",
            FieldKind::NullableString => "string or null",
        }
    }

    fn check(self, name: &str, value: &Value) -> Option<FieldError> {
        let wrong = |found| {
            Some(FieldError::new(
                name,
                FieldErrorKind::WrongType {
                    expected: self.expected(),
                    found,
                },
            ))
        };
        match (self, value) {
            (FieldKind::String, Value::String(_)) => None,
            (FieldKind::NullableString, Value::String(_) | Value::Null) => None,
            (FieldKind::StringList, Value::Array(items)) => {
                if items.is_empty() {
                    Some(FieldError::new(name, FieldErrorKind::EmptyList))
                } else if let Some(item) = items.iter().find(|v| !v.is_string()) {
                    wrong(json_type(item))
                } else {
                    None
                }
            }
            (_, other) => wrong(json_type(other)),
        }
    }
}

/// One field declared by a mapping schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

/// The set of fields a skill type's mapping must provide.
///
/// Built with [`MappingSchema::new`] and the `required` / `optional` builder
/// methods. Schemas are closed by default: fields the schema does not declare
/// are reported as unexpected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSchema {
    skill_type: String,
    fields: Vec<FieldSpec>,
    closed: bool,
}

impl MappingSchema {
    pub fn new(skill_type: impl Into<String>) -> Self {
        Self {
            skill_type: skill_type.into(),
            fields: Vec::new(),
            closed: true,
        }
    }

    /// Declare a field that must be present.
    pub fn required(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    /// Declare a field that may be omitted.
    pub fn optional(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }

    /// Accept fields the schema does not declare.
    pub fn open(mut self) -> Self {
        self.closed = false;
        self
    }

    pub fn skill_type(&self) -> &str {
        &self.skill_type
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Check `mapping` against this schema.
    ///
    /// Errors are reported in declaration order, followed by unexpected fields
    /// in key order.
    pub fn check(&self, mapping: &Value) -> Result<(), Vec<FieldError>> {
        let object = match mapping {
            Value::Object(object) => object,
            other => {
                return Err(vec![FieldError::new(
                    "mapping",
                    FieldErrorKind::NotAnObject {
                        found: json_type(other),
                    },
                )])
            }
        };

        let mut errors: Vec<FieldError> = self
            .fields
            .iter()
            .filter_map(|spec| check_field(spec, object))
            .collect();

        if self.closed {
            errors.extend(
                object
                    .keys()
                    .filter(|key| !self.fields.iter().any(|spec| &spec.name == *key))
                    .map(|key| FieldError::new(key.as_str(), FieldErrorKind::Unexpected)),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_field(spec: &FieldSpec, object: &Map<String, Value>) -> Option<FieldError> {
    match object.get(&spec.name) {
        Some(value) => spec.kind.check(&spec.name, value),
        None if spec.required => Some(FieldError::new(&spec.name, FieldErrorKind::Missing)),
        None => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
