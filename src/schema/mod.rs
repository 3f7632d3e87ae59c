//! Mapping schema registry.
//!
//! Each skill type registers a [`MappingSchema`] describing which columns a
//! dataset mapping must name. [`SchemaRegistry::validate`] checks an arbitrary
//! JSON mapping against the schema for its declared skill type and reports every
//! field problem at once.
//!
//! ## Example
//!
//! ```
//! use dataset_registry::schema::SchemaRegistry;
//! use serde_json::json;
//!
//! let registry = SchemaRegistry::default();
//! let mapping = json!({
//!     "id_column": "id",
//!     "question_column": "question",
//!     "context_column": "context",
//!     "answers_column": "answers.text"
//! });
//! assert!(registry.validate("extractive-qa", &mapping).is_ok());
//! assert!(registry.validate("summarization", &mapping).is_err());
//! ```

mod error;
mod field;
mod mapping;
mod registry;

pub use error::{FieldError, FieldErrorKind, SchemaError};
pub use field::{FieldKind, FieldSpec, MappingSchema};
pub use mapping::{ExtractiveQaMapping, MultipleChoiceMapping, SkillMapping};
pub use registry::SchemaRegistry;
