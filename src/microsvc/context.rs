//! Context passed to command handlers.
//!
//! Carries the parsed input, session variables, and a reference to the
//! dataset lifecycle the service was built around.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;
use super::session::Session;

/// The context passed to every command handler.
///
/// Generic over `L`, the lifecycle type the service dispatches into.
pub struct Context<'a, L> {
    command_name: String,
    input: Value,
    session: Session,
    lifecycle: &'a L,
}

impl<'a, L> Context<'a, L> {
    pub(crate) fn new(command_name: String, input: Value, session: Session, lifecycle: &'a L) -> Self {
        Self {
            command_name,
            input,
            session,
            lifecycle,
        }
    }

    /// Deserialize the input payload into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_value(self.input.clone()).map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Caller identity from the session. Absence is left to the access gate.
    pub fn identity(&self) -> Option<&str> {
        self.session.identity()
    }

    pub fn lifecycle(&self) -> &L {
        self.lifecycle
    }

    /// A string field of the input, if present.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.input.get(field).and_then(Value::as_str)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.input.get(field).is_some()
    }

    pub fn has_fields(&self, fields: &[&str]) -> bool {
        fields.iter().all(|f| self.has_field(f))
    }
}
