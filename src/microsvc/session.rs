//! Session variables from the request context.

use std::collections::HashMap;

/// Session variable carrying the caller identity.
pub const IDENTITY_VAR: &str = "x-user-id";

/// Parsed session variables from the incoming request.
///
/// Over HTTP every request header becomes a session variable (lowercased
/// name). The caller identity is resolved upstream by the token-verification
/// layer and forwarded as `x-user-id`:
///
/// ```json
/// {
///   "x-user-id": "alice"
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a map of variables.
    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// Session carrying only a caller identity.
    pub fn with_identity(identity: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.set(IDENTITY_VAR, identity);
        session
    }

    /// The caller identity (`x-user-id`), if any.
    pub fn identity(&self) -> Option<&str> {
        self.get(IDENTITY_VAR)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}
