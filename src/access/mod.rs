//! Access gate for mutating operations.

use std::collections::BTreeSet;

/// Errors from [`AccessGate::authorize`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("forbidden: {identity}")]
    Forbidden { identity: String },
}

/// Static allow-list of caller identities.
///
/// Fails closed: a missing identity, an empty identity and any identity not in
/// the list are all rejected. An empty gate rejects everyone.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    allowed: BTreeSet<String>,
}

impl AccessGate {
    pub fn new<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: identities.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allow(mut self, identity: impl Into<String>) -> Self {
        self.allowed.insert(identity.into());
        self
    }

    pub fn authorize(&self, identity: Option<&str>) -> Result<(), AccessError> {
        match identity {
            Some(id) if !id.is_empty() && self.allowed.contains(id) => Ok(()),
            other => Err(AccessError::Forbidden {
                identity: other.unwrap_or("<anonymous>").to_string(),
            }),
        }
    }

    pub fn is_allowed(&self, identity: &str) -> bool {
        self.authorize(Some(identity)).is_ok()
    }

    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }
}
