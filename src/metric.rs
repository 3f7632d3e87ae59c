//! Scoring metric identifiers accepted by the registry.

use std::collections::BTreeSet;

/// Allow-list of metric identifiers.
///
/// An open catalog accepts any non-empty identifier. A closed catalog accepts
/// only the identifiers it was built with.
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    known: Option<BTreeSet<String>>,
}

impl MetricCatalog {
    /// Accept any non-empty metric identifier.
    pub fn open() -> Self {
        Self::default()
    }

    /// Accept only `metrics`. An empty list yields an open catalog.
    pub fn closed<I, S>(metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let known: BTreeSet<String> = metrics.into_iter().map(Into::into).collect();
        Self {
            known: (!known.is_empty()).then_some(known),
        }
    }

    pub fn accepts(&self, metric: &str) -> bool {
        !metric.trim().is_empty()
            && self
                .known
                .as_ref()
                .map_or(true, |known| known.contains(metric))
    }

    /// Known identifiers, or `None` for an open catalog.
    pub fn known(&self) -> Option<Vec<&str>> {
        self.known
            .as_ref()
            .map(|known| known.iter().map(String::as_str).collect())
    }
}
