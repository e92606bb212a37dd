//! Data structures for continuity fingerprints.

use serde::{Deserialize, Serialize};

/// One recorded fingerprint change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintChange {
    /// Epoch seconds at which the change was observed.
    #[serde(alias = "ts")]
    pub timestamp: f64,
    /// Fingerprint before the change; `None` for the first fingerprint.
    pub prev: Option<String>,
    pub new: String,
}

/// Persisted continuity state.
///
/// History entries are only ever appended, never removed or reordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContinuityState {
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub history: Vec<FingerprintChange>,
}

impl ContinuityState {
    pub fn last_change(&self) -> Option<&FingerprintChange> {
        self.history.last()
    }
}
