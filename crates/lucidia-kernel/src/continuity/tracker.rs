//! Continuity tracker engine.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use sha2::{Digest, Sha256};

use crate::config::{KernelConfig, DEFAULT_AMNESIA_WINDOW_SECS};
use crate::error::Result;
use crate::storage::{ContinuityStore, StoreLoad};
use crate::time::{Clock, SystemClock};

use super::types::{ContinuityState, FingerprintChange};

/// SHA-256 hex digest of `materials` joined with `|`.
pub fn fingerprint_of<S: AsRef<str>>(materials: &[S]) -> String {
    let mut hasher = Sha256::new();
    for (i, material) in materials.iter().enumerate() {
        if i > 0 {
            hasher.update(b"|");
        }
        hasher.update(material.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Maintains a continuity fingerprint and records the history of changes.
///
/// State is loaded once at construction and kept behind a single lock; each
/// `update_fingerprint` holds it across the comparison, the file write and
/// the in-memory commit.
pub struct ContinuityTracker {
    store: ContinuityStore,
    state: Mutex<ContinuityState>,
    clock: Arc<dyn Clock>,
    window_secs: f64,
}

impl ContinuityTracker {
    /// Open the tracker at `path` using wall-clock time.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    /// Open the tracker at `path` reading time from `clock`.
    ///
    /// A missing file starts from an empty state.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::Decode` if the file exists but is malformed.
    pub fn with_clock(path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = ContinuityStore::new(path.as_ref())?;
        let state = match store.load()? {
            StoreLoad::Found(state) => state,
            StoreLoad::Empty => ContinuityState::default(),
        };

        Ok(Self {
            store,
            state: Mutex::new(state),
            clock,
            window_secs: DEFAULT_AMNESIA_WINDOW_SECS,
        })
    }

    /// Open the tracker described by `config`.
    pub fn from_config(config: &KernelConfig) -> Result<Self> {
        Ok(Self::open(&config.continuity_file)?.with_window(config.amnesia_window_secs))
    }

    /// Override the amnesia window.
    pub fn with_window(mut self, secs: f64) -> Self {
        self.window_secs = secs;
        self
    }

    pub fn window_secs(&self) -> f64 {
        self.window_secs
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    // The state is only replaced after a successful save, so a poisoned
    // guard still holds a consistent state.
    fn lock(&self) -> MutexGuard<'_, ContinuityState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fingerprint `materials` and record a change if it differs from the
    /// stored fingerprint.
    ///
    /// Returns `(fingerprint, previous_fingerprint)` whether or not a change
    /// was recorded. On a change the full state is persisted before it is
    /// committed in memory; if the write fails nothing changes.
    pub fn update_fingerprint<S: AsRef<str>>(
        &self,
        materials: &[S],
    ) -> Result<(String, Option<String>)> {
        let fp = fingerprint_of(materials);

        let mut state = self.lock();
        let prev = state.fingerprint.clone();
        if prev.as_deref() == Some(fp.as_str()) {
            return Ok((fp, prev));
        }

        let mut next = state.clone();
        next.history.push(FingerprintChange {
            timestamp: self.clock.now(),
            prev: prev.clone(),
            new: fp.clone(),
        });
        next.fingerprint = Some(fp.clone());
        self.store.save(&next)?;
        *state = next;

        log::info!(
            "continuity fingerprint changed: {} -> {fp}",
            prev.as_deref().unwrap_or("<none>")
        );
        Ok((fp, prev))
    }

    /// True if the latest change happened less than the configured window ago.
    pub fn amnesia_alert(&self) -> bool {
        self.amnesia_alert_within(self.window_secs)
    }

    /// True if the latest change happened less than `window_secs` ago.
    pub fn amnesia_alert_within(&self, window_secs: f64) -> bool {
        let last = match self.lock().last_change() {
            Some(change) => change.timestamp,
            None => return false,
        };
        let elapsed = self.clock.now() - last;
        let alert = elapsed < window_secs;
        if alert {
            log::warn!("amnesia alert: fingerprint changed {elapsed:.3}s ago");
        }
        alert
    }

    /// Current fingerprint, if one has been recorded.
    pub fn fingerprint(&self) -> Option<String> {
        self.lock().fingerprint.clone()
    }

    pub fn history(&self) -> Vec<FingerprintChange> {
        self.lock().history.clone()
    }

    pub fn last_change(&self) -> Option<FingerprintChange> {
        self.lock().last_change().cloned()
    }

    /// Snapshot of the full state.
    pub fn state(&self) -> ContinuityState {
        self.lock().clone()
    }
}
