//! Continuity persistence: load and save the whole `ContinuityState`.
//!
//! File format (pretty-printed, sorted keys):
//! ```json
//! {
//!   "fingerprint": "…",
//!   "history": [
//!     { "new": "…", "prev": null, "timestamp": 1700000000.0 }
//!   ]
//! }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::continuity::ContinuityState;
use crate::error::{KernelError, Result};

use super::StoreLoad;

/// Filesystem-backed store for a single `ContinuityState`.
///
/// Every save replaces the file with the complete state. The new state is
/// written to a sibling `.tmp` file and renamed into place, so a reader
/// never sees a partially written history.
#[derive(Debug, Clone)]
pub struct ContinuityStore {
    path: PathBuf,
}

impl ContinuityStore {
    /// Create a store for `path`, creating missing parent directories.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::Decode` if the file exists but cannot be
    /// parsed, or `KernelError::Io` for other filesystem errors.
    pub fn load(&self) -> Result<StoreLoad<ContinuityState>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreLoad::Empty),
            Err(e) => return Err(KernelError::Io(e)),
        };

        let state: ContinuityState =
            serde_json::from_str(&text).map_err(|e| KernelError::Decode {
                path: self.path.clone(),
                line: e.line(),
                reason: e.to_string(),
            })?;
        Ok(StoreLoad::Found(state))
    }

    /// Replace the file with `state`.
    pub fn save(&self, state: &ContinuityState) -> Result<()> {
        // Going through `Value` sorts the keys.
        let value = serde_json::to_value(state)
            .map_err(|e| KernelError::SerializationError(e.to_string()))?;
        let json = serde_json::to_string_pretty(&value)
            .map_err(|e| KernelError::SerializationError(e.to_string()))?;
        write_atomic(&self.path, &self.tmp_path(), json.as_bytes())?;
        log::debug!("continuity state saved to {}", self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

/// Write `data` to `tmp_path`, then rename it over `path`.
fn write_atomic(path: &Path, tmp_path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(tmp_path, data)?;

    if let Err(e) = std::fs::rename(tmp_path, path) {
        let _ = std::fs::remove_file(tmp_path);
        return Err(KernelError::Io(e));
    }
    Ok(())
}
