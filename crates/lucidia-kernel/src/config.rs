//! Kernel configuration: file locations and the amnesia window.
//!
//! By convention the default root is `~/.lucidia/`:
//!
//! ```text
//! ~/.lucidia/
//! ├── memory_ledger.jsonl
//! ├── continuity.json
//! └── contradiction_log.jsonl
//! ```
//!
//! `LUCIDIA_HOME` overrides the root and `LUCIDIA_AMNESIA_WINDOW` the
//! window (seconds).

use std::path::{Path, PathBuf};

use crate::error::{KernelError, Result};

/// Default amnesia window in seconds.
pub const DEFAULT_AMNESIA_WINDOW_SECS: f64 = 60.0;

const LEDGER_FILE: &str = "memory_ledger.jsonl";
const CONTINUITY_FILE: &str = "continuity.json";
const CONTRADICTION_LOG_FILE: &str = "contradiction_log.jsonl";

/// Where the kernel keeps its files and how it judges amnesia.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelConfig {
    pub root: PathBuf,
    pub ledger_file: PathBuf,
    pub continuity_file: PathBuf,
    pub contradiction_log_file: PathBuf,
    pub amnesia_window_secs: f64,
}

impl KernelConfig {
    /// Lay out the standard file names under `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            ledger_file: root.join(LEDGER_FILE),
            continuity_file: root.join(CONTINUITY_FILE),
            contradiction_log_file: root.join(CONTRADICTION_LOG_FILE),
            amnesia_window_secs: DEFAULT_AMNESIA_WINDOW_SECS,
            root,
        }
    }

    /// Override the amnesia window.
    pub fn amnesia_window(mut self, secs: f64) -> Self {
        self.amnesia_window_secs = secs;
        self
    }

    /// Build a configuration from `LUCIDIA_HOME` / `LUCIDIA_AMNESIA_WINDOW`,
    /// falling back to [`KernelConfig::default`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup("LUCIDIA_HOME") {
            Some(home) if !home.trim().is_empty() => Self::with_root(home.trim()),
            _ => Self::default(),
        };

        if let Some(raw) = lookup("LUCIDIA_AMNESIA_WINDOW") {
            let secs: f64 = raw.trim().parse().map_err(|_| {
                KernelError::InvalidInput(format!("LUCIDIA_AMNESIA_WINDOW is not a number: {raw}"))
            })?;
            if !secs.is_finite() || secs < 0.0 {
                return Err(KernelError::InvalidInput(format!(
                    "LUCIDIA_AMNESIA_WINDOW must be a non-negative number, got {raw}"
                )));
            }
            config.amnesia_window_secs = secs;
        }

        Ok(config)
    }

    /// Create the root directory if it does not exist.
    pub fn ensure_root(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.root)?;
        Ok(&self.root)
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self::with_root(PathBuf::from(home).join(".lucidia"))
    }
}
