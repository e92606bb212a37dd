//! Contradiction log: a timestamped record of prompts and the replies that
//! contradicted prior outputs.
//!
//! Each entry is one canonical JSON line:
//! ```json
//! {"prompt":"…","reply":"…","timestamp":1700000000.25}
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ledger::canonicalize;
use crate::time::{Clock, SystemClock};

use super::{LinesFile, StoreLoad};

/// One logged prompt/reply pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionEntry {
    pub timestamp: f64,
    pub prompt: String,
    pub reply: String,
}

/// Count and time bounds of a contradiction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub count: usize,
    pub oldest_timestamp: Option<f64>,
    pub newest_timestamp: Option<f64>,
}

/// Append-only prompt/reply log.
pub struct ContradictionLog {
    file: LinesFile,
    clock: Arc<dyn Clock>,
}

impl ContradictionLog {
    /// Open a log at `path` stamped with wall-clock time.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    /// Open a log at `path` stamped by `clock`.
    pub fn with_clock(path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Result<Self> {
        Ok(Self {
            file: LinesFile::new(path.as_ref())?,
            clock,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Record a prompt and the reply it drew.
    pub fn append(&self, prompt: &str, reply: &str) -> Result<ContradictionEntry> {
        let entry = ContradictionEntry {
            timestamp: self.clock.now(),
            prompt: prompt.to_string(),
            reply: reply.to_string(),
        };
        self.file.append_line(&canonicalize(&entry)?)?;
        log::debug!("contradiction logged at {}", entry.timestamp);
        Ok(entry)
    }

    /// Every entry in append order. A missing file reads as empty.
    ///
    /// # Errors
    ///
    /// A malformed line fails the whole read with `KernelError::Decode`.
    pub fn read_all(&self) -> Result<Vec<ContradictionEntry>> {
        Ok(self.file.read_json()?.unwrap_or_default())
    }

    /// The most recent entry, if any.
    pub fn latest(&self) -> Result<Option<ContradictionEntry>> {
        Ok(self.read_all()?.pop())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        match self.file.read_lines()? {
            StoreLoad::Found(lines) => Ok(lines.is_empty()),
            StoreLoad::Empty => Ok(true),
        }
    }

    pub fn summary(&self) -> Result<LogSummary> {
        let entries = self.read_all()?;
        Ok(LogSummary {
            count: entries.len(),
            oldest_timestamp: entries.first().map(|e| e.timestamp),
            newest_timestamp: entries.last().map(|e| e.timestamp),
        })
    }
}
