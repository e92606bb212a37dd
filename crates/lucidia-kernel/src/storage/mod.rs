//! Storage layer for the ledger, the continuity state, and the
//! contradiction log.
//!
//! # File layout
//!
//! ```text
//! {root}/
//! ├── memory_ledger.jsonl       one canonical record per line, append-only
//! ├── continuity.json           whole-state overwrite on every change
//! └── contradiction_log.jsonl   one {prompt, reply, timestamp} per line
//! ```
//!
//! A file that does not exist yet loads as [`StoreLoad::Empty`], never as an
//! error. Malformed content is always a [`KernelError::Decode`].
//!
//! # Modules
//!
//! - [`lines_file`]: append-only JSON-lines file shared by the ledger and
//!   the contradiction log.
//! - [`continuity_store`]: load/save of `ContinuityState`.
//! - [`contradiction_log`]: the prompt/reply log.
//!
//! [`KernelError::Decode`]: crate::error::KernelError::Decode

pub mod continuity_store;
pub mod contradiction_log;
pub mod lines_file;

pub use continuity_store::ContinuityStore;
pub use contradiction_log::{ContradictionEntry, ContradictionLog, LogSummary};
pub use lines_file::LinesFile;

/// Outcome of loading a store that may not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreLoad<T> {
    /// The backing file exists and decoded cleanly.
    Found(T),
    /// The backing file does not exist yet.
    Empty,
}

impl<T> StoreLoad<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, StoreLoad::Found(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            StoreLoad::Found(value) => Some(value),
            StoreLoad::Empty => None,
        }
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.into_option().unwrap_or_default()
    }
}
