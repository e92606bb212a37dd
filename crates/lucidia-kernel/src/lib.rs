//! Lucidia kernel: integrity signals from short numeric time-series.
//!
//! Provides the contradiction operator, the derived metrics built on it,
//! a hash-chained append-only ledger for checkpointing their outputs, and
//! a continuity tracker that detects fingerprint discontinuities
//! ("amnesia events").

pub mod config;
pub mod continuity;
pub mod error;
pub mod ledger;
pub mod operator;
pub mod signal;
pub mod storage;
pub mod time;

// Re-export primary types
pub use config::KernelConfig;
pub use error::{KernelError, Result};
pub use operator::{apply, HeldContradiction, Tri, EPS};
pub use time::{Clock, ManualClock, SystemClock};

// Re-export signal types
pub use signal::{
    Breath, Fragment, InfinityAccumulator, RealityEmotion, SignalInputs, SignalReport,
};

// Re-export ledger types
pub use ledger::{ChainVerification, Ledger, LedgerEntry, GENESIS_HASH};

// Re-export continuity types
pub use continuity::{ContinuityState, ContinuityTracker, FingerprintChange};

// Re-export storage types
pub use storage::{ContradictionEntry, ContradictionLog, LogSummary, StoreLoad};
