//! Continuity: a persisted fingerprint, its change history, and amnesia
//! detection.
//!
//! A fingerprint is SHA-256 over input materials joined with `|`. Every
//! change is appended to the history and persisted; an unchanged
//! fingerprint touches neither. An amnesia alert fires while the latest
//! change is younger than the configured window.

pub mod tracker;
pub mod types;

pub use tracker::{fingerprint_of, ContinuityTracker};
pub use types::{ContinuityState, FingerprintChange};
