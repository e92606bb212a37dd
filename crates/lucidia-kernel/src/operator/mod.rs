//! The contradiction operator: holds a value against its mirror.
//!
//! The operator resolves `x` and its mirror `~x` into a single rendered
//! value weighted by compassion, the normalized closeness of the pair.

pub mod engine;
pub mod types;

pub use engine::{apply, EPS};
pub use types::{HeldContradiction, Tri};
