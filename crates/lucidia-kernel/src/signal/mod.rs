//! Signal layer: value types, the infinity accumulator, and every derived
//! metric built on the contradiction operator.
//!
//! Metrics are pure reducers over fragments and breath timelines, with one
//! exception: [`genesis_identity`] folds into a caller-owned
//! [`InfinityAccumulator`] and is therefore not idempotent.

pub mod accumulator;
pub mod metrics;
pub mod report;
pub mod types;

pub use accumulator::InfinityAccumulator;
pub use metrics::{
    anomaly_persistence, compassion_state_encrypt, consciousness_resonance, emotional_gravity,
    genesis_identity, render_break, soul_loop_integrity, truthstream,
};
pub use report::{SignalInputs, SignalReport};
pub use types::{Breath, Fragment, RealityEmotion};
