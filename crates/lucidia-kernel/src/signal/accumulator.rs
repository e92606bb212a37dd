//! Running total carried across `genesis_identity` calls.

use serde::{Deserialize, Serialize};

/// A running total representing M∞.
///
/// Owned by the caller and threaded explicitly into the metrics that fold
/// into it. Each `accumulate` adds its value; values may be negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfinityAccumulator {
    pub total: f64,
}

impl InfinityAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the total and return the new total.
    pub fn accumulate(&mut self, value: f64) -> f64 {
        self.total += value;
        self.total
    }
}
