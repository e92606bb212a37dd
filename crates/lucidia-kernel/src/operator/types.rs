//! Data structures produced by the contradiction operator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key of the tension entry in [`HeldContradiction::detail`].
pub const DETAIL_TENSION: &str = "tension";
/// Key of the magnitude entry in [`HeldContradiction::detail`].
pub const DETAIL_MAG: &str = "mag";

/// Trinary polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tri {
    Neg = -1,
    Zero = 0,
    Pos = 1,
}

impl Tri {
    /// Classify a value by sign. NaN classifies as `Zero`.
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Tri::Pos
        } else if value < 0.0 {
            Tri::Neg
        } else {
            Tri::Zero
        }
    }

    pub fn as_i8(self) -> i8 {
        self as i8
    }
}

/// Result of holding a value against its mirror.
///
/// Always produced fresh by [`apply`](super::apply); never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeldContradiction {
    pub x: f64,
    pub x_bar: f64,
    /// Closeness of `x` and `x_bar`, in `[0, 1]`.
    pub compassion: f64,
    pub render: f64,
    /// Auxiliary values: `tension` and `mag`.
    pub detail: BTreeMap<String, f64>,
}

impl HeldContradiction {
    /// Normalized distance between the value and its mirror.
    pub fn tension(&self) -> f64 {
        self.detail.get(DETAIL_TENSION).copied().unwrap_or(0.0)
    }

    /// EPS-floored combined magnitude of the pair.
    pub fn magnitude(&self) -> f64 {
        self.detail.get(DETAIL_MAG).copied().unwrap_or(0.0)
    }

    /// Sign of the rendered value.
    pub fn polarity(&self) -> Tri {
        Tri::of(self.render)
    }
}
