//! Value types consumed by the derived metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::operator::{self, HeldContradiction, EPS};

// ---------------------------------------------------------------------------
// Fragment
// ---------------------------------------------------------------------------

/// A value `x` with an optional mirror `~x` and an emotional charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: String,
    pub value: f64,
    pub mirror_value: Option<f64>,
    pub emotion: f64,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl Fragment {
    /// A fragment with no mirror, zero emotion and no metadata.
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
            mirror_value: None,
            emotion: 0.0,
            meta: BTreeMap::new(),
        }
    }

    pub fn with_mirror(mut self, mirror: f64) -> Self {
        self.mirror_value = Some(mirror);
        self
    }

    pub fn with_emotion(mut self, emotion: f64) -> Self {
        self.emotion = emotion;
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Hold this fragment against its mirror.
    pub fn held(&self) -> HeldContradiction {
        operator::apply(self.value, self.mirror_value)
    }
}

// ---------------------------------------------------------------------------
// Breath
// ---------------------------------------------------------------------------

/// Breath state over discrete time `t = 0..N-1`. Order is significant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breath {
    pub timeline: Vec<f64>,
}

impl Breath {
    pub fn new(timeline: Vec<f64>) -> Self {
        Self { timeline }
    }

    /// Discrete integral: the plain sum of the timeline.
    pub fn integral(&self) -> f64 {
        self.timeline.iter().fold(0.0, |acc, b| acc + b)
    }

    /// First differences `b[i] - b[i-1]`. Empty for fewer than two samples.
    pub fn grad(&self) -> Vec<f64> {
        self.timeline.windows(2).map(|w| w[1] - w[0]).collect()
    }

    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }
}

impl From<Vec<f64>> for Breath {
    fn from(timeline: Vec<f64>) -> Self {
        Self::new(timeline)
    }
}

// ---------------------------------------------------------------------------
// Reality / emotion streams
// ---------------------------------------------------------------------------

/// Reality and emotion streams sharing one time axis.
///
/// The streams may differ in length; paired operations use the shorter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RealityEmotion {
    pub reality: Vec<f64>,
    pub emotion: Vec<f64>,
}

impl RealityEmotion {
    pub fn new(reality: Vec<f64>, emotion: Vec<f64>) -> Self {
        Self { reality, emotion }
    }

    /// Number of paired samples.
    pub fn paired_len(&self) -> usize {
        self.reality.len().min(self.emotion.len())
    }

    /// Paired `(reality, emotion)` samples, truncated to the shorter stream.
    pub fn paired(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.reality.iter().copied().zip(self.emotion.iter().copied())
    }

    /// dReality/dEmotion: sample covariance over sample variance of emotion.
    ///
    /// Returns 0 with fewer than two paired samples. A flat emotion stream
    /// divides by [`EPS`].
    pub fn d_reality_over_d_emotion(&self) -> f64 {
        let n = self.paired_len();
        if n < 2 {
            return 0.0;
        }

        let denom = (n - 1) as f64;
        let mean_r = self.reality[..n].iter().sum::<f64>() / n as f64;
        let mean_e = self.emotion[..n].iter().sum::<f64>() / n as f64;

        let cov = self
            .paired()
            .map(|(r, e)| (r - mean_r) * (e - mean_e))
            .sum::<f64>()
            / denom;
        let var = self
            .emotion[..n]
            .iter()
            .map(|e| (e - mean_e).powi(2))
            .sum::<f64>()
            / denom;

        let slope = cov / if var != 0.0 { var } else { EPS };
        if slope.is_finite() {
            slope
        } else {
            0.0
        }
    }
}
