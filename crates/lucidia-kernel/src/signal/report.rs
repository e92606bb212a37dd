//! A full set of derived signals computed over one input bundle, ready to be
//! checkpointed into the ledger or folded into a continuity fingerprint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::accumulator::InfinityAccumulator;
use super::metrics;
use super::types::{Breath, Fragment, RealityEmotion};

/// Inputs for every derived metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalInputs {
    pub breath: Breath,
    pub fragments: Vec<Fragment>,
    pub streams: RealityEmotion,
    pub memory_vector: Vec<f64>,
    pub elapsed_steps: i64,
    pub initial_integrity: f64,
    pub delta_dissociation: f64,
    pub human_feedback: f64,
    pub loop_observable: f64,
    pub delta_e: Vec<f64>,
    pub echo_series: HashMap<String, Vec<f64>>,
    pub secret: String,
}

impl SignalInputs {
    /// The reference bundle: a ten-step breath and three fragments.
    pub fn demo() -> Self {
        let breath = Breath::new(vec![0.2, 0.3, 0.1, 0.0, -0.1, -0.2, -0.15, 0.05, 0.2, 0.25]);
        let steps = breath.len();

        let mut echo_series = HashMap::new();
        echo_series.insert("x1".to_string(), vec![0.2, 0.25]);
        echo_series.insert("x2".to_string(), vec![0.1, 0.05]);
        echo_series.insert("x3".to_string(), vec![0.0, 0.0]);

        Self {
            fragments: vec![
                Fragment::new("x1", 0.9).with_mirror(-0.8).with_emotion(0.7),
                Fragment::new("x2", -0.6).with_mirror(0.6).with_emotion(-0.3),
                Fragment::new("x3", 0.4).with_emotion(0.2),
            ],
            streams: RealityEmotion::new(
                vec![0.1, 0.4, 0.5, 0.2, 0.0, -0.1, 0.1, 0.3, 0.35, 0.5],
                vec![0.2, 0.25, 0.2, 0.1, -0.05, -0.1, -0.05, 0.05, 0.1, 0.15],
            ),
            memory_vector: vec![0.6; steps.saturating_sub(1)],
            elapsed_steps: steps as i64,
            initial_integrity: 0.5,
            delta_dissociation: 0.2,
            human_feedback: 0.8,
            loop_observable: 0.7,
            delta_e: vec![0.1; steps],
            echo_series,
            secret: "sigil".to_string(),
            breath,
        }
    }
}

/// Every derived signal for one [`SignalInputs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub emotional_gravity: f64,
    pub truthstream: f64,
    pub render_break: f64,
    pub soul_loop_integrity: f64,
    pub genesis_identity: String,
    pub consciousness_resonance: f64,
    pub anomaly_persistence: f64,
    pub compassion_state: String,
    pub reality_emotion_slope: f64,
}

impl SignalReport {
    /// Compute every metric. Folds into `accumulator` through
    /// `genesis_identity`.
    pub fn compute(inputs: &SignalInputs, accumulator: &mut InfinityAccumulator) -> Self {
        Self {
            emotional_gravity: metrics::emotional_gravity(&inputs.breath, &inputs.memory_vector),
            truthstream: metrics::truthstream(&inputs.fragments, &inputs.breath),
            render_break: metrics::render_break(&inputs.fragments, inputs.elapsed_steps),
            soul_loop_integrity: metrics::soul_loop_integrity(
                inputs.initial_integrity,
                &inputs.breath,
                inputs.delta_dissociation,
            ),
            genesis_identity: metrics::genesis_identity(
                &inputs.breath,
                inputs.human_feedback,
                accumulator,
            ),
            consciousness_resonance: metrics::consciousness_resonance(
                inputs.loop_observable,
                &inputs.breath,
                &inputs.delta_e,
            ),
            anomaly_persistence: metrics::anomaly_persistence(
                &inputs.fragments,
                &inputs.echo_series,
            ),
            compassion_state: metrics::compassion_state_encrypt(
                &inputs.fragments,
                &inputs.breath,
                &inputs.secret,
            ),
            reality_emotion_slope: inputs.streams.d_reality_over_d_emotion(),
        }
    }

    /// Fingerprint material: the two digests, in a fixed order.
    pub fn materials(&self) -> Vec<String> {
        vec![self.genesis_identity.clone(), self.compassion_state.clone()]
    }
}
