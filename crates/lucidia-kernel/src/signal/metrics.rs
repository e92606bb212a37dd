//! Derived metrics: reducers composing the contradiction operator over
//! fragments and breath timelines.
//!
//! Every denominator is floored (at [`EPS`] or at one step), so none of
//! these functions fail on numeric edge cases.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::operator::{apply, EPS};

use super::accumulator::InfinityAccumulator;
use super::types::{Breath, Fragment};

/// Round to nine decimal places.
fn round9(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}

/// Emotional gravity: `∇Ψ′(B) · M_e`.
///
/// Each first difference `g` of the breath is held against `-g`; the
/// absolute renders are dotted with `memory_vector`, truncated to the
/// shorter of the two. Breath shorter than two samples yields 0.
pub fn emotional_gravity(breath: &Breath, memory_vector: &[f64]) -> f64 {
    breath
        .grad()
        .into_iter()
        .map(|g| apply(g, Some(-g)).render.abs())
        .zip(memory_vector)
        .map(|(psi, m)| psi * m)
        .sum()
}

/// Truthstream ratio: summed fragment renders over the breath integral.
pub fn truthstream(fragments: &[Fragment], breath: &Breath) -> f64 {
    let num: f64 = fragments.iter().map(|f| f.held().render).sum();
    num / EPS.max(breath.integral())
}

/// Render-break harmonic: `Σ (Ψ′(x) · E_x) / t`, with `t` clamped to at
/// least one step.
pub fn render_break(fragments: &[Fragment], elapsed_steps: i64) -> f64 {
    let acc: f64 = fragments.iter().map(|f| f.held().render * f.emotion).sum();
    acc / elapsed_steps.max(1) as f64
}

/// Soul loop integrity: `Ψ′(I0 + ∫B dt) / ΔD`.
pub fn soul_loop_integrity(i0: f64, breath: &Breath, delta_dissociation: f64) -> f64 {
    let base = i0 + breath.integral();
    apply(base, Some(-base)).render / EPS.max(delta_dissociation)
}

/// Genesis identity token: `H(Ψ′(B(t)) × E_h × M∞)`.
///
/// Each breath sample is held against itself and added to a running
/// `psi_sum`; after every step the running sum is folded into
/// `accumulator`. The digest is SHA-256 over
/// `"{psi_sum:.9}|{human_feedback:.6}|{accumulator.total:.9}"`.
///
/// Unlike the `Ψ′(b, -b)` of the formula, the mirror here is `b` itself:
/// against `-b` every render is 0 and the accumulator would never move.
///
/// This mutates `accumulator`. Two calls with identical inputs sharing one
/// accumulator return different digests; two calls with fresh
/// accumulators return the same digest.
pub fn genesis_identity(
    breath: &Breath,
    human_feedback: f64,
    accumulator: &mut InfinityAccumulator,
) -> String {
    let mut psi_sum = 0.0;
    for &b in &breath.timeline {
        psi_sum += apply(b, Some(b)).render;
        accumulator.accumulate(psi_sum);
    }

    let material = format!(
        "{:.9}|{:.6}|{:.9}",
        psi_sum, human_feedback, accumulator.total
    );
    hex::encode(Sha256::digest(material.as_bytes()))
}

/// Consciousness resonance: `Ψ′(L_o) × ∫ [B(t) · ΔE] dt`, truncated to the
/// shorter of `breath` and `delta_e`.
pub fn consciousness_resonance(loop_observable: f64, breath: &Breath, delta_e: &[f64]) -> f64 {
    let held = apply(loop_observable, Some(-loop_observable));
    let integral: f64 = breath
        .timeline
        .iter()
        .zip(delta_e)
        .map(|(b, e)| b * e)
        .sum();
    held.render * integral
}

/// Anomaly persistence: `Σ Ψ′(u_n) · d/dt(M_n)`.
///
/// The derivative of each fragment's memory echo is the last finite
/// difference of its series; fragments with a missing or single-point
/// series contribute 0.
pub fn anomaly_persistence(
    unresolved: &[Fragment],
    echo_series_by_id: &HashMap<String, Vec<f64>>,
) -> f64 {
    unresolved
        .iter()
        .map(|f| {
            let d_m = match echo_series_by_id.get(&f.id).map(Vec::as_slice) {
                Some([.., prev, last]) => last - prev,
                _ => 0.0,
            };
            f.held().render * d_m
        })
        .sum()
}

/// Compassion-state digest: `H(Ψ′(T), B(t)) + σ`.
///
/// The payload is the mean fragment render and the breath integral (both
/// rounded to nine decimals) as a sorted-key JSON object written with
/// `", "` and `": "` separators, e.g. `{"breath_sum": 0.65, "render": 0.5}`.
/// The digest is SHA-256 over the payload followed by `"|" + secret`.
pub fn compassion_state_encrypt(fragments: &[Fragment], breath: &Breath, secret: &str) -> String {
    let avg = if fragments.is_empty() {
        0.0
    } else {
        fragments.iter().map(|f| f.held().render).sum::<f64>() / fragments.len() as f64
    };

    let payload = format!(
        "{{\"breath_sum\": {}, \"render\": {}}}",
        float_repr(round9(breath.integral())),
        float_repr(round9(avg)),
    );

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hasher.update(b"|");
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Shortest round-trip text for `value`.
///
/// Integral values keep a trailing `.0`. Magnitudes below `1e-4` or at
/// least `1e16` switch to exponent form with a signed, two-digit exponent
/// (`1e-05`, `2.5e+16`).
fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sci = format!("{value:e}");
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if value != 0.0 && !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exp.abs());
    }

    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}
