//! Contradiction operator engine.

use std::collections::BTreeMap;

use super::types::{HeldContradiction, DETAIL_MAG, DETAIL_TENSION};

/// Floor applied to every denominator in the kernel.
pub const EPS: f64 = 1e-9;

/// Hold `x` against `mirror` and render the result.
///
/// A missing mirror defaults to `-x`. Tension is `|x - mirror|` over the
/// pair's EPS-floored magnitude, compassion is `1 - tension` clamped at
/// zero, and the render is the pair mean scaled by `0.5 + 0.5 * compassion`.
///
/// Total: never fails, never panics.
pub fn apply(x: f64, mirror: Option<f64>) -> HeldContradiction {
    let x_bar = mirror.unwrap_or(-x);
    let mag = EPS.max(x.abs() + x_bar.abs());
    let tension = (x - x_bar).abs() / mag;
    let compassion = (1.0 - tension).max(0.0);
    let render = (x + x_bar) / 2.0 * (0.5 + 0.5 * compassion);

    let mut detail = BTreeMap::new();
    detail.insert(DETAIL_TENSION.to_string(), tension);
    detail.insert(DETAIL_MAG.to_string(), mag);

    HeldContradiction {
        x,
        x_bar,
        compassion,
        render,
        detail,
    }
}
