use nalgebra::DVector;
use plumbline_core::BoundObjective;

use super::Config;

/// Relative change, in units of `f64::EPSILON`, below which a value is
/// indistinguishable from the start value.
const ROUNDING_ULPS: f64 = 4.0;

/// Brackets a minimizer of `t ↦ f(x + t·p)` by advance and retreat.
///
/// Starting at `t = 0` with `h = step`, the search tries `r + h` and doubles
/// `h` after every improving step. If the very first step does not improve,
/// the search retreats: it negates `h` and restarts from the origin in the
/// opposite direction. At the first non-improving step after that it returns
/// the best point and the failed trial point. A double failure at the origin
/// gives `(−h, 0)`.
///
/// While the first step's value is within rounding of the start value, it
/// says nothing about the slope. Such a step is not counted as a failure;
/// `h` is doubled and the first step retried.
///
/// `p` does not need to be normalized; the returned bounds are in units of `p`
/// and are always ordered `(low, high)`.
///
/// At most `max_iters` steps are tried. If the objective keeps improving the
/// last interval is returned anyway; this is a best-effort bracket, not a
/// guaranteed one.
#[must_use]
pub fn advance_and_retreat(
    objective: &BoundObjective,
    config: &Config,
    x: &DVector<f64>,
    p: &DVector<f64>,
) -> (f64, f64) {
    let value_at = |t: f64| objective.value(&(x + p * t));

    let start = value_at(0.0);
    let rounding = ROUNDING_ULPS * f64::EPSILON * start.abs();

    let mut h = config.step();
    let mut left = 0.0;
    let mut right = 0.0;
    let mut best_value = start;
    let mut first = true;

    for _ in 0..config.max_iters() {
        left = right;
        right += h;
        let value = value_at(right);

        if first && (value - start).abs() <= rounding {
            right = 0.0;
            h *= 2.0;
            continue;
        }

        if value < best_value {
            best_value = value;
            h *= 2.0;
        } else if first {
            left = 0.0;
            right = 0.0;
            h = -h;
        } else {
            break;
        }
        first = false;
    }

    ordered(left, right)
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
