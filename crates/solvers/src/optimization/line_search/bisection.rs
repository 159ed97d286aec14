use nalgebra::DVector;
use plumbline_core::BoundObjective;
use tracing::trace;

use crate::optimization::{Config, Error, LineSearch, advance_and_retreat};

use super::{along, unit};

/// Bisection on the sign of the directional derivative.
///
/// Starting from the advance-and-retreat bracket, the half whose endpoints
/// have slopes of opposite sign is kept. The search stops when the bracket is
/// narrower than `delta` times its initial width (capped at one), or when the
/// objective value or the slope at the midpoint is smaller than `epsilon` in
/// magnitude.
pub(super) fn search(
    objective: &BoundObjective,
    config: &Config,
    x: &DVector<f64>,
    p: &DVector<f64>,
) -> Result<DVector<f64>, Error> {
    let d = unit(p)?;
    let value_at = |t: f64| objective.value(&along(x, &d, t));
    let slope_at = |t: f64| objective.gradient(&along(x, &d, t)).dot(&d);

    let (mut left, mut right) = advance_and_retreat(objective, config, x, &d);
    let tolerance = config.delta() * (right - left).clamp(f64::MIN_POSITIVE, 1.0);
    let mut left_slope = slope_at(left);
    let mut mid = 0.5 * (left + right);

    for iter in 0..config.max_iters() {
        let mid_slope = slope_at(mid);

        if right - left < tolerance
            || value_at(mid).abs() < config.epsilon()
            || mid_slope.abs() < config.epsilon()
        {
            trace!(line_search = %LineSearch::Bisection, iter, t = mid, "line search converged");
            return Ok(along(x, &d, mid));
        }

        if (mid_slope > 0.0) == (left_slope > 0.0) {
            left = mid;
            left_slope = mid_slope;
        } else {
            right = mid;
        }
        mid = 0.5 * (left + right);
    }

    Err(Error::line_search(LineSearch::Bisection, config.max_iters()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use plumbline_core::Objective;

    #[test]
    fn finds_stationary_point_of_a_quartic() {
        // φ(t) = (t − 1.5)⁴ has a flat minimum: only the slope sign is reliable.
        let objective = Objective::new(|x: &DVector<f64>| (x[0] - 1.5).powi(4))
            .with_gradient(|x: &DVector<f64>| DVector::from_element(1, 4.0 * (x[0] - 1.5).powi(3)))
            .bind(1e-6);
        let config = Config::default().with_step(0.1).with_epsilon(0.0).with_delta(1e-10);

        let next = search(&objective, &config, &DVector::zeros(1), &DVector::from_element(1, 1.0))
            .expect("bisection converges");

        assert_relative_eq!(next[0], 1.5, epsilon = 1e-9);
    }

    #[test]
    fn stops_once_the_value_is_below_epsilon() {
        // The minimum value is zero, so the value test fires long before the
        // slope falls below `epsilon`.
        let objective = Objective::new(|x: &DVector<f64>| (x[0] - 2.2).powi(2))
            .with_gradient(|x: &DVector<f64>| DVector::from_element(1, 2.0 * (x[0] - 2.2)))
            .bind(1e-6);
        let config = Config::default().with_step(0.5).with_delta(1e-12);

        let next = search(&objective, &config, &DVector::zeros(1), &DVector::from_element(1, 1.0))
            .expect("bisection converges");

        assert!(objective.value(&next) < config.epsilon());
        assert!((next[0] - 2.2).abs() > 1e-5);
        assert_relative_eq!(next[0], 2.2, epsilon = 1e-3);
    }

    #[test]
    fn too_few_iterations_is_an_error() {
        let objective = Objective::new(|x: &DVector<f64>| (x[0] - 1.5).powi(2)).bind(1e-6);
        let config = Config::default()
            .with_step(0.1)
            .with_epsilon(0.0)
            .with_max_iters(3);

        let error = search(&objective, &config, &DVector::zeros(1), &DVector::from_element(1, 1.0))
            .unwrap_err();

        assert_eq!(error, Error::line_search(LineSearch::Bisection, 3));
    }
}
