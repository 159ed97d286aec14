use nalgebra::DVector;
use plumbline_core::BoundObjective;
use tracing::trace;

use crate::optimization::{Config, Error, LineSearch, advance_and_retreat};

use super::{along, unit};

/// Interval-reduction bracket.
///
/// Maintains the outer interval [left, right] and two interior points placed
/// at `rate` of the width from either end.
#[derive(Debug, Clone, Copy)]
struct ReductionBracket {
    /// Outer left bound.
    left: f64,

    /// Outer right bound.
    right: f64,

    /// Inner left point at `right − rate * width`.
    inner_left: f64,

    /// Inner right point at `left + rate * width`.
    inner_right: f64,
}

impl ReductionBracket {
    /// Creates a bracket from ordered bounds with interior points at `rate`.
    fn new(left: f64, right: f64, rate: f64) -> Self {
        Self {
            left,
            right,
            inner_left: right + rate * (left - right),
            inner_right: left + rate * (right - left),
        }
    }

    /// Shrinks the bounds to `[inner_left, right]`.
    ///
    /// The old `inner_right` becomes the new `inner_left`, and a new
    /// `inner_right` is placed at `rate` of the new width.
    fn shrink_left(&mut self, rate: f64) {
        self.left = self.inner_left;
        self.inner_left = self.inner_right;
        self.inner_right = self.left + rate * (self.right - self.left);
    }

    /// Shrinks the bounds to `[left, inner_right]`.
    ///
    /// The old `inner_left` becomes the new `inner_right`, and a new
    /// `inner_left` is placed at `rate` of the new width.
    fn shrink_right(&mut self, rate: f64) {
        self.right = self.inner_right;
        self.inner_right = self.inner_left;
        self.inner_left = self.right + rate * (self.left - self.right);
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Swaps the interior points if the reused one ended up on the wrong side
    /// of the new one, and reports whether it did.
    ///
    /// Only a changing `rate` can cause this.
    fn reorder(&mut self) -> bool {
        if self.inner_left > self.inner_right {
            std::mem::swap(&mut self.inner_left, &mut self.inner_right);
            true
        } else {
            false
        }
    }
}

/// Shared driver for golden section and Fibonacci search.
///
/// Each iteration keeps the side of the bracket holding the better interior
/// point. The search stops once the side it would keep is narrower than
/// `delta` times the initial bracket width (capped at one) and returns the
/// better interior point. `next_rate` maps the ratio of one iteration to the
/// next.
pub(super) fn reduce<R>(
    objective: &BoundObjective,
    config: &Config,
    x: &DVector<f64>,
    p: &DVector<f64>,
    line_search: LineSearch,
    mut rate: f64,
    next_rate: R,
) -> Result<DVector<f64>, Error>
where
    R: Fn(f64) -> f64,
{
    let d = unit(p)?;
    let (left, right) = advance_and_retreat(objective, config, x, &d);
    let value_at = |t: f64| objective.value(&along(x, &d, t));

    let mut bracket = ReductionBracket::new(left, right, rate);
    let tolerance = config.delta() * bracket.width().clamp(f64::MIN_POSITIVE, 1.0);
    let mut left_value = value_at(bracket.inner_left);
    let mut right_value = value_at(bracket.inner_right);

    for iter in 0..config.max_iters() {
        if left_value > right_value {
            if bracket.right - bracket.inner_left < tolerance {
                trace!(%line_search, iter, t = bracket.inner_right, "line search converged");
                return Ok(along(x, &d, bracket.inner_right));
            }
            bracket.shrink_left(rate);
            left_value = right_value;
            right_value = value_at(bracket.inner_right);
        } else {
            if bracket.inner_right - bracket.left < tolerance {
                trace!(%line_search, iter, t = bracket.inner_left, "line search converged");
                return Ok(along(x, &d, bracket.inner_left));
            }
            bracket.shrink_right(rate);
            right_value = left_value;
            left_value = value_at(bracket.inner_left);
        }
        if bracket.reorder() {
            std::mem::swap(&mut left_value, &mut right_value);
        }
        rate = next_rate(rate);
    }

    Err(Error::line_search(line_search, config.max_iters()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use plumbline_core::Objective;

    use crate::optimization::line_search::golden_section::INV_PHI;

    #[test]
    fn bracket_initialized_with_golden_ratio_points() {
        let bracket = ReductionBracket::new(0.0, 1.0, INV_PHI);

        assert_relative_eq!(bracket.left, 0.0);
        assert_relative_eq!(bracket.right, 1.0);

        // inner_left ≈ 0.382, inner_right ≈ 0.618
        assert_relative_eq!(bracket.inner_left, 1.0 - INV_PHI);
        assert_relative_eq!(bracket.inner_right, INV_PHI);
    }

    #[test]
    fn shrink_left_reuses_point_and_computes_new_inner_right() {
        let mut bracket = ReductionBracket::new(0.0, 1.0, INV_PHI);
        let old_inner_right = bracket.inner_right;

        bracket.shrink_left(INV_PHI);

        assert_relative_eq!(bracket.left, 1.0 - INV_PHI);
        assert_relative_eq!(bracket.right, 1.0);
        assert_relative_eq!(bracket.inner_left, old_inner_right);

        // With the golden ratio the reused point keeps its proportion.
        let width = bracket.right - bracket.left;
        assert_relative_eq!(bracket.inner_right, bracket.left + INV_PHI * width);
        assert_relative_eq!(bracket.inner_left, bracket.right - INV_PHI * width, epsilon = 1e-15);
    }

    #[test]
    fn shrink_right_reuses_point_and_computes_new_inner_left() {
        let mut bracket = ReductionBracket::new(0.0, 1.0, 0.6);
        let old_inner_left = bracket.inner_left;

        bracket.shrink_right(0.625);

        assert_relative_eq!(bracket.left, 0.0);
        assert_relative_eq!(bracket.right, 0.6);
        assert_relative_eq!(bracket.inner_right, old_inner_left);
        assert_relative_eq!(bracket.inner_left, 0.6 - 0.625 * 0.6);
    }

    #[test]
    fn reorder_restores_interior_order() {
        let mut bracket = ReductionBracket::new(0.0, 1.0, 0.6);

        // The reused point sits at a third of the new width, past a rate of 0.25.
        bracket.shrink_left(0.25);
        assert!(bracket.inner_left > bracket.inner_right);

        assert!(bracket.reorder());
        assert_relative_eq!(bracket.inner_left, 0.55);
        assert_relative_eq!(bracket.inner_right, 0.6);
        assert!(!bracket.reorder());
    }

    #[test]
    fn tolerance_follows_short_brackets() {
        // The whole bracket is narrower than `delta`, so an absolute width
        // test would stop on the first interior point.
        let objective = Objective::new(|x: &DVector<f64>| (x[0] - 2e-7).powi(2)).bind(1e-6);
        let x = DVector::from_element(1, 0.0);

        let next = reduce(
            &objective,
            &Config::default(),
            &x,
            &DVector::from_element(1, 1.0),
            LineSearch::GoldenSection,
            INV_PHI,
            |rate| rate,
        )
        .unwrap();

        assert_relative_eq!(next[0], 2e-7, epsilon = 1e-10);
    }

    #[test]
    fn exhausting_iterations_is_an_error() {
        let objective = Objective::new(|x: &DVector<f64>| (x[0] - 50.0).powi(2)).bind(1e-6);
        let config = Config::default().with_step(1.0).with_max_iters(4);
        let x = DVector::from_element(1, 0.0);

        let error = reduce(
            &objective,
            &config,
            &x,
            &DVector::from_element(1, 1.0),
            LineSearch::GoldenSection,
            INV_PHI,
            |rate| rate,
        )
        .unwrap_err();

        assert_eq!(error, Error::line_search(LineSearch::GoldenSection, 4));
    }
}
