//! One-dimensional minimization along a search direction.
//!
//! Every strategy takes a point `x` and a direction `p` and returns the next
//! iterate on the ray `x + t·p`. All strategies except [`LineSearch::Trivial`]
//! normalize `p` first.
//!
//! # Strategies
//!
//! - [`LineSearch::Trivial`]: a fixed step, no iteration
//! - [`LineSearch::GoldenSection`]: derivative-free interval reduction
//! - [`LineSearch::Fibonacci`]: interval reduction with a converging ratio
//! - [`LineSearch::Newton`]: Newton iteration on the directional derivative
//! - [`LineSearch::Bisection`]: sign bisection on the directional derivative
//!
//! The interval strategies and bisection start from the bracket found by
//! [`advance_and_retreat`](super::advance_and_retreat).

mod bisection;
mod fibonacci;
mod golden_section;
mod interval;
mod newton;
mod trivial;

use nalgebra::DVector;
use plumbline_core::BoundObjective;

use super::{Config, Degeneracy, Error, LineSearch};

/// Runs the line search selected by `config` from `x` along `p`.
///
/// # Errors
///
/// Returns [`Error::NotConverged`] if the strategy exhausts `max_iters`, or
/// [`Error::Degenerate`] if the direction or the curvature is unusable.
pub fn search(
    objective: &BoundObjective,
    config: &Config,
    x: &DVector<f64>,
    p: &DVector<f64>,
) -> Result<DVector<f64>, Error> {
    match config.line_search() {
        LineSearch::Trivial => Ok(trivial::search(config, x, p)),
        LineSearch::GoldenSection => golden_section::search(objective, config, x, p),
        LineSearch::Fibonacci => fibonacci::search(objective, config, x, p),
        LineSearch::Newton => newton::search(objective, config, x, p),
        LineSearch::Bisection => bisection::search(objective, config, x, p),
    }
}

/// Returns `p` scaled to unit length.
fn unit(p: &DVector<f64>) -> Result<DVector<f64>, Degeneracy> {
    let norm = p.norm();
    if norm > 0.0 && norm.is_finite() {
        Ok(p / norm)
    } else {
        Err(Degeneracy::Direction(norm))
    }
}

/// Returns the point `x + t·d`.
fn along(x: &DVector<f64>, d: &DVector<f64>, t: f64) -> DVector<f64> {
    x + d * t
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use plumbline_core::Objective;

    /// Anisotropic bowl with its minimizer at (1, -2), where it takes the value 1.
    fn bowl() -> BoundObjective {
        Objective::new(|x: &DVector<f64>| {
            (x[0] - 1.0).powi(2) + 4.0 * (x[1] + 2.0).powi(2) + 1.0
        })
            .with_gradient(|x: &DVector<f64>| {
                DVector::from_vec(vec![2.0 * (x[0] - 1.0), 8.0 * (x[1] + 2.0)])
            })
            .with_hessian(|_: &DVector<f64>| DMatrix::from_diagonal(&DVector::from_vec(vec![2.0, 8.0])))
            .bind(1e-6)
    }

    #[test]
    fn every_strategy_minimizes_along_the_ray() {
        let objective = bowl();
        let x = DVector::from_vec(vec![-3.0, -2.0]);
        let p = DVector::from_vec(vec![1.0, 0.0]);

        for line_search in [
            LineSearch::GoldenSection,
            LineSearch::Fibonacci,
            LineSearch::Newton,
            LineSearch::Bisection,
        ] {
            let config = Config::default().with_line_search(line_search);
            let next = search(&objective, &config, &x, &p).expect("line search converges");

            assert_relative_eq!(next[0], 1.0, epsilon = 1e-5);
            assert_relative_eq!(next[1], -2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn direction_length_does_not_matter_after_normalization() {
        let objective = bowl();
        let x = DVector::from_vec(vec![-3.0, -2.0]);
        let config = Config::default().with_line_search(LineSearch::GoldenSection);

        let short = search(&objective, &config, &x, &DVector::from_vec(vec![0.01, 0.0])).unwrap();
        let long = search(&objective, &config, &x, &DVector::from_vec(vec![100.0, 0.0])).unwrap();

        assert_relative_eq!(short[0], long[0], epsilon = 1e-5);
    }

    #[test]
    fn zero_direction_is_degenerate() {
        let objective = bowl();
        let x = DVector::from_vec(vec![0.0, 0.0]);
        let config = Config::default().with_line_search(LineSearch::Bisection);

        let error = search(&objective, &config, &x, &DVector::zeros(2)).unwrap_err();

        assert_eq!(error, Error::Degenerate(Degeneracy::Direction(0.0)));
    }

    #[test]
    fn trivial_ignores_the_objective() {
        let objective = bowl();
        let x = DVector::from_vec(vec![0.0, 0.0]);
        let p = DVector::from_vec(vec![3.0, -6.0]);
        let config = Config::default()
            .with_line_search(LineSearch::Trivial)
            .with_trivial_step(0.5);

        let next = search(&objective, &config, &x, &p).unwrap();

        assert_relative_eq!(next, DVector::from_vec(vec![1.5, -3.0]));
    }
}
