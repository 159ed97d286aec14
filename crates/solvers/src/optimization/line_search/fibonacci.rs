use nalgebra::DVector;
use plumbline_core::BoundObjective;

use crate::optimization::{Config, Error, LineSearch};

use super::interval::reduce;

/// Ratio of the first reduction, the quotient of two small Fibonacci numbers.
const INITIAL_RATE: f64 = 0.6;

/// Fibonacci search on the advance-and-retreat bracket.
///
/// The reduction ratio follows `rate ← 1 / (1 + rate)`, the recurrence of
/// consecutive Fibonacci quotients, and tends to the inverse golden ratio.
pub(super) fn search(
    objective: &BoundObjective,
    config: &Config,
    x: &DVector<f64>,
    p: &DVector<f64>,
) -> Result<DVector<f64>, Error> {
    reduce(objective, config, x, p, LineSearch::Fibonacci, INITIAL_RATE, next_rate)
}

fn next_rate(rate: f64) -> f64 {
    1.0 / (1.0 + rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use plumbline_core::Objective;

    use crate::optimization::line_search::golden_section::INV_PHI;

    #[test]
    fn rate_converges_to_inverse_golden_ratio() {
        let rate = (0..40).fold(INITIAL_RATE, |rate, _| next_rate(rate));
        assert_relative_eq!(rate, INV_PHI, epsilon = 1e-12);
    }

    #[test]
    fn first_rates_are_fibonacci_quotients() {
        let second = next_rate(INITIAL_RATE);
        let third = next_rate(second);

        assert_relative_eq!(second, 5.0 / 8.0);
        assert_relative_eq!(third, 8.0 / 13.0);
    }

    #[test]
    fn changing_rate_keeps_the_minimizer_in_the_bracket() {
        let objective = Objective::new(|x: &DVector<f64>| (x[0] - 4.0).powi(2)).bind(1e-6);
        let x = DVector::from_element(1, 0.0);

        let next = search(&objective, &Config::default(), &x, &DVector::from_element(1, 1.0))
            .expect("Fibonacci search converges");

        assert_relative_eq!(next[0], 4.0, epsilon = 1e-6);
    }
}
