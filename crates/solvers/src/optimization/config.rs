use std::fmt;

use thiserror::Error;

/// One-dimensional strategy used to pick a point along a search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub enum LineSearch {
    /// Fixed step of length [`Config::trivial_step`] along the raw direction.
    Trivial,

    /// Interval reduction with the inverse golden ratio.
    GoldenSection,

    /// Interval reduction with a ratio that starts at 0.6 and tends to the
    /// inverse golden ratio.
    #[default]
    Fibonacci,

    /// Newton iteration on the directional derivative.
    Newton,

    /// Bisection on the sign of the directional derivative.
    Bisection,
}

impl fmt::Display for LineSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Trivial => "trivial line search",
            Self::GoldenSection => "golden section line search",
            Self::Fibonacci => "Fibonacci line search",
            Self::Newton => "Newton line search",
            Self::Bisection => "bisection line search",
        };
        f.write_str(name)
    }
}

/// Multivariate descent strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    /// Steepest descent along the negative gradient.
    GradientDescent,

    /// Newton direction from a dense solve against the Hessian.
    Newton,

    /// BFGS update of an approximate inverse Hessian.
    #[default]
    QuasiNewton,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GradientDescent => "gradient descent",
            Self::Newton => "Newton's method",
            Self::QuasiNewton => "BFGS",
        };
        f.write_str(name)
    }
}

/// Configuration for an optimizer run.
///
/// A `Config` is a plain value: [`Optimizer::solve`] copies it when it starts,
/// so reconfiguring the optimizer never affects a solve already in progress.
///
/// [`Optimizer::solve`]: super::Optimizer::solve
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    max_iters: usize,
    epsilon: f64,
    step: f64,
    delta: f64,
    trivial_step: f64,
    line_search: LineSearch,
    method: Method,
}

/// Errors that can occur when validating an optimizer config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_iters must be at least 1")]
    MaxIters,

    #[error("epsilon must be finite and non-negative")]
    Epsilon,

    #[error("step must be finite and positive")]
    Step,

    #[error("delta must be finite and non-negative")]
    Delta,

    #[error("trivial_step must be finite")]
    TrivialStep,
}

impl Default for Config {
    fn default() -> Self {
        let float_eps = f64::from(f32::EPSILON);
        Self {
            max_iters: i16::MAX.unsigned_abs().into(),
            epsilon: float_eps,
            step: (float_eps * f64::EPSILON).sqrt(),
            delta: float_eps,
            trivial_step: 1.0 / f64::from(i8::MAX),
            line_search: LineSearch::default(),
            method: Method::default(),
        }
    }
}

impl Config {
    /// Checks that every numeric setting is usable.
    ///
    /// # Errors
    ///
    /// Returns the first setting found to be out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::Epsilon);
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(ConfigError::Step);
        }
        if !self.delta.is_finite() || self.delta < 0.0 {
            return Err(ConfigError::Delta);
        }
        if !self.trivial_step.is_finite() {
            return Err(ConfigError::TrivialStep);
        }
        Ok(())
    }

    /// Sets the iteration cap shared by drivers and line searches.
    #[must_use]
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Sets the gradient-magnitude convergence threshold.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the finite-difference step and initial bracketing step.
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Sets the interval-width convergence threshold.
    #[must_use]
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    /// Sets the step length used by [`LineSearch::Trivial`].
    #[must_use]
    pub fn with_trivial_step(mut self, trivial_step: f64) -> Self {
        self.trivial_step = trivial_step;
        self
    }

    /// Sets the line search strategy.
    #[must_use]
    pub fn with_line_search(mut self, line_search: LineSearch) -> Self {
        self.line_search = line_search;
        self
    }

    /// Sets the descent method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Returns the iteration cap.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the gradient-magnitude convergence threshold.
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the finite-difference and bracketing step.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Returns the interval-width convergence threshold.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Returns the trivial line search step length.
    #[must_use]
    pub fn trivial_step(&self) -> f64 {
        self.trivial_step
    }

    /// Returns the line search strategy.
    #[must_use]
    pub fn line_search(&self) -> LineSearch {
        self.line_search
    }

    /// Returns the descent method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn defaults_follow_single_and_double_precision() {
        let config = Config::default();

        assert_eq!(config.max_iters(), 32_767);
        assert_relative_eq!(config.epsilon(), 1.192_092_9e-7, max_relative = 1e-7);
        assert_relative_eq!(config.delta(), config.epsilon());
        assert_relative_eq!(
            config.step(),
            (f64::from(f32::EPSILON) * f64::EPSILON).sqrt()
        );
        assert_relative_eq!(config.trivial_step(), 1.0 / 127.0);
        assert_eq!(config.line_search(), LineSearch::Fibonacci);
        assert_eq!(config.method(), Method::QuasiNewton);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builders_replace_single_fields() {
        let config = Config::default()
            .with_method(Method::Newton)
            .with_line_search(LineSearch::Bisection)
            .with_epsilon(1e-9);

        assert_eq!(config.method(), Method::Newton);
        assert_eq!(config.line_search(), LineSearch::Bisection);
        assert_relative_eq!(config.epsilon(), 1e-9);
        assert_eq!(config.max_iters(), Config::default().max_iters());
    }

    #[test]
    fn rejects_unusable_values() {
        let base = Config::default();

        assert_eq!(base.with_max_iters(0).validate(), Err(ConfigError::MaxIters));
        assert_eq!(base.with_epsilon(-1.0).validate(), Err(ConfigError::Epsilon));
        assert_eq!(base.with_step(0.0).validate(), Err(ConfigError::Step));
        assert_eq!(base.with_step(f64::NAN).validate(), Err(ConfigError::Step));
        assert_eq!(
            base.with_delta(f64::INFINITY).validate(),
            Err(ConfigError::Delta)
        );
        assert_eq!(
            base.with_trivial_step(f64::NAN).validate(),
            Err(ConfigError::TrivialStep)
        );
    }
}
