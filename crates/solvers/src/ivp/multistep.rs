use std::fmt;

use nalgebra::DVector;
use plumbline_core::Objective;

use crate::optimization::{self, Optimizer};

use super::{History, RhsFn, Sample, SchemeError};

/// Named linear multistep presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub enum MultistepMethod {
    ForwardEuler,
    BackwardEuler,
    Trapezoidal,
    Midpoint,
}

impl fmt::Display for MultistepMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ForwardEuler => "forward Euler",
            Self::BackwardEuler => "backward Euler",
            Self::Trapezoidal => "trapezoidal rule",
            Self::Midpoint => "explicit midpoint",
        })
    }
}

/// Coefficients of a linear multistep method.
///
/// With `n` recorded samples, the next state `u` at `t + k` satisfies
///
/// ```text
/// u = Σ_{i≥1} alpha[i]·u[n−i] + k·beta[0]·f(u, t + k) + k·Σ_{i≥1} beta[i]·f(u[n−i], t[n−i])
/// ```
///
/// `alpha[0]` is not used. The method is explicit when `|beta[0]|` is at
/// most `f32::EPSILON`.
#[derive(Debug, Clone, PartialEq)]
pub struct Multistep {
    alpha: Vec<f64>,
    beta: Vec<f64>,
}

impl Multistep {
    /// Creates a method from its coefficients.
    ///
    /// # Errors
    ///
    /// Returns an error if `beta` is empty, a coefficient is not finite, or
    /// neither list reaches back past the unknown.
    pub fn new(alpha: Vec<f64>, beta: Vec<f64>) -> Result<Self, SchemeError> {
        if beta.is_empty() {
            return Err(SchemeError::EmptyBeta);
        }
        if alpha.iter().chain(&beta).any(|coefficient| !coefficient.is_finite()) {
            return Err(SchemeError::NonFinite);
        }

        let method = Self { alpha, beta };
        if method.lookback() == 0 {
            return Err(SchemeError::NoLookback);
        }
        Ok(method)
    }

    /// Returns the state coefficients, `alpha[i]` weighting the sample `i`
    /// steps back.
    #[must_use]
    pub fn alpha(&self) -> &[f64] {
        &self.alpha
    }

    /// Returns the slope coefficients. `beta[0]` weights the unknown.
    #[must_use]
    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    /// Returns `true` if the next state does not depend on itself.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.beta[0].abs() <= f64::from(f32::EPSILON)
    }

    /// Returns how many recorded samples a step reads.
    #[must_use]
    pub fn lookback(&self) -> usize {
        self.alpha.len().max(self.beta.len()).saturating_sub(1)
    }

    /// Computes the state following `last`, the newest sample of `history`.
    ///
    /// The history must already hold at least [`lookback`](Self::lookback)
    /// samples spaced by `k`.
    pub(super) fn step(
        &self,
        rhs: &RhsFn,
        history: &History,
        last: &Sample,
        k: f64,
        optimizer: &Optimizer,
    ) -> Result<DVector<f64>, optimization::Error> {
        let next_time = last.time + k;

        // Contributions of the recorded samples, newest first.
        let recent = || (1..).map_while(|back| history.from_end(back));
        let mut known = DVector::zeros(last.state.len());
        for (alpha, sample) in self.alpha.iter().skip(1).zip(recent()) {
            known += &sample.state * *alpha;
        }
        for (beta, sample) in self.beta.iter().skip(1).zip(recent()) {
            known += rhs(&sample.state, sample.time) * (k * beta);
        }

        if self.is_explicit() {
            return Ok(known);
        }

        let implicit = k * self.beta[0];
        let rhs = RhsFn::clone(rhs);
        let residual = Objective::new(move |u: &DVector<f64>| {
            let e = u - &known - rhs(u, next_time) * implicit;
            e.norm_squared()
        });

        let mut optimizer = optimizer.clone();
        optimizer.set_function(residual);
        Ok(optimizer.solve(&last.state)?.x)
    }
}

impl From<MultistepMethod> for Multistep {
    fn from(method: MultistepMethod) -> Self {
        let (alpha, beta) = match method {
            MultistepMethod::ForwardEuler => (vec![0.0, 1.0], vec![0.0, 1.0]),
            MultistepMethod::BackwardEuler => (vec![0.0, 1.0], vec![1.0]),
            MultistepMethod::Trapezoidal => (vec![0.0, 1.0], vec![0.5, 0.5]),
            MultistepMethod::Midpoint => (vec![0.0, 0.0, 1.0], vec![0.0, 2.0]),
        };
        Self { alpha, beta }
    }
}
