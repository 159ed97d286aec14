use nalgebra::DVector;

use crate::optimization::{self, Optimizer};

use super::{History, Multistep, MultistepMethod, RhsFn, RungeKuttaMethod, Sample, Tableau};

/// A time-stepping scheme: linear multistep or Runge–Kutta.
///
/// Named presets and explicit coefficients both convert into a `Scheme`, so
/// [`Ivp::set_method`](super::Ivp::set_method) accepts any of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Scheme {
    Multistep(Multistep),
    RungeKutta(Tableau),
}

impl Scheme {
    /// Returns `true` if a step needs no optimization.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        match self {
            Self::Multistep(method) => method.is_explicit(),
            Self::RungeKutta(tableau) => tableau.is_explicit(),
        }
    }

    /// Returns how many recorded samples a step reads.
    #[must_use]
    pub fn lookback(&self) -> usize {
        match self {
            Self::Multistep(method) => method.lookback(),
            Self::RungeKutta(_) => 1,
        }
    }

    pub(super) fn step(
        &self,
        rhs: &RhsFn,
        history: &History,
        last: &Sample,
        k: f64,
        optimizer: &Optimizer,
    ) -> Result<DVector<f64>, optimization::Error> {
        match self {
            Self::Multistep(method) => method.step(rhs, history, last, k, optimizer),
            Self::RungeKutta(tableau) => tableau.step(rhs, last, k, optimizer),
        }
    }
}

impl From<Multistep> for Scheme {
    fn from(method: Multistep) -> Self {
        Self::Multistep(method)
    }
}

impl From<MultistepMethod> for Scheme {
    fn from(method: MultistepMethod) -> Self {
        Self::Multistep(method.into())
    }
}

impl From<Tableau> for Scheme {
    fn from(tableau: Tableau) -> Self {
        Self::RungeKutta(tableau)
    }
}

impl From<RungeKuttaMethod> for Scheme {
    fn from(method: RungeKuttaMethod) -> Self {
        Self::RungeKutta(method.into())
    }
}
