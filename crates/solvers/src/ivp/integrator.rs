use std::{fmt, rc::Rc};

use nalgebra::{DMatrix, DVector};
use plumbline_core::Observer;
use tracing::{debug, warn};

use crate::optimization::Optimizer;

use super::{
    Action, Error, Event, History, HistoryError, Multistep, RhsFn, Sample, Scheme, Solution,
    Status, Tableau,
};

/// Stepping stops once the remaining span is within this fraction of `k`.
const END_TOLERANCE: f64 = 1e-6;

/// Integrator for `u' = f(u, t)` from a recorded history.
///
/// The history is seeded with [`set_init_value`](Ivp::set_init_value) and
/// grows by one sample per step. Implicit schemes solve each step by
/// minimizing a squared residual with a copy of the integrator's
/// [`Optimizer`], so its configuration applies to every implicit step.
#[derive(Clone, Default)]
pub struct Ivp {
    rhs: Option<RhsFn>,
    scheme: Option<Scheme>,
    history: History,
    optimizer: Optimizer,
}

impl Ivp {
    /// Creates an integrator with no right-hand side, no scheme, an empty
    /// history and a default [`Optimizer`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the right-hand side `f(u, t)`.
    pub fn set_rhs<F>(&mut self, rhs: F)
    where
        F: Fn(&DVector<f64>, f64) -> DVector<f64> + 'static,
    {
        self.rhs = Some(Rc::new(rhs));
    }

    /// Replaces the history with the given samples.
    pub fn set_init_value(&mut self, history: impl Into<History>) {
        self.history = history.into();
    }

    /// Selects the stepping scheme.
    pub fn set_method(&mut self, scheme: impl Into<Scheme>) {
        self.scheme = Some(scheme.into());
    }

    /// Selects a linear multistep method from its coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScheme`] if [`Multistep::new`] rejects the
    /// coefficients. The current scheme is kept in that case.
    pub fn set_multistep(&mut self, alpha: Vec<f64>, beta: Vec<f64>) -> Result<(), Error> {
        self.scheme = Some(Multistep::new(alpha, beta)?.into());
        Ok(())
    }

    /// Selects a Runge–Kutta method from its Butcher tableau.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScheme`] if [`Tableau::new`] rejects the
    /// coefficients. The current scheme is kept in that case.
    pub fn set_tableau(
        &mut self,
        a: DMatrix<f64>,
        b: DVector<f64>,
        c: DVector<f64>,
    ) -> Result<(), Error> {
        self.scheme = Some(Tableau::new(a, b, c)?.into());
        Ok(())
    }

    /// Returns the selected scheme, if any.
    #[must_use]
    pub fn scheme(&self) -> Option<&Scheme> {
        self.scheme.as_ref()
    }

    /// Returns the recorded samples, including the initial ones.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the optimizer used for implicit steps.
    #[must_use]
    pub fn optimizer(&self) -> &Optimizer {
        &self.optimizer
    }

    /// Gives access to the optimizer used for implicit steps.
    pub fn optimizer_mut(&mut self) -> &mut Optimizer {
        &mut self.optimizer
    }

    /// Interpolates the recorded trajectory at `time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHistory`] if the history is empty or `time`
    /// lies outside it.
    pub fn value_at(&self, time: f64) -> Result<DVector<f64>, Error> {
        Ok(self.history.value_at(time)?)
    }

    /// Steps from the last recorded sample until `end` with step `k`.
    ///
    /// # Errors
    ///
    /// See [`solve_observed`](Ivp::solve_observed).
    pub fn solve(&mut self, end: f64, k: f64) -> Result<Solution, Error> {
        self.solve_observed(end, k, ())
    }

    /// Steps from the last recorded sample until `end` with step `k`.
    ///
    /// Each new sample is placed `k` after the previous one. Stepping stops
    /// once the last sample is within `1e-6·k` of `end`, and a sample that
    /// lands that close to `end` is recorded at `end` exactly.
    ///
    /// The observer receives an [`Event`] after each step and may return
    /// [`Action::StopEarly`] to keep the samples so far and return.
    ///
    /// # Errors
    ///
    /// Returns an error before any step is taken if the right-hand side or
    /// scheme is missing, or the history does not fit `k` and the scheme.
    /// A failing step returns [`Error::Step`]; samples recorded by earlier
    /// steps of the same call are kept.
    pub fn solve_observed<Obs>(&mut self, end: f64, k: f64, mut observer: Obs) -> Result<Solution, Error>
    where
        Obs: for<'a> Observer<Event<'a>, Action>,
    {
        let rhs = self.rhs.clone().ok_or(Error::MissingRhs)?;
        let scheme = self.scheme.clone().ok_or(Error::MissingScheme)?;
        self.history.check_spacing(k)?;
        self.history.check_depth(scheme.lookback())?;

        let tolerance = END_TOLERANCE * k;
        let mut steps = 0;

        debug!(
            end,
            k,
            explicit = scheme.is_explicit(),
            samples = self.history.len(),
            "starting integration"
        );

        loop {
            let last = self.history.last().ok_or(HistoryError::Empty)?;
            if end - last.time <= tolerance {
                break;
            }

            let mut time = last.time + k;
            if (end - time).abs() <= tolerance {
                time = end;
            }

            let state = scheme
                .step(&rhs, &self.history, last, k, &self.optimizer)
                .map_err(|source| {
                    warn!(time, %source, "integration step failed");
                    Error::Step { time, source }
                })?;

            steps += 1;
            let sample = Sample::new(state, time);
            let action = observer.observe(&Event {
                step: steps,
                sample: &sample,
            });
            self.history.push(sample);

            if let Some(Action::StopEarly) = action {
                debug!(steps, time, "integration stopped by observer");
                return Ok(Solution {
                    status: Status::StoppedByObserver,
                    steps,
                    time,
                });
            }
        }

        let time = self.history.last().map_or(end, |sample| sample.time);
        debug!(steps, time, "integration finished");

        Ok(Solution {
            status: Status::Complete,
            steps,
            time,
        })
    }
}

impl fmt::Debug for Ivp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ivp")
            .field("rhs", &self.rhs.as_ref().map(|_| "<fn>"))
            .field("scheme", &self.scheme)
            .field("history", &self.history)
            .field("optimizer", &self.optimizer)
            .finish()
    }
}
