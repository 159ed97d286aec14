use nalgebra::DVector;
use plumbline_core::{Objective, Observer};
use tracing::{debug, warn};

use super::{Action, Config, Error, Event, LineSearch, Method, Solution, driver, line_search};

/// A reusable minimizer.
///
/// An `Optimizer` holds a [`Config`] and, once [`set_function`] has been
/// called, an [`Objective`]. Both can be replaced at any time between solves.
/// Each solve works on a snapshot of the configuration taken when it starts
/// and never mutates the optimizer, so a failed solve leaves it unchanged.
///
/// [`set_function`]: Optimizer::set_function
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: Config,
    objective: Option<Objective>,
}

impl Optimizer {
    /// Creates an optimizer with the default configuration and no objective.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an optimizer with the given configuration and no objective.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            objective: None,
        }
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the whole configuration.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Returns the bound objective, if any.
    #[must_use]
    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// Binds the objective, replacing any previous one.
    ///
    /// Derivatives the objective does not supply are synthesized by central
    /// differences with the `step` in effect when a solve starts.
    pub fn set_function(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Selects the descent method.
    pub fn set_method(&mut self, method: Method) {
        self.config = self.config.with_method(method);
    }

    /// Selects the descent method and the line search together.
    pub fn set_method_with(&mut self, method: Method, line_search: LineSearch) {
        self.config = self
            .config
            .with_method(method)
            .with_line_search(line_search);
    }

    /// Selects the line search.
    pub fn set_line_search(&mut self, line_search: LineSearch) {
        self.config = self.config.with_line_search(line_search);
    }

    /// Sets the iteration cap.
    pub fn set_max_iters(&mut self, max_iters: usize) {
        self.config = self.config.with_max_iters(max_iters);
    }

    /// Sets the gradient-magnitude convergence threshold.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.config = self.config.with_epsilon(epsilon);
    }

    /// Sets the finite-difference and initial bracketing step.
    pub fn set_step(&mut self, step: f64) {
        self.config = self.config.with_step(step);
    }

    /// Sets the interval-width convergence threshold.
    pub fn set_delta(&mut self, delta: f64) {
        self.config = self.config.with_delta(delta);
    }

    /// Sets the trivial line search step length.
    pub fn set_trivial_step(&mut self, trivial_step: f64) {
        self.config = self.config.with_trivial_step(trivial_step);
    }

    /// Runs the configured line search once from `x` along `p`.
    ///
    /// # Errors
    ///
    /// Returns an error if no objective is bound, the configuration is
    /// invalid, or the line search fails.
    pub fn line_search(&self, x: &DVector<f64>, p: &DVector<f64>) -> Result<DVector<f64>, Error> {
        let config = self.config;
        config.validate()?;
        let objective = self.objective.as_ref().ok_or(Error::Unbound)?.bind(config.step());

        line_search::search(&objective, &config, x, p)
    }

    /// Minimizes the bound objective starting from `x0`.
    ///
    /// This is a convenience wrapper around [`solve_observed`] that uses a
    /// no-op observer.
    ///
    /// # Errors
    ///
    /// Returns an error if no objective is bound, the configuration is
    /// invalid, a loop runs out of iterations, or the iteration degenerates.
    ///
    /// [`solve_observed`]: Optimizer::solve_observed
    pub fn solve(&self, x0: &DVector<f64>) -> Result<Solution, Error> {
        self.solve_observed(x0, ())
    }

    /// Minimizes the bound objective starting from `x0`.
    ///
    /// The observer receives an [`Event`] for every driver iteration and may
    /// return [`Action::StopEarly`] to end the run with the current iterate.
    ///
    /// # Errors
    ///
    /// Returns an error if no objective is bound, the configuration is
    /// invalid, a loop runs out of iterations, or the iteration degenerates.
    pub fn solve_observed<Obs>(&self, x0: &DVector<f64>, mut observer: Obs) -> Result<Solution, Error>
    where
        Obs: for<'a> Observer<Event<'a>, Action>,
    {
        let config = self.config;
        config.validate()?;
        let objective = self.objective.as_ref().ok_or(Error::Unbound)?.bind(config.step());

        debug!(
            method = %config.method(),
            line_search = %config.line_search(),
            dim = x0.len(),
            "starting solve"
        );

        driver::minimize(&objective, &config, x0.clone(), &mut observer)
            .inspect(|solution| {
                debug!(
                    status = ?solution.status,
                    iters = solution.iters,
                    objective = solution.objective,
                    gradient_norm = solution.gradient_norm,
                    "solve finished"
                );
            })
            .inspect_err(|error| warn!(%error, "solve failed"))
    }
}
