//! Multivariate descent loops.
//!
//! Each driver iterates up to `max_iters` times. An iteration evaluates the
//! gradient, reports the iterate to the observer, stops if the gradient norm
//! is at most `epsilon`, and otherwise moves to the point returned by the
//! configured line search.

mod gradient_descent;
mod newton;
mod quasi_newton;

use nalgebra::DVector;
use plumbline_core::{BoundObjective, Observer};
use tracing::trace;

use super::{Action, Config, Error, Event, Method, Solution, Status};

/// Minimizes `objective` from `x0` with the method selected by `config`.
pub(super) fn minimize<Obs>(
    objective: &BoundObjective,
    config: &Config,
    x0: DVector<f64>,
    observer: &mut Obs,
) -> Result<Solution, Error>
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    match config.method() {
        Method::GradientDescent => gradient_descent::minimize(objective, config, x0, observer),
        Method::Newton => newton::minimize(objective, config, x0, observer),
        Method::QuasiNewton => quasi_newton::minimize(objective, config, x0, observer),
    }
}

/// What a driver should do with the current iterate.
enum Checkpoint {
    Continue,
    Finish(Solution),
}

/// Reports the iterate and decides whether the driver is done.
///
/// Convergence takes precedence over an observer's request to stop.
fn checkpoint<Obs>(
    objective: &BoundObjective,
    config: &Config,
    iter: usize,
    x: &DVector<f64>,
    gradient: &DVector<f64>,
    observer: &mut Obs,
) -> Checkpoint
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    let method = config.method();
    let gradient_norm = gradient.norm();
    let value = objective.value(x);
    trace!(%method, iter, objective = value, gradient_norm, "iterate");

    let event = Event {
        method,
        iter,
        x,
        objective: value,
        gradient_norm,
    };
    let action = observer.observe(&event);

    let status = if gradient_norm <= config.epsilon() {
        Status::Converged
    } else if let Some(Action::StopEarly) = action {
        Status::StoppedByObserver
    } else {
        return Checkpoint::Continue;
    };

    Checkpoint::Finish(Solution {
        status,
        x: x.clone(),
        objective: value,
        gradient_norm,
        iters: iter,
    })
}
