use nalgebra::DVector;
use plumbline_core::{BoundObjective, Observer};

use crate::optimization::{Action, Config, Error, Event, Method, Solution, line_search};

use super::{Checkpoint, checkpoint};

/// Steepest descent: `x ← line_search(x, −g(x))`.
pub(super) fn minimize<Obs>(
    objective: &BoundObjective,
    config: &Config,
    x0: DVector<f64>,
    observer: &mut Obs,
) -> Result<Solution, Error>
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    let mut x = x0;

    for iter in 0..config.max_iters() {
        let gradient = objective.gradient(&x);
        if let Checkpoint::Finish(solution) =
            checkpoint(objective, config, iter, &x, &gradient, observer)
        {
            return Ok(solution);
        }

        x = line_search::search(objective, config, &x, &(-gradient))?;
    }

    Err(Error::method(Method::GradientDescent, config.max_iters()))
}
