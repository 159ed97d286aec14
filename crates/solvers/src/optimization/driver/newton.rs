use nalgebra::DVector;
use plumbline_core::{BoundObjective, Observer};

use crate::optimization::{
    Action, Config, Degeneracy, Error, Event, Method, Solution, line_search,
};

use super::{Checkpoint, checkpoint};

/// Newton's method: solve `G(x)·Δ = −g(x)`, then `x ← line_search(x, Δ)`.
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

        let direction = newton_direction(objective.hessian(&x), &gradient)?;
        x = line_search::search(objective, config, &x, &direction)?;
    }

    Err(Error::method(Method::Newton, config.max_iters()))
}

/// Solves `hessian · Δ = −gradient` by LU decomposition.
fn newton_direction(
    hessian: nalgebra::DMatrix<f64>,
    gradient: &DVector<f64>,
) -> Result<DVector<f64>, Degeneracy> {
    hessian
        .lu()
        .solve(&(-gradient))
        .filter(|direction| direction.iter().all(|v| v.is_finite()))
        .ok_or(Degeneracy::SingularHessian)
}
