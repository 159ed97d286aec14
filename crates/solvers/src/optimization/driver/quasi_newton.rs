use nalgebra::{DMatrix, DVector};
use plumbline_core::{BoundObjective, Observer};
use tracing::warn;

use crate::optimization::{
    Action, Config, Degeneracy, Error, Event, Method, Solution, line_search,
};

use super::{Checkpoint, checkpoint};

/// BFGS approximation of the inverse Hessian.
#[derive(Debug, Clone, PartialEq)]
struct InverseHessian(DMatrix<f64>);

impl InverseHessian {
    /// Starts from the `n × n` identity.
    fn identity(n: usize) -> Self {
        Self(DMatrix::identity(n, n))
    }

    /// Returns the quasi-Newton direction `−H·g`.
    fn direction(&self, gradient: &DVector<f64>) -> DVector<f64> {
        -(&self.0 * gradient)
    }

    /// Applies the BFGS inverse update for the step `s` and gradient change `y`:
    ///
    /// ```text
    /// H ← (I − s·yᵗ/(s·y))·H·(I − s·yᵗ/(s·y))ᵗ + s·sᵗ/(s·y)
    /// ```
    fn update(&mut self, s: &DVector<f64>, y: &DVector<f64>) -> Result<(), Degeneracy> {
        let sy = s.dot(y);
        if sy == 0.0 || !sy.is_finite() {
            return Err(Degeneracy::CurvaturePair(sy));
        }

        let n = s.len();
        let a = DMatrix::identity(n, n) - (s * y.transpose()) / sy;
        self.0 = &a * &self.0 * a.transpose() + (s * s.transpose()) / sy;
        Ok(())
    }
}

/// BFGS: `d = −H·g`, `x ← line_search(x, d)`, then update `H` from the step.
pub(super) fn minimize<Obs>(
    objective: &BoundObjective,
    config: &Config,
    x0: DVector<f64>,
    observer: &mut Obs,
) -> Result<Solution, Error>
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    let mut inverse_hessian = InverseHessian::identity(x0.len());
    let mut x = x0;
    let mut gradient = objective.gradient(&x);

    for iter in 0..config.max_iters() {
        if let Checkpoint::Finish(solution) =
            checkpoint(objective, config, iter, &x, &gradient, observer)
        {
            return Ok(solution);
        }

        let direction = inverse_hessian.direction(&gradient);
        let next = line_search::search(objective, config, &x, &direction)?;
        let next_gradient = objective.gradient(&next);

        let s = &next - &x;
        let y = &next_gradient - &gradient;
        inverse_hessian.update(&s, &y).inspect_err(|degeneracy| {
            warn!(iter, %degeneracy, "BFGS update broke down");
        })?;

        x = next;
        gradient = next_gradient;
    }

    Err(Error::method(Method::QuasiNewton, config.max_iters()))
}
