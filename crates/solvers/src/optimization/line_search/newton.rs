use nalgebra::DVector;
use plumbline_core::BoundObjective;
use tracing::trace;

use crate::optimization::{Config, Degeneracy, Error, LineSearch};

use super::{along, unit};

/// Newton iteration on the directional derivative `φ'(t) = g(x + t·d)·d`.
///
/// Each step divides the directional slope by the directional curvature
/// `(G(x + t·d)·d)·d`. The search stops when the slope or the full gradient
/// norm drops below `epsilon`.
pub(super) fn search(
    objective: &BoundObjective,
    config: &Config,
    x: &DVector<f64>,
    p: &DVector<f64>,
) -> Result<DVector<f64>, Error> {
    let d = unit(p)?;
    let mut t = 0.0;

    for iter in 0..config.max_iters() {
        let point = along(x, &d, t);
        let gradient = objective.gradient(&point);
        let slope = gradient.dot(&d);

        if slope.abs() < config.epsilon() || gradient.norm() < config.epsilon() {
            trace!(line_search = %LineSearch::Newton, iter, t, "line search converged");
            return Ok(point);
        }

        let curvature = (objective.hessian(&point) * &d).dot(&d);
        if curvature == 0.0 || !curvature.is_finite() {
            return Err(Degeneracy::Curvature(curvature).into());
        }

        t -= slope / curvature;
    }

    Err(Error::line_search(LineSearch::Newton, config.max_iters()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use plumbline_core::Objective;

    #[test]
    fn quadratic_slice_converges_in_one_step() {
        let objective = Objective::new(|x: &DVector<f64>| (x[0] - 2.0).powi(2))
            .with_gradient(|x: &DVector<f64>| DVector::from_element(1, 2.0 * (x[0] - 2.0)))
            .with_hessian(|_: &DVector<f64>| DMatrix::from_element(1, 1, 2.0))
            .bind(1e-6);
        let config = Config::default().with_max_iters(2);

        let next = search(&objective, &config, &DVector::zeros(1), &DVector::from_element(1, 5.0))
            .expect("one Newton step is exact");

        assert_relative_eq!(next[0], 2.0);
    }

    #[test]
    fn flat_curvature_is_degenerate() {
        let objective = Objective::new(|x: &DVector<f64>| x[0])
            .with_gradient(|_: &DVector<f64>| DVector::from_element(1, 1.0))
            .with_hessian(|_: &DVector<f64>| DMatrix::zeros(1, 1))
            .bind(1e-6);

        let error = search(
            &objective,
            &Config::default(),
            &DVector::zeros(1),
            &DVector::from_element(1, -1.0),
        )
        .unwrap_err();

        assert_eq!(error, Error::Degenerate(Degeneracy::Curvature(0.0)));
    }
}
