//! Central finite-difference derivatives.
//!
//! Each helper takes the callable to difference and a step size and returns a
//! new callable that owns both.

use std::rc::Rc;

use nalgebra::{DMatrix, DVector};

use crate::{GradientFn, HessianFn, ValueFn};

/// Returns a gradient callable built from central differences of `value`.
///
/// Component `i` is `(f(x + h·eᵢ) − f(x − h·eᵢ)) / 2h`.
#[must_use]
pub fn central_gradient(value: ValueFn, step: f64) -> GradientFn {
    Rc::new(move |x: &DVector<f64>| gradient_at(&*value, x, step))
}

/// Returns a Hessian callable built from central differences of `gradient`.
///
/// Column `i` is `(g(x + h·eᵢ) − g(x − h·eᵢ)) / 2h`.
#[must_use]
pub fn central_hessian(gradient: GradientFn, step: f64) -> HessianFn {
    Rc::new(move |x: &DVector<f64>| hessian_at(&*gradient, x, step))
}

/// Evaluates a central-difference gradient of `f` at `x`.
pub fn gradient_at<F>(f: &F, x: &DVector<f64>, step: f64) -> DVector<f64>
where
    F: Fn(&DVector<f64>) -> f64 + ?Sized,
{
    let mut shifted = x.clone();
    DVector::from_fn(x.len(), |i, _| {
        let origin = shifted[i];

        shifted[i] = origin + step;
        let forward = f(&shifted);
        shifted[i] = origin - step;
        let backward = f(&shifted);
        shifted[i] = origin;

        (forward - backward) / (2.0 * step)
    })
}

/// Evaluates a central-difference Jacobian of the vector field `g` at `x`.
///
/// When `g` is a gradient this is the Hessian of the underlying objective.
pub fn hessian_at<G>(g: &G, x: &DVector<f64>, step: f64) -> DMatrix<f64>
where
    G: Fn(&DVector<f64>) -> DVector<f64> + ?Sized,
{
    let n = x.len();
    let mut hessian = DMatrix::zeros(n, n);
    let mut shifted = x.clone();

    for i in 0..n {
        let origin = shifted[i];

        shifted[i] = origin + step;
        let forward = g(&shifted);
        shifted[i] = origin - step;
        let backward = g(&shifted);
        shifted[i] = origin;

        hessian.set_column(i, &((forward - backward) / (2.0 * step)));
    }

    hessian
}
