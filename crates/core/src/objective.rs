use std::{fmt, rc::Rc};

use nalgebra::{DMatrix, DVector};

use crate::finite_diff;

/// Shared scalar objective callable.
pub type ValueFn = Rc<dyn Fn(&DVector<f64>) -> f64>;

/// Shared gradient callable.
pub type GradientFn = Rc<dyn Fn(&DVector<f64>) -> DVector<f64>>;

/// Shared Hessian callable.
pub type HessianFn = Rc<dyn Fn(&DVector<f64>) -> DMatrix<f64>>;

/// A scalar objective `f: Rⁿ → R` with optional analytic derivatives.
///
/// Derivatives that are not supplied are synthesized by central finite
/// differences when the objective is [bound](Objective::bind) to a step size.
/// Cloning is cheap: the callables are reference counted.
#[derive(Clone)]
pub struct Objective {
    value: ValueFn,
    gradient: Option<GradientFn>,
    hessian: Option<HessianFn>,
}

impl Objective {
    /// Creates an objective from its value function alone.
    pub fn new<F>(value: F) -> Self
    where
        F: Fn(&DVector<f64>) -> f64 + 'static,
    {
        Self {
            value: Rc::new(value),
            gradient: None,
            hessian: None,
        }
    }

    /// Supplies an analytic gradient.
    #[must_use]
    pub fn with_gradient<G>(mut self, gradient: G) -> Self
    where
        G: Fn(&DVector<f64>) -> DVector<f64> + 'static,
    {
        self.gradient = Some(Rc::new(gradient));
        self
    }

    /// Supplies an analytic Hessian.
    #[must_use]
    pub fn with_hessian<H>(mut self, hessian: H) -> Self
    where
        H: Fn(&DVector<f64>) -> DMatrix<f64> + 'static,
    {
        self.hessian = Some(Rc::new(hessian));
        self
    }

    /// Evaluates the objective at `x`.
    #[must_use]
    pub fn value(&self, x: &DVector<f64>) -> f64 {
        (self.value)(x)
    }

    /// Returns `true` if an analytic gradient was supplied.
    #[must_use]
    pub fn has_gradient(&self) -> bool {
        self.gradient.is_some()
    }

    /// Returns `true` if an analytic Hessian was supplied.
    #[must_use]
    pub fn has_hessian(&self) -> bool {
        self.hessian.is_some()
    }

    /// Resolves every missing derivative using central differences over `step`.
    ///
    /// A missing gradient differences the value function. A missing Hessian
    /// differences the gradient, whichever one ends up bound.
    #[must_use]
    pub fn bind(&self, step: f64) -> BoundObjective {
        let value = Rc::clone(&self.value);
        let gradient = match &self.gradient {
            Some(gradient) => Rc::clone(gradient),
            None => finite_diff::central_gradient(Rc::clone(&value), step),
        };
        let hessian = match &self.hessian {
            Some(hessian) => Rc::clone(hessian),
            None => finite_diff::central_hessian(Rc::clone(&gradient), step),
        };

        BoundObjective {
            value,
            gradient,
            hessian,
        }
    }
}

impl fmt::Debug for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Objective")
            .field("gradient", &self.has_gradient())
            .field("hessian", &self.has_hessian())
            .finish_non_exhaustive()
    }
}

/// An objective with every derivative available.
///
/// Produced by [`Objective::bind`]; this is what the solvers evaluate.
#[derive(Clone)]
pub struct BoundObjective {
    value: ValueFn,
    gradient: GradientFn,
    hessian: HessianFn,
}

impl BoundObjective {
    /// Evaluates the objective at `x`.
    #[must_use]
    pub fn value(&self, x: &DVector<f64>) -> f64 {
        (self.value)(x)
    }

    /// Evaluates the gradient at `x`.
    #[must_use]
    pub fn gradient(&self, x: &DVector<f64>) -> DVector<f64> {
        (self.gradient)(x)
    }

    /// Evaluates the Hessian at `x`.
    #[must_use]
    pub fn hessian(&self, x: &DVector<f64>) -> DMatrix<f64> {
        (self.hessian)(x)
    }
}

impl fmt::Debug for BoundObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundObjective").finish_non_exhaustive()
    }
}
