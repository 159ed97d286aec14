use nalgebra::DVector;

use super::Method;

/// Event emitted by the optimizer once per driver iteration.
///
/// The event describes the current iterate before the line search moves it.
/// The final event of a converged run describes the returned point.
#[derive(Debug, Clone)]
pub struct Event<'a> {
    /// The driver that produced this iterate.
    pub method: Method,

    /// Iteration number, starting at 0 for the initial point.
    pub iter: usize,

    /// The current iterate.
    pub x: &'a DVector<f64>,

    /// Objective value at `x`.
    pub objective: f64,

    /// Euclidean norm of the gradient at `x`.
    pub gradient_norm: f64,
}
