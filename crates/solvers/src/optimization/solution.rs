use nalgebra::DVector;

/// Indicates how the optimizer terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The gradient norm fell to or below `epsilon`.
    Converged,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a successful optimizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// The minimizer estimate.
    pub x: DVector<f64>,

    /// Objective value at `x`.
    pub objective: f64,

    /// Euclidean norm of the gradient at `x`.
    pub gradient_norm: f64,

    /// Number of line searches performed.
    pub iters: usize,
}
