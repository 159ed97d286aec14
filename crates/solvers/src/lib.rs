//! Numerical solvers for the Plumbline toolkit.
//!
//! - [`optimization`]: unconstrained minimization with gradient descent,
//!   Newton and BFGS drivers over five interchangeable line searches
//! - [`ivp`]: initial value problems stepped by linear multistep or
//!   Runge–Kutta schemes, with implicit steps solved by the optimizer

pub mod ivp;
pub mod optimization;
