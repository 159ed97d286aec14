//! Unconstrained minimization of scalar objectives over `Rⁿ`.
//!
//! An [`Optimizer`] binds an [`Objective`](plumbline_core::Objective) and a
//! [`Config`], then minimizes from a starting point with one of three descent
//! methods. Each method delegates step lengths to one of five line searches,
//! so any [`Method`] can be paired with any [`LineSearch`].
//!
//! # Methods
//!
//! - [`Method::GradientDescent`]: steepest descent along `−∇f`
//! - [`Method::Newton`]: solves `∇²f·d = −∇f` each iteration
//! - [`Method::QuasiNewton`]: BFGS with an inverse-Hessian update
//!
//! Convergence is declared when the gradient norm falls to `epsilon`. Line
//! searches stop once their interval is narrower than `delta`.

mod action;
mod bracket;
mod config;
mod driver;
mod error;
mod event;
pub mod line_search;
mod optimizer;
mod solution;


pub use action::Action;
pub use bracket::advance_and_retreat;
pub use config::{Config, ConfigError, LineSearch, Method};
pub use error::{Degeneracy, Error, Routine};
pub use event::Event;
pub use optimizer::Optimizer;
pub use solution::{Solution, Status};
