//! Initial value problems `u' = f(u, t)` on a fixed step.
//!
//! An [`Ivp`] owns a [`History`] of evenly spaced samples and extends it with
//! a [`Scheme`]: either a linear [`Multistep`] method or a Runge–Kutta
//! [`Tableau`]. Explicit schemes compute each step directly. Implicit schemes
//! minimize the squared residual of the step equations with the
//! [`optimization`](crate::optimization) module.
//!
//! # Example
//!
//! ```
//! use nalgebra::DVector;
//! use plumbline_solvers::ivp::{Ivp, MultistepMethod};
//!
//! let mut ivp = Ivp::new();
//! ivp.set_rhs(|u: &DVector<f64>, t: f64| u.add_scalar(t));
//! ivp.set_init_value(vec![(DVector::from_element(1, -1.0), 0.0)]);
//! ivp.set_method(MultistepMethod::BackwardEuler);
//!
//! ivp.solve(0.1, 0.01)?;
//! let u = ivp.value_at(0.1)?;
//! assert!((u[0] + 1.1).abs() < 1e-4);
//! # Ok::<(), plumbline_solvers::ivp::Error>(())
//! ```

mod action;
mod error;
mod event;
mod history;
mod integrator;
mod multistep;
mod runge_kutta;
mod scheme;
mod solution;


use std::rc::Rc;

use nalgebra::DVector;

pub use action::Action;
pub use error::{Error, SchemeError};
pub use event::Event;
pub use history::{History, HistoryError, Sample};
pub use integrator::Ivp;
pub use multistep::{Multistep, MultistepMethod};
pub use runge_kutta::{RungeKuttaMethod, Tableau};
pub use scheme::Scheme;
pub use solution::{Solution, Status};

/// Shared right-hand side callable `f(u, t)`.
pub type RhsFn = Rc<dyn Fn(&DVector<f64>, f64) -> DVector<f64>>;
