//! Core traits and types for the Plumbline toolkit.
//!
//! This crate defines the shared abstractions that the solvers build on:
//!
//! - [`Objective`]: a scalar objective with optional analytic derivatives
//! - [`BoundObjective`]: an objective whose missing derivatives have been
//!   filled in by central finite differences
//! - [`Observer`]: receives solver events and optionally returns control actions
//! - [`finite_diff`]: helpers that turn a value (or gradient) callable into a
//!   finite-difference gradient (or Hessian) callable

pub mod finite_diff;

mod objective;
mod observer;

pub use objective::{BoundObjective, GradientFn, HessianFn, Objective, ValueFn};
pub use observer::Observer;
