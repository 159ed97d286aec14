use std::fmt;

use thiserror::Error;

use super::{ConfigError, LineSearch, Method};

/// The loop that ran out of iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routine {
    LineSearch(LineSearch),
    Method(Method),
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineSearch(line_search) => fmt::Display::fmt(line_search, f),
            Self::Method(method) => fmt::Display::fmt(method, f),
        }
    }
}

/// A numerical breakdown that leaves the next iterate undefined.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Degeneracy {
    #[error("the Hessian is singular")]
    SingularHessian,

    #[error("curvature along the search direction is {0}")]
    Curvature(f64),

    #[error("the BFGS update has s·y = {0}")]
    CurvaturePair(f64),

    #[error("the search direction has length {0}")]
    Direction(f64),
}

/// Errors that can occur while minimizing an objective.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("no objective is bound; call `set_function` before solving")]
    Unbound,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{routine} did not converge within {max_iters} iterations")]
    NotConverged { routine: Routine, max_iters: usize },

    #[error("numerical degeneracy: {0}")]
    Degenerate(#[from] Degeneracy),
}

impl Error {
    pub(crate) fn line_search(line_search: LineSearch, max_iters: usize) -> Self {
        Self::NotConverged {
            routine: Routine::LineSearch(line_search),
            max_iters,
        }
    }

    pub(crate) fn method(method: Method, max_iters: usize) -> Self {
        Self::NotConverged {
            routine: Routine::Method(method),
            max_iters,
        }
    }
}
