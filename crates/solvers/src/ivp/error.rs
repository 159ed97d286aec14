use thiserror::Error;

use crate::optimization;

use super::HistoryError;

/// Coefficients that do not describe a usable scheme.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemeError {
    #[error("beta must hold at least one coefficient")]
    EmptyBeta,

    #[error("the scheme must look back at least one sample")]
    NoLookback,

    #[error("the tableau must have at least one stage")]
    NoStages,

    #[error("a {rows}×{cols} matrix does not fit {stages} stages")]
    MatrixShape {
        stages: usize,
        rows: usize,
        cols: usize,
    },

    #[error("c has {found} nodes for {stages} stages")]
    NodeCount { stages: usize, found: usize },

    #[error("coefficients must be finite")]
    NonFinite,
}

/// Errors that can occur while integrating an initial value problem.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("no right-hand side is set; call `set_rhs` before solving")]
    MissingRhs,

    #[error("no scheme is set; call `set_method` before solving")]
    MissingScheme,

    #[error("invalid history: {0}")]
    InvalidHistory(#[from] HistoryError),

    #[error("invalid scheme: {0}")]
    InvalidScheme(#[from] SchemeError),

    #[error("step to t = {time} failed: {source}")]
    Step {
        time: f64,
        #[source]
        source: optimization::Error,
    },
}
