//! Provides the error types returned by the root-finding and quadrature
//! routines, along with `ErrMsg`, a simple trait to associate a constant
//! string with each kind of error.

use thiserror::Error;

/// Simple trait to associate a constant string with an error type.
pub trait ErrMsg {
    fn msg(&self) -> &'static str;
}

/// Errors raised by the iterative root-finders.
///
/// Every variant is fatal to the call that produced it; nothing is retried
/// internally.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum RootError {
    #[error("invalid bracket [{a}, {b}]: f(a) = {fa} and f(b) = {fb} must have opposite signs with a < b")]
    InvalidBracket { a: f64, b: f64, fa: f64, fb: f64 },

    #[error("iteration map is not locally convergent at {x0}: |g'(x0)| ~ {dg} >= 1")]
    NotConvergent { x0: f64, dg: f64 },

    #[error("derivative vanished at x = {x}")]
    ZeroDerivative { x: f64 },

    #[error("secant slope vanished between x0 = {x0} and x1 = {x1}")]
    ZeroSlope { x0: f64, x1: f64 },

    #[error("failed to converge after {maxiters} iterations (last estimate {last})")]
    ConvergenceFailure { maxiters: usize, last: f64 },
}
pub type RootResult<T> = Result<T, RootError>;

impl ErrMsg for RootError {
    fn msg(&self) -> &'static str {
        return match self {
            Self::InvalidBracket { .. } => "invalid bracket",
            Self::NotConvergent { .. } => "not convergent",
            Self::ZeroDerivative { .. } => "zero derivative",
            Self::ZeroSlope { .. } => "zero secant slope",
            Self::ConvergenceFailure { .. } => "convergence failure",
        };
    }
}

/// Errors raised by the quadrature rules and Romberg extrapolation.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum QuadError {
    #[error("{rule}: invalid node count {n}: {requirement}")]
    InvalidNodeCount {
        rule: &'static str,
        n: usize,
        requirement: &'static str,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
pub type QuadResult<T> = Result<T, QuadError>;

impl ErrMsg for QuadError {
    fn msg(&self) -> &'static str {
        return match self {
            Self::InvalidNodeCount { .. } => "invalid node count",
            Self::InvalidInput(_) => "invalid input",
        };
    }
}
