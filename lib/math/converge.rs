//! Provides the fixed-budget iterate-and-test loop shared by all root-finders.
//!
//! A root-finder is expressed as a [`Step`]: something that, given the index
//! of the current iteration, advances its internal state by one update and
//! reports an [`Iterate`] holding the per-iteration record, the estimate that
//! would be returned if the loop stopped here, and the residual compared
//! against the tolerance. [`converge`] drives any `Step` for at most
//! `maxiters` iterations and collects the records into a trace.

use tracing::debug;
#[cfg(feature = "config")]
use serde::{ Deserialize, Serialize };
use crate::error::{ RootError, RootResult };

/// Provides methods for determining when an iteration has converged.
pub trait Epsilon {
    fn lt_eps(&self, eps: f64) -> bool;
}

impl Epsilon for f64 {
    fn lt_eps(&self, eps: f64) -> bool { self.abs() < eps }
}

/// Options to control an iterative root-finder.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct IterOptions {
    /// Convergence condition (default 1e-6)
    pub epsilon: f64,

    /// Maximum number of steps to take (default 100)
    pub maxiters: usize,
}

impl Default for IterOptions {
    fn default() -> Self { Self { epsilon: 1e-6, maxiters: 100 } }
}

impl IterOptions {
    pub fn new(epsilon: f64, maxiters: usize) -> Self {
        Self { epsilon, maxiters }
    }
}

/// Output of a single update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Iterate<R> {
    /// Record appended to the trace.
    pub record: R,

    /// Value returned if `residual` satisfies the tolerance.
    pub estimate: f64,

    /// Quantity tested against the tolerance.
    pub residual: f64,
}

/// A single update rule.
///
/// Implementations carry whatever state the method needs between iterations
/// and must leave it ready for the next call to `step` after each update.
/// Fatal conditions discovered mid-iteration (e.g. a vanishing denominator)
/// are reported as errors and abort the loop.
pub trait Step {
    type Record;

    fn step(&mut self, k: usize) -> RootResult<Iterate<Self::Record>>;
}

impl<F, R> Step for F
where F: FnMut(usize) -> RootResult<Iterate<R>>
{
    type Record = R;

    fn step(&mut self, k: usize) -> RootResult<Iterate<R>> { self(k) }
}

/// Final estimate and the full, ordered trace of per-iteration records.
#[derive(Clone, Debug, PartialEq)]
pub struct Converged<R> {
    pub root: f64,
    pub trace: Vec<R>,
}

impl<R> Converged<R> {
    /// Number of iterations taken.
    pub fn iters(&self) -> usize { self.trace.len() }
}

/// Drive `stepper` until its residual drops below `opts.epsilon`, failing with
/// [`RootError::ConvergenceFailure`] if `opts.maxiters` updates are exhausted
/// first.
pub fn converge<S>(mut stepper: S, opts: &IterOptions)
    -> RootResult<Converged<S::Record>>
where S: Step
{
    let mut trace: Vec<S::Record> = Vec::with_capacity(opts.maxiters.min(256));
    let mut last: f64 = f64::NAN;
    for k in 0..opts.maxiters {
        let Iterate { record, estimate, residual } = stepper.step(k)?;
        tracing::trace!(k, estimate, residual, "step");
        trace.push(record);
        last = estimate;
        if residual.lt_eps(opts.epsilon) {
            debug!(iters = k + 1, root = estimate, "converged");
            return Ok(Converged { root: estimate, trace });
        }
    }
    debug!(maxiters = opts.maxiters, last, "iteration budget exhausted");
    return Err(RootError::ConvergenceFailure { maxiters: opts.maxiters, last });
}
