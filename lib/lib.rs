#![allow(non_snake_case)]
#![allow(clippy::needless_return)]

//! This crate is a small collection of iterative root-finders and fixed-node
//! quadrature rules for functions of a single real variable.
//!
//! Every routine is a stateless, synchronous procedure operating on a
//! caller-supplied function. Root-finders return the final estimate together
//! with the full trace of per-iteration records; Romberg integration returns
//! its extrapolation table alongside the estimate. Failures are reported as
//! [`RootError`][error::RootError] or [`QuadError`][error::QuadError] values,
//! never as non-converged estimates.
//!
//! ```
//! use numeth::math::{ converge::IterOptions, search::newton };
//!
//! let res = newton(|x| x * x - 2.0, |x| 2.0 * x, 1.0, &IterOptions::default())
//!     .unwrap();
//! assert!((res.root - 2.0_f64.sqrt()).abs() < 1e-6);
//! ```

pub mod error;
pub mod math;

#[cfg(feature = "config")]
pub mod config;
