#![allow(unused_parens)]

//! Provides fixed-node composite quadrature (midpoint, trapezium, Simpson) for
//! definite integrals of the form
//! ```math
//! \int_a^b f(x) \,dx
//! ```
//! along with the Euler-Maclaurin endpoint correction to the trapezium rule.
//!
//! Rules come in two layers. The `midpoint`, `trapz`, and `simpson` functions
//! apply a weight pattern to values already sampled at even intervals and
//! stored in an array. The `composite_*` functions place the nodes on
//! $`[a, b]`$, sample an [`Integrand`] there, and hand the samples to the
//! first layer.
//!
//! Node-count conventions differ between rules and are fixed as follows:
//! - midpoint: `n` is the total number of nodes ($`n \geq 2`$), giving
//!   $`n - 1`$ midpoints;
//! - trapezium: `n` is the number of subintervals ($`n \geq 1`$);
//! - Simpson: `n` is the number of subintervals, which must be even and
//!   $`\geq 2`$.
//!
//! Node counts are checked before the integrand is evaluated.

use std::ops::{ Add, Mul };
use itertools::Itertools;
use num_traits::{ Float, identities::Zero };
use ndarray::{ self as nd, s };
use crate::error::{ QuadError, QuadResult };

/// Something that can be sampled at an array of points.
///
/// Implemented for every scalar closure `Fn(f64) -> f64`. Functions that
/// already operate element-wise on arrays can be wrapped in [`Vectorized`] to
/// be sampled in a single call.
pub trait Integrand {
    fn sample(&self, x: &nd::Array1<f64>) -> nd::Array1<f64>;
}

impl<F> Integrand for F
where F: Fn(f64) -> f64
{
    fn sample(&self, x: &nd::Array1<f64>) -> nd::Array1<f64> {
        return x.mapv(self);
    }
}

/// Wrapper marking a function as array-to-array.
#[derive(Clone, Copy, Debug)]
pub struct Vectorized<G>(pub G);

impl<G> Integrand for Vectorized<G>
where G: Fn(&nd::Array1<f64>) -> nd::Array1<f64>
{
    fn sample(&self, x: &nd::Array1<f64>) -> nd::Array1<f64> {
        return (self.0)(x);
    }
}

/// Apply the midpoint rule to a 1D array of values sampled at the midpoints of
/// consecutive subintervals of width `dx`.
pub fn midpoint<A, X>(y: &nd::Array1<A>, dx: &X) -> A
where
    A: Clone + Add<Output = A> + Mul<X, Output = A> + Zero,
    X: Float,
{
    return y.sum() * *dx;
}

/// Apply trapezoidal rule to a 1D array sampled at even intervals.
pub fn trapz<A, X>(y: &nd::Array1<A>, dx: &X) -> A
where
    A: Clone + Add<Output = A> + Mul<X, Output = A> + Zero,
    X: Float + Mul<f64, Output = X>,
{
    let n: usize = y.len();
    return (
        y[0].clone() * (*dx * 0.5)
        + y.slice(s![1..n - 1]).sum() * *dx
        + y[n - 1].clone() * (*dx * 0.5)
    );
}

/// Apply Simpson's rule to a 1D array sampled at even intervals.
///
/// The number of samples must be odd.
pub fn simpson<A, X>(y: &nd::Array1<A>, dx: &X) -> A
where
    A: Clone + Add<Output = A> + Mul<X, Output = A> + Zero,
    X: Float + Mul<f64, Output = X>,
{
    let n: usize = y.len();
    return (
        y[0].clone() * (*dx * (1.0 / 3.0))
        + y.slice(s![1..n - 1;2]).sum() * (*dx * (4.0 / 3.0))
        + y.slice(s![2..n - 1;2]).sum() * (*dx * (2.0 / 3.0))
        + y[n - 1].clone() * (*dx * (1.0 / 3.0))
    );
}

/// Return `m + 1` evenly spaced nodes on `[a, b]` (`m` subintervals) and the
/// spacing between them.
fn nodes(a: f64, b: f64, m: usize) -> (nd::Array1<f64>, f64) {
    let h: f64 = (b - a) / m as f64;
    let x: nd::Array1<f64>
        = (0..=m).map(|i| a + i as f64 * h).collect();
    return (x, h);
}

/// Integrate `f` over `[a, b]` using the composite midpoint rule on `n` total
/// nodes, i.e. `n - 1` subintervals of width `h = (b - a) / (n - 1)`, each
/// sampled once at its center.
pub fn composite_midpoint<F>(f: F, a: f64, b: f64, n: usize)
    -> QuadResult<f64>
where F: Integrand
{
    if n < 2 {
        return Err(QuadError::InvalidNodeCount {
            rule: "composite_midpoint",
            n,
            requirement: "need at least 2 nodes",
        });
    }
    let (x, h): (nd::Array1<f64>, f64) = nodes(a, b, n - 1);
    let mid: nd::Array1<f64>
        = x.iter().tuple_windows()
        .map(|(xkm1, xk)| (xkm1 + xk) / 2.0)
        .collect();
    return Ok(midpoint(&f.sample(&mid), &h));
}

/// Integrate `f` over `[a, b]` using the composite trapezium rule on `n`
/// subintervals (`n + 1` nodes) with weights `h/2 * [1, 2, ..., 2, 1]`.
pub fn composite_trapezium<F>(f: F, a: f64, b: f64, n: usize)
    -> QuadResult<f64>
where F: Integrand
{
    if n < 1 {
        return Err(QuadError::InvalidNodeCount {
            rule: "composite_trapezium",
            n,
            requirement: "need at least 1 subinterval",
        });
    }
    let (x, h): (nd::Array1<f64>, f64) = nodes(a, b, n);
    return Ok(trapz(&f.sample(&x), &h));
}

/// Integrate `f` over `[a, b]` using the composite Simpson rule on `n`
/// subintervals (`n + 1` nodes) with weights `h/3 * [1, 4, 2, 4, ..., 4, 1]`.
///
/// `n` must be even and at least 2.
pub fn composite_simpson<F>(f: F, a: f64, b: f64, n: usize)
    -> QuadResult<f64>
where F: Integrand
{
    if n < 2 || n % 2 != 0 {
        return Err(QuadError::InvalidNodeCount {
            rule: "composite_simpson",
            n,
            requirement: "subinterval count must be even and at least 2",
        });
    }
    let (x, h): (nd::Array1<f64>, f64) = nodes(a, b, n);
    return Ok(simpson(&f.sample(&x), &h));
}

/// Leading-order Euler-Maclaurin error of the trapezium rule with step `h`,
/// ```math
/// \frac{h^2}{12} \big( f'(b) - f'(a) \big),
/// ```
/// given the derivative `df` of the integrand.
///
/// The trapezium estimate exceeds the true integral by approximately this
/// amount.
pub fn trapz_error_estimate<DF>(df: DF, a: f64, b: f64, h: f64) -> f64
where DF: Fn(f64) -> f64
{
    return h.powi(2) / 12.0 * (df(b) - df(a));
}

/// Trapezium estimate together with its Euler-Maclaurin endpoint correction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EndpointCorrected {
    /// Subinterval width
    pub h: f64,

    /// Plain composite trapezium estimate
    pub trapz: f64,

    /// Leading-order error estimate (see [`trapz_error_estimate`])
    pub error_estimate: f64,

    /// `trapz - error_estimate`
    pub corrected: f64,
}

/// Integrate `f` over `[a, b]` with the composite trapezium rule on `n`
/// subintervals and apply the Euler-Maclaurin endpoint correction using the
/// derivative `df`.
pub fn trapz_endpoint_corrected<F, DF>(f: F, df: DF, a: f64, b: f64, n: usize)
    -> QuadResult<EndpointCorrected>
where
    F: Integrand,
    DF: Fn(f64) -> f64,
{
    let trapz: f64 = composite_trapezium(f, a, b, n)?;
    let h: f64 = (b - a) / n as f64;
    let error_estimate: f64 = trapz_error_estimate(df, a, b, h);
    return Ok(EndpointCorrected {
        h,
        trapz,
        error_estimate,
        corrected: trapz - error_estimate,
    });
}
