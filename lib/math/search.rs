//! Provides implementations of bracketing (bisection, regula falsi) and open
//! (secant, Newton-Raphson, fixed-point) root-finding for 1D -> 1D functions.
//!
//! Every method returns the final estimate together with the full trace of
//! per-iteration records. All of them are driven by
//! [`converge`][crate::math::converge::converge], so they share the same
//! termination semantics: stop as soon as the method's residual is smaller than
//! `epsilon`, otherwise fail with
//! [`ConvergenceFailure`][RootError::ConvergenceFailure] once `maxiters` updates
//! have been spent.

use itertools::Itertools;
#[cfg(feature = "config")]
use serde::{ Deserialize, Serialize };
use tracing::debug;
use crate::{
    error::{ RootError, RootResult },
    math::converge::{ converge, Converged, IterOptions, Iterate },
};

/// One step of [`bisection`] or [`regula_falsi`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BracketRecord {
    /// Iteration index
    pub k: usize,

    /// Left end of the bracket before the update
    pub a: f64,

    /// Right end of the bracket before the update
    pub b: f64,

    /// Trial point
    pub c: f64,

    /// `f(c)`
    pub fc: f64,

    /// Bound on the distance to the root: `(b - a) / 2` for bisection,
    /// `|b - a|` for regula falsi.
    pub err: f64,
}

/// One step of [`secant`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecantRecord {
    pub k: usize,
    pub x: f64,
    pub fx: f64,
    pub dx: f64,
}

/// One step of [`newton`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonRecord {
    pub k: usize,
    pub x: f64,
    pub fx: f64,
    pub dfx: f64,
    pub dx: f64,
}

/// One step of [`fixed_point`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedPointRecord {
    pub k: usize,
    pub x: f64,
    pub x_new: f64,

    /// `|x_new - x|`
    pub err: f64,
}

/// Check the opening bracket shared by bisection and regula falsi.
fn check_bracket(a: f64, b: f64, fa: f64, fb: f64) -> RootResult<()> {
    if !(a < b) || fa * fb > 0.0 || fa.is_nan() || fb.is_nan() {
        debug!(a, b, fa, fb, "rejected bracket");
        return Err(RootError::InvalidBracket { a, b, fa, fb });
    }
    return Ok(());
}

/// Generic bracketing loop: pick a trial point from the current bracket, then
/// keep whichever half still straddles a sign change.
fn bracketed<F, P>(
    f: F,
    bracket: (f64, f64),
    pick: P,
    half_width: bool,
    opts: &IterOptions,
) -> RootResult<Converged<BracketRecord>>
where
    F: Fn(f64) -> f64,
    P: Fn(f64, f64, f64, f64) -> f64,
{
    let (mut a, mut b): (f64, f64) = bracket;
    let (mut fa, mut fb): (f64, f64) = (f(a), f(b));
    check_bracket(a, b, fa, fb)?;
    let update = |k: usize| -> RootResult<Iterate<BracketRecord>> {
        let c: f64 = pick(a, b, fa, fb);
        let fc: f64 = f(c);
        let err: f64 = if half_width { (b - a) / 2.0 } else { (b - a).abs() };
        let record = BracketRecord { k, a, b, c, fc, err };
        // a zero at `a` keeps `a`
        if fa * fc <= 0.0 {
            b = c;
            fb = fc;
        } else {
            a = c;
            fa = fc;
        }
        Ok(Iterate { record, estimate: c, residual: fc })
    };
    return converge(update, opts);
}

/// Find a root of `f` in the bracket `[a, b]` by repeated halving.
///
/// Requires `a < b` and `f(a) * f(b) <= 0`; otherwise fails with
/// [`InvalidBracket`][RootError::InvalidBracket] before any iteration. Each
/// step records the midpoint `c` and the current half-width, which shrinks by
/// exactly a factor of 2 per iteration. Stops when `|f(c)| < epsilon`.
pub fn bisection<F>(f: F, bracket: (f64, f64), opts: &IterOptions)
    -> RootResult<Converged<BracketRecord>>
where F: Fn(f64) -> f64
{
    return bracketed(f, bracket, |a, b, _, _| (a + b) / 2.0, true, opts);
}

/// Find a root of `f` in the bracket `[a, b]` by the method of false position.
///
/// Identical to [`bisection`] except that the trial point is the zero of the
/// secant line through `(a, f(a))` and `(b, f(b))`. On strongly curved
/// functions one end of the bracket may stay fixed for many iterations; this is
/// not corrected for.
///
/// If both ends of the bracket are exact zeros the secant line is flat, and the
/// trial point is taken to be `a`.
pub fn regula_falsi<F>(f: F, bracket: (f64, f64), opts: &IterOptions)
    -> RootResult<Converged<BracketRecord>>
where F: Fn(f64) -> f64
{
    let false_position = |a: f64, b: f64, fa: f64, fb: f64| -> f64 {
        // fa * fb <= 0 always holds here, so equal values are both zero
        if fb == fa { return a; }
        return (fb * a - fa * b) / (fb - fa);
    };
    return bracketed(f, bracket, false_position, false, opts);
}

/// Find a root of `f` using the secant method, starting from two estimates.
///
/// No bracket is required. Each step computes
/// `dx = (x1 - x0) / (f(x1) - f(x0)) * f(x1)` and stops when `|dx| < epsilon`,
/// returning `x1`; otherwise `x0 <- x1`, `x1 <- x1 - dx`. A vanishing
/// `f(x1) - f(x0)` fails with [`ZeroSlope`][RootError::ZeroSlope].
///
/// `f` is evaluated once per iteration plus once for `x0`; the value at a new
/// `x1` is computed only when the following step needs it.
pub fn secant<F>(f: F, x0: f64, x1: f64, opts: &IterOptions)
    -> RootResult<Converged<SecantRecord>>
where F: Fn(f64) -> f64
{
    let (mut x0, mut x1): (f64, f64) = (x0, x1);
    let mut fx0: f64 = f(x0);
    let mut fx1_cached: Option<f64> = None;
    let update = |k: usize| -> RootResult<Iterate<SecantRecord>> {
        let fx1: f64 = *fx1_cached.get_or_insert_with(|| f(x1));
        let slope: f64 = fx1 - fx0;
        if slope == 0.0 {
            debug!(x0, x1, "secant slope vanished");
            return Err(RootError::ZeroSlope { x0, x1 });
        }
        let dx: f64 = (x1 - x0) / slope * fx1;
        let record = SecantRecord { k, x: x1, fx: fx1, dx };
        let estimate: f64 = x1;
        x0 = x1;
        fx0 = fx1;
        x1 -= dx;
        fx1_cached = None;
        Ok(Iterate { record, estimate, residual: dx })
    };
    return converge(update, opts);
}

/// Find a root of `f` using Newton-Raphson, provided the function and its first
/// derivative.
///
/// Each step computes `dx = f(x) / f'(x)`, records it, and updates
/// `x <- x - dx`. When `|dx| < epsilon` the updated value is returned. A
/// derivative that evaluates to exactly zero fails with
/// [`ZeroDerivative`][RootError::ZeroDerivative].
pub fn newton<F, DF>(f: F, df: DF, x0: f64, opts: &IterOptions)
    -> RootResult<Converged<NewtonRecord>>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x: f64 = x0;
    let update = |k: usize| -> RootResult<Iterate<NewtonRecord>> {
        let fx: f64 = f(x);
        let dfx: f64 = df(x);
        if dfx == 0.0 {
            debug!(x, "derivative vanished");
            return Err(RootError::ZeroDerivative { x });
        }
        let dx: f64 = fx / dfx;
        let record = NewtonRecord { k, x, fx, dfx, dx };
        x -= dx;
        Ok(Iterate { record, estimate: x, residual: dx })
    };
    return converge(update, opts);
}

/// Options to control fixed-point iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FixedPointOptions {
    /// Tolerance and iteration budget
    #[cfg_attr(feature = "config", serde(flatten))]
    pub iter: IterOptions,

    /// Central-difference step used by the local convergence check is
    /// `sqrt(deriv_eps)` (default 1e-6)
    pub deriv_eps: f64,
}

impl Default for FixedPointOptions {
    fn default() -> Self {
        Self { iter: IterOptions::default(), deriv_eps: 1e-6 }
    }
}

/// Estimate `g'(p)` by a central difference with step `sqrt(eps)`.
fn central_diff<G>(g: &G, p: f64, eps: f64) -> f64
where G: Fn(f64) -> f64
{
    let h: f64 = eps.sqrt();
    return (g(p + h) - g(p - h)) / (2.0 * h);
}

/// Return `true` if the iteration map `g` is locally contracting at `p`, i.e.
/// `|g'(p)| < 1` with the derivative estimated by a central difference with
/// step `sqrt(eps)`.
///
/// This is a heuristic at a single point and says nothing about global
/// convergence.
pub fn is_convergent<G>(g: G, p: f64, eps: f64) -> bool
where G: Fn(f64) -> f64
{
    return central_diff(&g, p, eps).abs() < 1.0;
}

/// Find a fixed point `x = g(x)` by iterating `g` from `x0`.
///
/// Fails with [`NotConvergent`][RootError::NotConvergent] without iterating if
/// `g` is not locally contracting at `x0` (see [`is_convergent`]). Each step
/// computes `x_new = g(x)` and stops when `|x_new - x| < epsilon`, returning
/// `x_new`.
pub fn fixed_point<G>(g: G, x0: f64, opts: &FixedPointOptions)
    -> RootResult<Converged<FixedPointRecord>>
where G: Fn(f64) -> f64
{
    let dg: f64 = central_diff(&g, x0, opts.deriv_eps);
    if !(dg.abs() < 1.0) {
        debug!(x0, dg, "iteration map is not contracting");
        return Err(RootError::NotConvergent { x0, dg });
    }
    let mut x: f64 = x0;
    let update = |k: usize| -> RootResult<Iterate<FixedPointRecord>> {
        let x_new: f64 = g(x);
        let err: f64 = (x_new - x).abs();
        let record = FixedPointRecord { k, x, x_new, err };
        x = x_new;
        Ok(Iterate { record, estimate: x_new, residual: err })
    };
    return converge(update, &opts.iter);
}

/// Return the raw orbit `x0, g(x0), g(g(x0)), ...` of length `steps + 1`,
/// without any convergence test.
///
/// This is the sequence traced out by a cobweb diagram of `g`.
pub fn fixed_point_orbit<G>(g: G, x0: f64, steps: usize) -> Vec<f64>
where G: Fn(f64) -> f64
{
    return itertools::iterate(x0, |x| g(*x)).take(steps + 1).collect();
}

/// Return the successive `(x_k, x_{k+1})` pairs of a fixed-point orbit.
pub fn orbit_steps(orbit: &[f64]) -> Vec<(f64, f64)> {
    return orbit.iter().copied().tuple_windows().collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use approx::assert_abs_diff_eq;

    fn sqrt2(x: f64) -> f64 { x * x - 2.0 }

    #[test]
    fn bisection_halves_the_bracket() {
        let res = bisection(sqrt2, (0.0, 2.0), &IterOptions::default())
            .unwrap();
        let w0: f64 = res.trace[0].err;
        assert_eq!(w0, 1.0);
        for (k, rec) in res.trace.iter().enumerate() {
            assert_eq!(rec.k, k);
            assert_eq!(rec.err, w0 / 2.0_f64.powi(k as i32));
            assert!(sqrt2(rec.a) * sqrt2(rec.b) <= 0.0);
        }
        assert!(sqrt2(res.root).abs() < 1e-6);
        assert_abs_diff_eq!(res.root, 2.0_f64.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn bisection_sin_linear() {
        let f = |x: f64| 6.0 * x + 5.0 - x.sin();
        assert!(f(-1.0) < 0.0 && f(0.0) > 0.0);
        let res = bisection(f, (-1.0, 0.0), &IterOptions::default()).unwrap();
        assert!(f(res.root).abs() < 1e-6);
        assert_abs_diff_eq!(res.root, -0.97, epsilon = 0.01);
        assert!(res.iters() < 100);
    }

    #[test]
    fn bisection_rejects_bad_brackets() {
        let evals = Cell::new(0_usize);
        let f = |x: f64| { evals.set(evals.get() + 1); x * x + 1.0 };
        let err = bisection(f, (-1.0, 1.0), &IterOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            RootError::InvalidBracket { a: -1.0, b: 1.0, fa: 2.0, fb: 2.0 },
        );
        assert_eq!(evals.get(), 2);

        assert!(matches!(
            bisection(sqrt2, (2.0, 0.0), &IterOptions::default()),
            Err(RootError::InvalidBracket { .. }),
        ));
    }

    #[test]
    fn bisection_endpoint_root() {
        // f(a) == 0 is an admissible bracket
        let res = bisection(|x| x, (0.0, 1.0), &IterOptions::default())
            .unwrap();
        assert!(res.root.abs() < 1e-6);
    }

    #[test]
    fn regula_falsi_kepler() {
        let f = |t: f64| 8.0 - 4.5 * (t - t.sin());
        let res = regula_falsi(f, (2.0, 3.0), &IterOptions::default())
            .unwrap();
        assert!(f(res.root).abs() < 1e-6);
        assert!(res.root > 2.0 && res.root < 3.0);
        assert_eq!(res.trace[0].err, 1.0);
    }

    #[test]
    fn regula_falsi_stagnates_one_end() {
        // convex on the bracket, so the right end never moves
        let res = regula_falsi(sqrt2, (1.0, 2.0), &IterOptions::default())
            .unwrap();
        assert!(res.trace.iter().all(|rec| rec.b == 2.0));
        assert_abs_diff_eq!(res.root, 2.0_f64.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn regula_falsi_budget() {
        let err = regula_falsi(sqrt2, (1.0, 2.0), &IterOptions::new(1e-15, 3))
            .unwrap_err();
        assert!(matches!(
            err,
            RootError::ConvergenceFailure { maxiters: 3, .. },
        ));
    }

    #[test]
    fn regula_falsi_endpoint_roots() {
        // both ends are zeros, so the secant line through them is flat
        let f = |x: f64| x * (x - 1.0);
        let res = regula_falsi(f, (0.0, 1.0), &IterOptions::default())
            .unwrap();
        assert_eq!(res.root, 0.0);
        assert_eq!(res.iters(), 1);
        assert_eq!(
            res.trace[0],
            BracketRecord { k: 0, a: 0.0, b: 1.0, c: 0.0, fc: 0.0, err: 1.0 },
        );

        let res = regula_falsi(f, (0.0, 0.5), &IterOptions::default())
            .unwrap();
        assert!(res.root.is_finite());
        assert!(res.root.abs() < 1e-6);
    }

    #[test]
    fn secant_sqrt2() {
        let res = secant(sqrt2, 1.0, 2.0, &IterOptions::default()).unwrap();
        assert_abs_diff_eq!(res.root, 2.0_f64.sqrt(), epsilon = 1e-6);
        let last = res.trace.last().unwrap();
        assert!(last.dx.abs() < 1e-6);
        assert_eq!(last.x, res.root);
    }

    #[test]
    fn secant_zero_slope() {
        let err = secant(|x| x * x, -1.0, 1.0, &IterOptions::default())
            .unwrap_err();
        assert_eq!(err, RootError::ZeroSlope { x0: -1.0, x1: 1.0 });
    }

    #[test]
    fn secant_evaluates_once_per_step() {
        let evals = Cell::new(0_usize);
        let f = |x: f64| { evals.set(evals.get() + 1); x * x - 2.0 };
        let res = secant(f, 1.0, 2.0, &IterOptions::default()).unwrap();
        // f(x0) up front, then f(x1) at the start of each step
        assert_eq!(evals.get(), res.iters() + 1);

        evals.set(0);
        secant(f, 1.0, 2.0, &IterOptions::new(1e-6, 0)).unwrap_err();
        assert_eq!(evals.get(), 1);
    }

    #[test]
    fn newton_sqrt2() {
        let res = newton(sqrt2, |x| 2.0 * x, 1.0, &IterOptions::default())
            .unwrap();
        assert_abs_diff_eq!(res.root, 1.414_213_56, epsilon = 1e-6);
        assert!(res.iters() < 10);
        let first = res.trace[0];
        assert_eq!(
            first,
            NewtonRecord { k: 0, x: 1.0, fx: -1.0, dfx: 2.0, dx: -0.5 },
        );
        assert_eq!(res.trace[1].x, 1.5);
    }

    #[test]
    fn newton_cubic() {
        let f = |x: f64| (x - 1.0) * (x * x + 3.0);
        let df = |x: f64| 3.0 * x * x - 2.0 * x + 3.0;
        let res = newton(f, df, 2.0, &IterOptions::default()).unwrap();
        assert_abs_diff_eq!(res.root, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn newton_zero_derivative() {
        let err = newton(sqrt2, |x| 2.0 * x, 0.0, &IterOptions::default())
            .unwrap_err();
        assert_eq!(err, RootError::ZeroDerivative { x: 0.0 });
    }

    #[test]
    fn newton_budget() {
        // no real root; iterates wander forever
        let err = newton(|x| x * x + 1.0, |x| 2.0 * x, 0.5,
            &IterOptions::new(1e-6, 20))
            .unwrap_err();
        assert!(matches!(
            err,
            RootError::ConvergenceFailure { maxiters: 20, .. },
        ));
    }

    #[test]
    fn fixed_point_rational_map() {
        let g = |x: f64| (3.0 * x + 1.0) / (2.0 * x + 1.0);
        let res = fixed_point(g, 0.5, &FixedPointOptions::default()).unwrap();
        assert_abs_diff_eq!(res.root, (1.0 + 3.0_f64.sqrt()) / 2.0,
            epsilon = 1e-6);
        for (rec, next) in res.trace.iter().tuple_windows() {
            assert_eq!(rec.x_new, next.x);
        }
        assert!(res.trace.last().unwrap().err < 1e-6);
    }

    #[test]
    fn fixed_point_not_convergent() {
        let evals = Cell::new(0_usize);
        let g = |x: f64| { evals.set(evals.get() + 1); x * x };
        let err = fixed_point(g, 2.0, &FixedPointOptions::default())
            .unwrap_err();
        match err {
            RootError::NotConvergent { x0, dg } => {
                assert_eq!(x0, 2.0);
                assert_abs_diff_eq!(dg, 4.0, epsilon = 1e-6);
            },
            other => panic!("unexpected error {:?}", other),
        }
        // only the two central-difference samples
        assert_eq!(evals.get(), 2);
    }

    #[test]
    fn fixed_point_budget() {
        // contracting at x0 but far too slow for the budget
        let g = |x: f64| 0.999 * x;
        let opts = FixedPointOptions {
            iter: IterOptions::new(1e-12, 10),
            ..FixedPointOptions::default()
        };
        assert!(matches!(
            fixed_point(g, 1.0, &opts),
            Err(RootError::ConvergenceFailure { maxiters: 10, .. }),
        ));
    }

    #[test]
    fn convergence_check() {
        assert!(is_convergent(f64::cos, 1.0, 1e-6));
        assert!(!is_convergent(|x: f64| 3.0 * x, 0.0, 1e-6));
    }

    #[test]
    fn cos_orbit() {
        let orbit = fixed_point_orbit(f64::cos, 2.0, 50);
        assert_eq!(orbit.len(), 51);
        assert_eq!(orbit[0], 2.0);
        assert_eq!(orbit[1], 2.0_f64.cos());
        assert_abs_diff_eq!(orbit[50], 0.739_085_133, epsilon = 1e-4);
        let steps = orbit_steps(&orbit);
        assert_eq!(steps.len(), 50);
        assert_eq!(steps[0], (orbit[0], orbit[1]));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let f = |x: f64| x.powi(3) - 2.0 * x - 2.0;
        let opts = IterOptions::default();
        assert_eq!(
            secant(f, 1.0, 2.0, &opts).unwrap(),
            secant(f, 1.0, 2.0, &opts).unwrap(),
        );
        assert_eq!(
            bisection(f, (1.0, 2.0), &opts).unwrap(),
            bisection(f, (1.0, 2.0), &opts).unwrap(),
        );
        assert_eq!(
            regula_falsi(f, (1.0, 2.0), &opts).unwrap(),
            regula_falsi(f, (1.0, 2.0), &opts).unwrap(),
        );
        let df = |x: f64| 3.0 * x * x - 2.0;
        assert_eq!(
            newton(f, df, 2.0, &opts).unwrap(),
            newton(f, df, 2.0, &opts).unwrap(),
        );
        let fp_opts = FixedPointOptions::default();
        assert_eq!(
            fixed_point(f64::cos, 1.0, &fp_opts).unwrap(),
            fixed_point(f64::cos, 1.0, &fp_opts).unwrap(),
        );
        // failures repeat too
        assert_eq!(
            newton(f, df, 2.0, &IterOptions::new(1e-300, 2)).unwrap_err(),
            newton(f, df, 2.0, &IterOptions::new(1e-300, 2)).unwrap_err(),
        );
    }
}
