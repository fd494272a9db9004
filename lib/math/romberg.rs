//! Provides Romberg integration: repeated Richardson extrapolation of
//! successively halved trapezium estimates.
//!
//! For `n` rows, the table $`R`$ is built row by row. Row $`j`$ starts with the
//! composite trapezium estimate on $`2^j`$ subintervals, computed
//! incrementally from row $`j - 1`$ by sampling only the $`2^{j - 1}`$ newly
//! introduced odd-indexed nodes:
//! ```math
//! R_{j,0} = \frac{1}{2} R_{j-1,0} + h_j \sum_{k=1}^{2^{j-1}} f\big(a + (2k - 1) h_j\big)
//! ```
//! with $`h_j = (b - a) / 2^j`$. Each further column eliminates the next
//! even-order error term,
//! ```math
//! R_{j,k} = \frac{4^k R_{j,k-1} - R_{j-1,k-1}}{4^k - 1},
//! ```
//! and the corner $`R_{n-1,n-1}`$ is the final estimate. In total the integrand
//! is evaluated $`2^{n-1} + 1`$ times.

use ndarray as nd;
use tracing::debug;
use crate::{
    error::{ QuadError, QuadResult },
    math::integrate::Integrand,
};

/// Largest number of rows accepted, which bounds the number of integrand
/// evaluations at `2^29 + 1`.
pub const ROMBERG_MAX_ROWS: usize = 30;

/// Lower-triangular table of Romberg estimates.
///
/// Entry `(j, k)` is defined for `j >= k`; entries above the diagonal are kept
/// at zero and are not exposed through [`get`][Self::get].
#[derive(Clone, Debug, PartialEq)]
pub struct RombergTable {
    data: nd::Array2<f64>,
}

impl RombergTable {
    fn zeros(n: usize) -> Self { Self { data: nd::Array2::zeros((n, n)) } }

    /// Number of rows (equal to the number of columns).
    pub fn rows(&self) -> usize { self.data.nrows() }

    /// Return entry `(j, k)` if `k <= j < rows`.
    pub fn get(&self, j: usize, k: usize) -> Option<f64> {
        return (k <= j && j < self.rows()).then(|| self.data[[j, k]]);
    }

    /// Return the populated part of row `j`, i.e. columns `0..=j`, if
    /// `j < rows`.
    pub fn row(&self, j: usize) -> Option<nd::ArrayView1<f64>> {
        return (j < self.rows()).then(|| self.data.slice(nd::s![j, ..=j]));
    }

    /// Return the trapezium column, `R[j, 0]` for all `j`.
    pub fn trapz_column(&self) -> nd::ArrayView1<f64> {
        return self.data.column(0);
    }

    /// Return the corner entry `R[n - 1, n - 1]`.
    pub fn estimate(&self) -> f64 {
        let n: usize = self.rows();
        return self.data[[n - 1, n - 1]];
    }

    /// Borrow the full square array, zeros above the diagonal included.
    pub fn as_array(&self) -> &nd::Array2<f64> { &self.data }

    pub fn into_array(self) -> nd::Array2<f64> { self.data }
}

/// Final Romberg estimate along with the table it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct Romberg {
    pub integral: f64,
    pub table: RombergTable,
}

fn check_rows(n: usize) -> QuadResult<()> {
    if n == 0 || n > ROMBERG_MAX_ROWS {
        return Err(QuadError::InvalidInput(format!(
            "romberg: number of rows must be in 1..={}, got {}",
            ROMBERG_MAX_ROWS, n,
        )));
    }
    return Ok(());
}

/// Sum of `f` over the `2^(j - 1)` new nodes `a + (2k - 1) h`, `k = 1, 2, ...`
fn refinement_sum<F>(f: &F, a: f64, h: f64, j: usize) -> f64
where F: Integrand
{
    let x: nd::Array1<f64>
        = (1..=1_usize << (j - 1))
        .map(|k| a + (2 * k - 1) as f64 * h)
        .collect();
    return f.sample(&x).sum();
}

/// Richardson combination for column `k`.
fn richardson(fine: f64, coarse: f64, k: usize) -> f64 {
    let p: f64 = 4.0_f64.powi(k as i32);
    return (p * fine - coarse) / (p - 1.0);
}

/// Integrate `f` over `[a, b]` with `n` rows of Romberg extrapolation,
/// returning the corner estimate and the full table.
///
/// `n` must be in `1..=ROMBERG_MAX_ROWS`.
pub fn romberg<F>(f: F, a: f64, b: f64, n: usize) -> QuadResult<Romberg>
where F: Integrand
{
    check_rows(n)?;
    let mut R = RombergTable::zeros(n);
    let mut h: f64 = b - a;
    let ends: nd::Array1<f64> = f.sample(&nd::array![a, b]);
    R.data[[0, 0]] = h / 2.0 * (ends[0] + ends[1]);
    for j in 1..n {
        h /= 2.0;
        R.data[[j, 0]]
            = 0.5 * R.data[[j - 1, 0]] + h * refinement_sum(&f, a, h, j);
        for k in 1..=j {
            R.data[[j, k]]
                = richardson(R.data[[j, k - 1]], R.data[[j - 1, k - 1]], k);
        }
    }
    let integral: f64 = R.estimate();
    debug!(rows = n, integral, "romberg table complete");
    return Ok(Romberg { integral, table: R });
}

/// Like [`romberg`], but return only the corner estimate, keeping just the
/// current and previous rows in memory.
pub fn romberg_estimate<F>(f: F, a: f64, b: f64, n: usize) -> QuadResult<f64>
where F: Integrand
{
    check_rows(n)?;
    let mut prev: Vec<f64> = vec![0.0; n];
    let mut cur: Vec<f64> = vec![0.0; n];
    let mut h: f64 = b - a;
    let ends: nd::Array1<f64> = f.sample(&nd::array![a, b]);
    prev[0] = h / 2.0 * (ends[0] + ends[1]);
    for j in 1..n {
        h /= 2.0;
        cur[0] = 0.5 * prev[0] + h * refinement_sum(&f, a, h, j);
        for k in 1..=j {
            cur[k] = richardson(cur[k - 1], prev[k - 1], k);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    return Ok(prev[n - 1]);
}
