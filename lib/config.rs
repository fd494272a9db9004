//! Provides loading and verification of solver options from TOML documents.
//!
//! A document may contain any of the following tables; missing tables and
//! keys take their default values.
//! ```toml
//! [root]          # IterOptions for every root-finder
//! epsilon = 1e-8
//! maxiters = 50
//!
//! [fixed_point]   # FixedPointOptions
//! epsilon = 1e-8
//! maxiters = 200
//! deriv_eps = 1e-6
//!
//! [quadrature]   # QuadOptions, caller-side defaults
//! nodes = 100
//! romberg_rows = 6
//! ```

use std::{
    fs,
    path::Path,
    str::FromStr,
};
use serde::{ Deserialize, Serialize };
use thiserror::Error;
use crate::math::{
    converge::IterOptions,
    romberg::ROMBERG_MAX_ROWS,
    search::FixedPointOptions,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config: invalid value for key '{0}': expected value to satisfy '{1}' but got {2}")]
    InvalidValue(String, String, String),

    #[error("config: couldn't read file '{0}': {1}")]
    FileRead(String, String),

    #[error("config: couldn't parse document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config: TOML error '{0}'")]
    TomlError(#[from] toml::ser::Error),
}
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Node and row counts for the quadrature rules.
///
/// The quadrature routines take their counts as plain arguments and never read
/// this table; these are defaults for callers to pass along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadOptions {
    /// Subinterval count for `composite_trapezium` and `composite_simpson`
    /// (default 100). `composite_midpoint` counts nodes rather than
    /// subintervals and takes `nodes + 1`. Simpson additionally requires this
    /// to be even, which is checked at the call.
    pub nodes: usize,

    /// Row count for `romberg` and `romberg_estimate` (default 6)
    pub romberg_rows: usize,
}

impl Default for QuadOptions {
    fn default() -> Self { Self { nodes: 100, romberg_rows: 6 } }
}

/// Verified collection of options for every routine in the crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumConfig {
    pub root: IterOptions,
    pub fixed_point: FixedPointOptions,
    pub quadrature: QuadOptions,
}

fn invalid<T>(key: &str, expected: &str, got: T) -> ConfigError
where T: std::fmt::Display
{
    return ConfigError::InvalidValue(
        key.to_string(), expected.to_string(), got.to_string());
}

fn verify_iter(table: &str, opts: &IterOptions) -> ConfigResult<()> {
    if !(opts.epsilon > 0.0 && opts.epsilon.is_finite()) {
        return Err(invalid(
            &format!("{}.epsilon", table), "finite and > 0", opts.epsilon));
    }
    if opts.maxiters == 0 {
        return Err(invalid(
            &format!("{}.maxiters", table), ">= 1", opts.maxiters));
    }
    return Ok(());
}

impl NumConfig {
    /// Check every value against its admissible range.
    pub fn verify(&self) -> ConfigResult<()> {
        verify_iter("root", &self.root)?;
        verify_iter("fixed_point", &self.fixed_point.iter)?;
        let deriv_eps: f64 = self.fixed_point.deriv_eps;
        if !(deriv_eps > 0.0 && deriv_eps.is_finite()) {
            return Err(invalid(
                "fixed_point.deriv_eps", "finite and > 0", deriv_eps));
        }
        if self.quadrature.nodes == 0 {
            return Err(invalid(
                "quadrature.nodes", ">= 1", self.quadrature.nodes));
        }
        let rows: usize = self.quadrature.romberg_rows;
        if rows == 0 || rows > ROMBERG_MAX_ROWS {
            return Err(invalid(
                "quadrature.romberg_rows",
                &format!("in 1..={}", ROMBERG_MAX_ROWS),
                rows,
            ));
        }
        return Ok(());
    }

    /// Parse and verify a TOML document.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.verify()?;
        return Ok(config);
    }

    /// Read, parse, and verify a TOML file.
    pub fn from_file<P>(infile: P) -> ConfigResult<Self>
    where P: AsRef<Path>
    {
        let infile: &Path = infile.as_ref();
        let s: String
            = fs::read_to_string(infile)
            .map_err(|e| {
                ConfigError::FileRead(
                    infile.display().to_string(), e.to_string())
            })?;
        return Self::from_toml_str(&s);
    }

    /// Render as a TOML document.
    pub fn as_toml_string(&self) -> ConfigResult<String> {
        return Ok(toml::to_string(self)?);
    }
}

impl FromStr for NumConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> { Self::from_toml_str(s) }
}
