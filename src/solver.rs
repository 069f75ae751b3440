//! Bracketed root finding.
//!
//! Every power function in this crate is monotonic in the quantity being
//! solved for, so a sign change between two bracket ends pins down exactly
//! one root. The search is plain bisection: slower than Brent's method but
//! it never leaves the bracket, which matters near open domain edges where
//! the power functions blow up.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Tolerances and iteration budget of the root search.
///
/// The search stops once the bracket half-width drops below
/// `xtol + rtol * |x|`.
///
/// ```
/// use statpower::solver::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.max_iterations, 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Absolute tolerance.
    pub xtol: f64,
    /// Relative tolerance.
    pub rtol: f64,
    /// Iteration budget before giving up.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            xtol: 2e-12,
            rtol: 4.0 * f64::EPSILON,
            max_iterations: 500,
        }
    }
}

impl SolverConfig {
    /// Set the absolute tolerance.
    #[must_use]
    pub fn xtol(mut self, xtol: f64) -> Self {
        self.xtol = xtol;
        self
    }

    /// Set the relative tolerance.
    #[must_use]
    pub fn rtol(mut self, rtol: f64) -> Self {
        self.rtol = rtol;
        self
    }

    /// Set the iteration budget.
    #[must_use]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Find `x` in `[lower, upper]` with `f(x) = 0`.
///
/// `target` names the quantity being solved for in errors and logs.
///
/// # Errors
///
/// Returns [`Error::SolutionNotFound`] if `f` is NaN at either end, if the
/// ends do not bracket a sign change, or if the budget runs out.
///
/// # Example
///
/// ```
/// use statpower::solver::{find_root, SolverConfig};
///
/// let root = find_root("x", |x| x * x - 2.0, 0.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((root - 2f64.sqrt()).abs() < 1e-11);
///
/// assert!(find_root("x", |x| x * x + 1.0, -1.0, 1.0, &SolverConfig::default()).is_err());
/// ```
pub fn find_root<F>(
    target: &'static str,
    mut f: F,
    lower: f64,
    upper: f64,
    config: &SolverConfig,
) -> Result<f64>
where
    F: FnMut(f64) -> f64,
{
    let (mut a, mut b) = (lower, upper);
    let mut fa = f(a);
    let fb = f(b);

    if fa.is_nan() || fb.is_nan() {
        debug!(quantity = target, lower, upper, "objective undefined at bracket end");
        return Err(Error::solution_not_found(
            target,
            format!("objective is undefined at the search limits [{lower}, {upper}]"),
        ));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa.signum() == fb.signum() {
        debug!(quantity = target, lower, upper, fa, fb, "no sign change in bracket");
        return Err(Error::solution_not_found(
            target,
            format!("no sign change within [{lower}, {upper}]"),
        ));
    }

    for iteration in 1..=config.max_iterations {
        let half = (b - a) / 2.0;
        let mid = a + half;
        let fm = f(mid);
        trace!(quantity = target, iteration, mid, fm, "bisection step");

        if fm.is_nan() {
            debug!(quantity = target, mid, "objective undefined inside bracket");
            return Err(Error::solution_not_found(
                target,
                format!("objective is undefined at {mid}"),
            ));
        }
        if fm == 0.0 || half.abs() < config.xtol + config.rtol * mid.abs() {
            debug!(quantity = target, iteration, root = mid, "root converged");
            return Ok(mid);
        }
        if fm.signum() == fa.signum() {
            a = mid;
            fa = fm;
        } else {
            b = mid;
        }
    }

    debug!(quantity = target, max_iterations = config.max_iterations, "root search exhausted");
    Err(Error::solution_not_found(
        target,
        format!(
            "search did not converge within {} iterations",
            config.max_iterations
        ),
    ))
}
