//! Parallel power tables using Rayon.
//!
//! Enable with the `parallel` feature flag. Rows of the grid are evaluated
//! in parallel; the result is identical to [`power_table`](crate::table::power_table).
//!
//! # Usage
//!
//! ```
//! use statpower::parallel::par_power_table;
//! use statpower::procedures::one_proportion::OneProportion;
//!
//! let design = OneProportion::new().null_proportion(0.8).proportion(0.95);
//! let sizes: Vec<f64> = (10..=100).step_by(10).map(f64::from).collect();
//! let table = par_power_table(&design, &sizes, &[0.01, 0.05, 0.10]).unwrap();
//!
//! assert_eq!(table.power().dim(), (10, 3));
//! ```
//!
//! # Performance
//!
//! Each cell is a handful of `erfc` calls, so the parallel version only pays
//! off for grids with thousands of cells.

use ndarray::Array2;
use rayon::prelude::*;

use crate::error::Result;
use crate::table::{PowerCurve, PowerTable};

/// Tabulate `curve` at every (size, alpha) pair, one row per task.
///
/// # Errors
///
/// Returns an error raised by [`PowerCurve::power_at`]. When several cells
/// fail, which one is reported is unspecified.
pub fn par_power_table<C>(curve: &C, sizes: &[f64], alphas: &[f64]) -> Result<PowerTable>
where
    C: PowerCurve + ?Sized,
{
    let rows: Vec<Vec<f64>> = sizes
        .par_iter()
        .map(|&size| {
            alphas
                .iter()
                .map(|&alpha| curve.power_at(size, alpha))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<_>>()?;

    let mut power = Array2::zeros((sizes.len(), alphas.len()));
    for (i, row) in rows.into_iter().enumerate() {
        for (j, value) in row.into_iter().enumerate() {
            power[[i, j]] = value;
        }
    }

    tracing::debug!(
        design = curve.name(),
        rows = sizes.len(),
        columns = alphas.len(),
        "power table computed in parallel"
    );
    Ok(PowerTable::new(sizes.to_vec(), alphas.to_vec(), power))
}
