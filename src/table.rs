//! Power tables over a grid of sample sizes and significance levels.
//!
//! Any design implementing [`PowerCurve`] can be tabulated:
//!
//! ```
//! use statpower::procedures::one_proportion::OneProportion;
//! use statpower::table::power_table;
//!
//! let design = OneProportion::new().null_proportion(0.8).proportion(0.95);
//! let table = power_table(&design, &[20.0, 42.0, 80.0], &[0.01, 0.05]).unwrap();
//!
//! assert_eq!(table.power().dim(), (3, 2));
//! assert!((table.get(1, 1) - 0.80598).abs() < 1e-4);
//! ```

use ndarray::Array2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A design whose power can be evaluated at a sample size and alpha, with
/// every other parameter held fixed.
pub trait PowerCurve: Send + Sync {
    /// Short name of the design.
    fn name(&self) -> &'static str;

    /// Power at `size` subjects and significance level `alpha`.
    ///
    /// For two-group designs `size` is the total over both groups.
    ///
    /// # Errors
    ///
    /// Returns an error if any input lies outside its domain or if a
    /// parameter the curve needs was left unknown.
    fn power_at(&self, size: f64, alpha: f64) -> Result<f64>;
}

/// Achieved power over a grid; rows follow sizes, columns follow alphas.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PowerTable {
    sizes: Vec<f64>,
    alphas: Vec<f64>,
    power: Array2<f64>,
}

impl PowerTable {
    pub(crate) fn new(sizes: Vec<f64>, alphas: Vec<f64>, power: Array2<f64>) -> Self {
        Self {
            sizes,
            alphas,
            power,
        }
    }

    /// Row labels.
    #[must_use]
    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    /// Column labels.
    #[must_use]
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// The power grid.
    #[must_use]
    pub fn power(&self) -> &Array2<f64> {
        &self.power
    }

    /// Power at row `size_index`, column `alpha_index`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    pub fn get(&self, size_index: usize, alpha_index: usize) -> f64 {
        self.power[[size_index, alpha_index]]
    }

    /// Smallest tabulated size reaching `power` at column `alpha_index`.
    #[must_use]
    pub fn min_size_for(&self, power: f64, alpha_index: usize) -> Option<f64> {
        self.sizes
            .iter()
            .zip(self.power.column(alpha_index))
            .filter(|&(_, &achieved)| achieved >= power)
            .map(|(&size, _)| size)
            .reduce(f64::min)
    }
}

/// Tabulate `curve` at every (size, alpha) pair.
///
/// # Errors
///
/// Returns the first error raised by [`PowerCurve::power_at`].
pub fn power_table<C>(curve: &C, sizes: &[f64], alphas: &[f64]) -> Result<PowerTable>
where
    C: PowerCurve + ?Sized,
{
    let mut power = Array2::zeros((sizes.len(), alphas.len()));
    for (i, &size) in sizes.iter().enumerate() {
        for (j, &alpha) in alphas.iter().enumerate() {
            power[[i, j]] = curve.power_at(size, alpha)?;
        }
    }
    tracing::debug!(
        design = curve.name(),
        rows = sizes.len(),
        columns = alphas.len(),
        "power table computed"
    );
    Ok(PowerTable::new(sizes.to_vec(), alphas.to_vec(), power))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::numeric::Alpha;

    /// Power grows with both inputs.
    struct Linear;

    impl PowerCurve for Linear {
        fn name(&self) -> &'static str {
            "linear"
        }

        fn power_at(&self, size: f64, alpha: f64) -> Result<f64> {
            let alpha = Alpha::new(alpha)?;
            Ok((size / 100.0 + alpha.get()).min(0.99))
        }
    }

    #[test]
    fn test_table_shape_and_values() {
        let table = power_table(&Linear, &[10.0, 50.0, 90.0], &[0.01, 0.05]).unwrap();
        assert_eq!(table.power().dim(), (3, 2));
        assert_eq!(table.sizes(), &[10.0, 50.0, 90.0]);
        assert_eq!(table.alphas(), &[0.01, 0.05]);
        assert!((table.get(1, 1) - 0.55).abs() < 1e-12);
        assert!((table.get(2, 1) - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_min_size_for() {
        let table = power_table(&Linear, &[10.0, 50.0, 90.0], &[0.01, 0.05]).unwrap();
        assert_eq!(table.min_size_for(0.5, 1), Some(50.0));
        assert_eq!(table.min_size_for(0.995, 0), None);
    }

    #[test]
    fn test_propagates_errors() {
        let err = power_table(&Linear, &[10.0], &[0.05, 1.5]).unwrap_err();
        assert!(matches!(err, Error::NotInDomain { name: "alpha", .. }));
    }

    #[test]
    fn test_trait_object() {
        let curve: Box<dyn PowerCurve> = Box::new(Linear);
        let table = power_table(curve.as_ref(), &[], &[0.05]).unwrap();
        assert_eq!(table.power().dim(), (0, 1));
    }
}
