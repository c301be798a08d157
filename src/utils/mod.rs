//! Utility functions for SVM operations

/// Feature normalization utilities
pub mod normalization {
    use crate::core::{Result, SVMError};
    use ndarray::{Array2, ArrayView2, Axis};

    /// Per-feature min-max scaling to `[0, 1]`
    ///
    /// `x' = (x - min) / (max - min)`. A constant feature maps to 0.
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct MinMaxNormalizer {
        bounds: Vec<[f64; 2]>,
    }

    impl MinMaxNormalizer {
        /// Record per-feature bounds from training data
        pub fn fit(x: &ArrayView2<f64>) -> Result<Self> {
            if x.nrows() == 0 || x.ncols() == 0 {
                return Err(SVMError::EmptyDataset);
            }

            let bounds = x
                .axis_iter(Axis(1))
                .map(|column| {
                    let min = column.iter().copied().fold(f64::INFINITY, f64::min);
                    let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    [min, max]
                })
                .collect();

            Ok(Self { bounds })
        }

        /// Restore stored `[min, max]` pairs
        pub fn from_bounds(bounds: Vec<[f64; 2]>) -> Self {
            Self { bounds }
        }

        /// Per-feature `[min, max]` pairs
        pub fn bounds(&self) -> &[[f64; 2]] {
            &self.bounds
        }

        pub fn n_features(&self) -> usize {
            self.bounds.len()
        }

        /// Scale `x` in place with the recorded bounds
        pub fn transform_inplace(&self, x: &mut Array2<f64>) -> Result<()> {
            if x.ncols() != self.bounds.len() {
                return Err(SVMError::DimensionMismatch {
                    expected: self.bounds.len(),
                    actual: x.ncols(),
                });
            }

            for (mut column, &[min, max]) in x.axis_iter_mut(Axis(1)).zip(&self.bounds) {
                let range = max - min;
                if range > 0.0 {
                    column.mapv_inplace(|v| (v - min) / range);
                } else {
                    column.fill(0.0);
                }
            }

            Ok(())
        }

        /// Scaled copy of `x`
        pub fn transform(&self, x: &ArrayView2<f64>) -> Result<Array2<f64>> {
            let mut scaled = x.to_owned();
            self.transform_inplace(&mut scaled)?;
            Ok(scaled)
        }

        /// Fit on `x` and return the scaled copy
        pub fn fit_transform(x: &ArrayView2<f64>) -> Result<(Self, Array2<f64>)> {
            let normalizer = Self::fit(x)?;
            let scaled = normalizer.transform(x)?;
            Ok((normalizer, scaled))
        }
    }
}

pub use self::normalization::MinMaxNormalizer;
