//! Gaussian (RBF) kernel implementation
//!
//! The Gaussian kernel is defined as: K(x, y) = exp(-||x - y||² / (2σ²))
//! where σ (sigma) controls the kernel width.

use crate::kernel::traits::{squared_distance, Kernel};
use ndarray::ArrayView1;

/// Gaussian kernel: K(x, y) = exp(-||x - y||² / (2σ²))
///
/// - Small sigma: close points have high influence (potential overfitting)
/// - Large sigma: distant points have influence (potential underfitting)
///
/// A zero sigma makes the denominator vanish; the kernel then evaluates to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianKernel {
    sigma: f64,
}

impl GaussianKernel {
    /// Create a new Gaussian kernel with the specified width
    pub fn new(sigma: f64) -> Self {
        Self { sigma }
    }

    /// Build from an ordered parameter list `[sigma]`
    pub fn from_params(params: &[f64]) -> Self {
        Self::new(params.first().copied().unwrap_or(1.0))
    }

    /// Get the sigma parameter
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// The `2σ²` denominator shared with the dense fast paths
    pub fn denominator(&self) -> f64 {
        2.0 * self.sigma * self.sigma
    }

    /// Kernel value for a precomputed squared distance
    pub fn from_squared_distance(&self, squared_distance: f64) -> f64 {
        let denom = self.denominator();
        if denom.abs() > 0.0 {
            (-squared_distance / denom).exp()
        } else {
            0.0
        }
    }
}

impl Default for GaussianKernel {
    /// Default Gaussian kernel with sigma = 1.0
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Kernel for GaussianKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        self.from_squared_distance(squared_distance(x, y))
    }
}
