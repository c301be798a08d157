//! Radial kernel implementation
//!
//! K(x, y) = exp(-||x - y|| / (2σ²))
//!
//! Unlike the Gaussian kernel the exponent uses the plain Euclidean norm,
//! not its square. Both variants are kept as separate families.

use crate::kernel::traits::{squared_distance, Kernel};
use ndarray::ArrayView1;

/// Radial kernel: K(x, y) = exp(-||x - y|| / (2σ²))
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialKernel {
    sigma: f64,
}

impl RadialKernel {
    /// Create a new radial kernel with the specified width
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
}

impl Default for RadialKernel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Kernel for RadialKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let denom = 2.0 * self.sigma * self.sigma;
        if denom.abs() > 0.0 {
            (-squared_distance(x, y).sqrt() / denom).exp()
        } else {
            0.0
        }
    }
}
