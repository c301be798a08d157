//! Linear kernel implementation

use crate::kernel::traits::dot;
use crate::kernel::Kernel;
use ndarray::ArrayView1;

/// Linear kernel: K(x, y) = slope * x^T * y + intercept
///
/// With the default slope of 1 and intercept of 0 this is the plain dot
/// product, which is what allows trained models to collapse into a single
/// primal weight vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearKernel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Build from an ordered parameter list `[slope, intercept]`
    pub fn from_params(params: &[f64]) -> Self {
        Self::new(
            params.first().copied().unwrap_or(1.0),
            params.get(1).copied().unwrap_or(0.0),
        )
    }
}

impl Default for LinearKernel {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Kernel for LinearKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        dot(x, y) * self.slope + self.intercept
    }
}
