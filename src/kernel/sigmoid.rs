//! Sigmoid Kernel Implementation
//!
//! K(x, y) = tanh(slope * <x, y> / n + intercept)
//!
//! The dot product is averaged over the `n` components of `x` before the
//! slope is applied, which keeps the tanh argument in a usable range as the
//! dimensionality grows. The sigmoid kernel is not positive semi-definite
//! for every parameter choice, so the solver may meet non-negative `eta`
//! and simply skip those pairs.

use crate::kernel::traits::{dot, Kernel};
use ndarray::ArrayView1;

/// Sigmoid kernel with configurable slope and intercept
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmoidKernel {
    /// Scaling factor for the averaged dot product
    pub slope: f64,
    /// Offset inside the tanh
    pub intercept: f64,
}

impl SigmoidKernel {
    /// Creates a new sigmoid kernel
    ///
    /// # Examples
    /// ```
    /// use smosvm::kernel::SigmoidKernel;
    ///
    /// let kernel = SigmoidKernel::new(1.0, -0.5);
    /// assert_eq!(kernel.slope, 1.0);
    /// assert_eq!(kernel.intercept, -0.5);
    /// ```
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

impl Default for SigmoidKernel {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Kernel for SigmoidKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        if x.is_empty() {
            return 0.0;
        }

        (self.slope * dot(x, y) / x.len() as f64 + self.intercept).tanh()
    }
}
