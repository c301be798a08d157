//! Polynomial Kernel Implementation
//!
//! The polynomial kernel is defined as:
//! K(x, y) = (<x, y> + bias)^exponent
//!
//! Where:
//! - bias: independent term added before exponentiation (default 0)
//! - exponent: degree of the polynomial (default 1)
//!
//! The bias is added inside the power. An earlier variant of this formula
//! added it afterwards, `<x, y>^exponent + bias`; that form is not used.

use crate::kernel::traits::{dot, Kernel};
use ndarray::ArrayView1;

/// Polynomial kernel with configurable bias and exponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialKernel {
    /// Independent term in the polynomial
    pub bias: f64,
    /// Degree of the polynomial, may be fractional
    pub exponent: f64,
}

impl PolynomialKernel {
    /// Creates a new polynomial kernel with the specified parameters
    ///
    /// # Examples
    /// ```
    /// use smosvm::kernel::PolynomialKernel;
    ///
    /// // Quadratic kernel: (x·y + 1)²
    /// let quad_kernel = PolynomialKernel::new(1.0, 2.0);
    /// assert_eq!(quad_kernel.exponent, 2.0);
    /// ```
    pub fn new(bias: f64, exponent: f64) -> Self {
        Self { bias, exponent }
    }

    /// Build from an ordered parameter list `[bias, exponent]`
    pub fn from_params(params: &[f64]) -> Self {
        Self::new(
            params.first().copied().unwrap_or(0.0),
            params.get(1).copied().unwrap_or(1.0),
        )
    }
}

impl Default for PolynomialKernel {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl Kernel for PolynomialKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let value = (dot(x, y) + self.bias).powf(self.exponent);

        // Negative base with a fractional exponent, or overflow
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_polynomial_kernel_quadratic() {
        let kernel = PolynomialKernel::new(1.0, 2.0);
        let x = array![1.0, 2.0];
        let y = array![3.0, 4.0];

        // (11 + 1)^2 = 144
        assert_relative_eq!(kernel.compute(x.view(), y.view()), 144.0, epsilon = 1e-10);
    }

    #[test]
    fn test_polynomial_defaults_reduce_to_dot() {
        let kernel = PolynomialKernel::from_params(&[]);
        let x = array![1.0, 2.0, 3.0];
        let y = array![1.0, 1.0, 1.0];

        assert_relative_eq!(kernel.compute(x.view(), y.view()), 6.0, epsilon = 1e-10);
    }

    #[test]
    fn test_polynomial_bias_inside_power() {
        let kernel = PolynomialKernel::from_params(&[2.0, 3.0]);
        let x = array![1.0];
        let y = array![1.0];

        // (1 + 2)^3 = 27, not 1^3 + 2 = 3
        assert_relative_eq!(kernel.compute(x.view(), y.view()), 27.0, epsilon = 1e-10);
    }

    #[test]
    fn test_polynomial_negative_base_integer_exponent() {
        let kernel = PolynomialKernel::new(0.0, 2.0);
        let x = array![-2.0];
        let y = array![1.0];
        assert_relative_eq!(kernel.compute(x.view(), y.view()), 4.0, epsilon = 1e-10);
    }

    #[test]
    fn test_polynomial_non_finite_guard() {
        let kernel = PolynomialKernel::new(0.0, 0.5);
        let x = array![-2.0];
        let y = array![1.0];
        assert_eq!(kernel.compute(x.view(), y.view()), 0.0);
    }
}
