//! Fourier kernel implementation
//!
//! A Dirichlet-kernel style product over feature differences. For each
//! component with difference `d`:
//!
//! - `d ≈ 0`: factor is `2 * sin(m + 0.5)` (the limit of the general form)
//! - otherwise: factor is `sin(m + 0.5) * d / sin(d / 2)`
//!
//! and the kernel value is the product of the factors.

use crate::kernel::traits::Kernel;
use ndarray::ArrayView1;

/// Fourier kernel with a single scaling factor `m`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierKernel {
    pub scale: f64,
}

impl FourierKernel {
    /// Create a new Fourier kernel
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    /// Build from an ordered parameter list `[scale]`
    pub fn from_params(params: &[f64]) -> Self {
        Self::new(params.first().copied().unwrap_or(1.0))
    }

    fn factor(&self, d: f64) -> f64 {
        let numerator = (self.scale + 0.5).sin();

        if d.abs() <= f64::EPSILON {
            return numerator * 2.0;
        }

        let denom = (d * 0.5).sin();
        if denom.abs() > 0.0 {
            numerator * d / denom
        } else {
            0.0
        }
    }
}

impl Default for FourierKernel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Kernel for FourierKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let mut factors = x.iter().zip(y.iter()).map(|(a, b)| self.factor(a - b));

        match factors.next() {
            Some(first) => factors.fold(first, |prod, z| prod * z),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_fourier_identical_vectors() {
        let kernel = FourierKernel::new(1.0);
        let x = array![0.3, -0.7];

        let expected = (2.0 * 1.5_f64.sin()).powi(2);
        assert_relative_eq!(kernel.compute(x.view(), x.view()), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_fourier_single_component() {
        let kernel = FourierKernel::new(1.0);
        let x = array![1.0];
        let y = array![0.0];

        let expected = 1.5_f64.sin() * 1.0 / 0.5_f64.sin();
        assert_relative_eq!(kernel.compute(x.view(), y.view()), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_fourier_symmetric() {
        let kernel = FourierKernel::new(0.7);
        let x = array![0.1, 0.9, -0.4];
        let y = array![0.5, -0.2, 0.3];
        assert_relative_eq!(
            kernel.compute(x.view(), y.view()),
            kernel.compute(y.view(), x.view()),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_fourier_vanishing_denominator() {
        let kernel = FourierKernel::new(1.0);
        let x = array![2.0 * std::f64::consts::PI];
        let y = array![0.0];
        assert!(kernel.compute(x.view(), y.view()).is_finite());
    }

    #[test]
    fn test_fourier_empty_vectors() {
        let kernel = FourierKernel::default();
        let x: Array1<f64> = Array1::zeros(0);
        assert_eq!(kernel.compute(x.view(), x.view()), 0.0);
    }
}
