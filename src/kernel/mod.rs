//! Kernel functions for SVM
//!
//! Every family lives in its own module and implements [`Kernel`]. The
//! [`run`] dispatcher evaluates a family by id with an ordered parameter
//! list, which is how trained models and persisted files describe kernels.

pub mod fourier;
pub mod gaussian;
pub mod linear;
pub mod matrix;
pub mod polynomial;
pub mod radial;
pub mod sigmoid;
pub mod traits;

pub use self::fourier::*;
pub use self::gaussian::*;
pub use self::linear::*;
pub use self::polynomial::*;
pub use self::radial::*;
pub use self::sigmoid::*;
pub use self::traits::*;

use crate::core::{KernelSpec, KernelType};
use ndarray::{Array1, ArrayBase, ArrayView1, Data, Dimension};

/// Evaluate kernel `kind` on two feature vectors
///
/// Missing parameters fall back to the per-family defaults.
pub fn run(kind: KernelType, a: ArrayView1<f64>, b: ArrayView1<f64>, params: &[f64]) -> f64 {
    match kind {
        KernelType::Linear => LinearKernel::from_params(params).compute(a, b),
        KernelType::Polynomial => PolynomialKernel::from_params(params).compute(a, b),
        KernelType::Gaussian => GaussianKernel::from_params(params).compute(a, b),
        KernelType::Radial => RadialKernel::from_params(params).compute(a, b),
        KernelType::Sigmoid => SigmoidKernel::from_params(params).compute(a, b),
        KernelType::Fourier => FourierKernel::from_params(params).compute(a, b),
    }
}

/// Evaluate kernel `kind` on arrays of any shape
///
/// Both inputs are flattened in logical (row-major) order first, so a row
/// vector, a column vector and a plain vector give the same result.
pub fn run_flattened<S1, S2, D1, D2>(
    kind: KernelType,
    a: &ArrayBase<S1, D1>,
    b: &ArrayBase<S2, D2>,
    params: &[f64],
) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D1: Dimension,
    D2: Dimension,
{
    let a: Array1<f64> = a.iter().copied().collect();
    let b: Array1<f64> = b.iter().copied().collect();
    run(kind, a.view(), b.view(), params)
}

impl Kernel for KernelSpec {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        run(self.kind, x, y, &self.params)
    }
}
