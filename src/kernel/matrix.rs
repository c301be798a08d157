//! Dense kernel matrix construction
//!
//! The SMO solver precomputes the full m×m kernel matrix. Linear and
//! Gaussian kernels have closed forms built from a single matrix product;
//! every other family is evaluated pointwise, once per unordered pair.

use crate::core::{KernelSpec, KernelType};
use crate::kernel::{GaussianKernel, Kernel, LinearKernel};
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Build the kernel matrix `K[i][j] = k(x_i, x_j)` for the rows of `x`
///
/// The result is exactly symmetric.
pub fn kernel_matrix(x: &ArrayView2<f64>, spec: &KernelSpec) -> Array2<f64> {
    match spec.kind {
        KernelType::Linear => linear_kernel_matrix(x, &LinearKernel::from_params(&spec.params)),
        KernelType::Gaussian => {
            gaussian_kernel_matrix(x, &GaussianKernel::from_params(&spec.params))
        }
        _ => pointwise_kernel_matrix(x, spec),
    }
}

/// `K = slope * X·Xᵗ + intercept`
pub fn linear_kernel_matrix(x: &ArrayView2<f64>, kernel: &LinearKernel) -> Array2<f64> {
    let mut k = x.dot(&x.t());
    k.mapv_inplace(|v| v * kernel.slope + kernel.intercept);
    mirror_upper(&mut k);
    k
}

/// Gaussian kernel matrix from the expanded pairwise squared distances
pub fn gaussian_kernel_matrix(x: &ArrayView2<f64>, kernel: &GaussianKernel) -> Array2<f64> {
    let mut k = squared_distances(x, x);
    k.mapv_inplace(|d| kernel.from_squared_distance(d));
    mirror_upper(&mut k);
    k
}

/// Kernel matrix by direct evaluation of every unordered pair
pub fn pointwise_kernel_matrix<K: Kernel + ?Sized>(
    x: &ArrayView2<f64>,
    kernel: &K,
) -> Array2<f64> {
    let m = x.nrows();
    let mut k = Array2::zeros((m, m));

    for i in 0..m {
        for j in 0..=i {
            let value = kernel.compute(x.row(j), x.row(i));
            k[[j, i]] = value;
            k[[i, j]] = value;
        }
    }

    k
}

/// Pairwise squared Euclidean distances between the rows of `a` and `b`
///
/// Uses `||a - b||² = ||a||² + ||b||² - 2 a·b`, so the whole matrix costs one
/// matrix product. Values are clamped at zero to absorb cancellation error.
pub fn squared_distances(a: &ArrayView2<f64>, b: &ArrayView2<f64>) -> Array2<f64> {
    let a_norms = row_sums_of_squares(a);
    let b_norms = row_sums_of_squares(b);

    let mut d = a.dot(&b.t());
    d.mapv_inplace(|v| -2.0 * v);

    // Broadcast the column of ||a||² across columns and the row of ||b||² across rows
    d += &a_norms.insert_axis(Axis(1));
    d += &b_norms.insert_axis(Axis(0));

    d.mapv_inplace(|v| v.max(0.0));
    d
}

fn row_sums_of_squares(x: &ArrayView2<f64>) -> Array1<f64> {
    x.mapv(|v| v * v).sum_axis(Axis(1))
}

/// Copy the upper triangle onto the lower one
fn mirror_upper(k: &mut Array2<f64>) {
    let m = k.nrows().min(k.ncols());
    for i in 0..m {
        for j in 0..i {
            k[[i, j]] = k[[j, i]];
        }
    }
}
