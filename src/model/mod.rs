//! Trained binary SVM model
//!
//! A [`TrainedModel`] is the compacted result of a training session: the
//! support vectors, their labels and dual coefficients, the bias, and the
//! kernel that produced them. It can also be rebuilt directly from stored
//! fields without training.

use crate::core::{BinaryClassifier, KernelSpec, KernelType, Result, SVMError};
use crate::kernel::matrix::squared_distances;
use crate::kernel::{run, GaussianKernel};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// One-vs-rest binary classifier produced by [`crate::solver::TrainingSession::generate`]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    /// Support vectors, one per row
    pub model_x: Array2<f64>,
    /// Labels of the support vectors (+1 or -1)
    pub model_y: Array1<f64>,
    pub kernel_type: KernelType,
    pub kernel_param: Vec<f64>,
    /// Dual coefficients of the support vectors
    pub alpha: Array1<f64>,
    /// Primal weights, only populated for the linear kernel
    pub w: Array1<f64>,
    pub b: f64,
    pub c: f64,
    pub tolerance: f64,
    pub category: i32,
    pub passes: usize,
    pub iterations: usize,
    pub max_iterations: usize,
    pub trained: bool,
}

impl TrainedModel {
    /// Build a model directly from its support vectors
    ///
    /// Training metadata takes the session defaults and can be overwritten
    /// through the public fields. Pass an empty `w` when no primal weights
    /// are available; prediction then falls back to the kernel expansion.
    pub fn from_support_vectors(
        model_x: Array2<f64>,
        model_y: Array1<f64>,
        alpha: Array1<f64>,
        b: f64,
        kernel: KernelSpec,
        w: Array1<f64>,
    ) -> Result<Self> {
        kernel.validate()?;

        let n_sv = model_x.nrows();
        if model_y.len() != n_sv {
            return Err(SVMError::DimensionMismatch {
                expected: n_sv,
                actual: model_y.len(),
            });
        }
        if alpha.len() != n_sv {
            return Err(SVMError::DimensionMismatch {
                expected: n_sv,
                actual: alpha.len(),
            });
        }
        if n_sv > 0 && !w.is_empty() && w.len() != model_x.ncols() {
            return Err(SVMError::DimensionMismatch {
                expected: model_x.ncols(),
                actual: w.len(),
            });
        }
        if !b.is_finite() {
            return Err(SVMError::InvalidParameter(format!(
                "Bias must be finite, got: {b}"
            )));
        }

        Ok(Self {
            model_x,
            model_y,
            kernel_type: kernel.kind,
            kernel_param: kernel.params,
            alpha,
            w,
            b,
            c: 1.0,
            tolerance: 0.001,
            category: 1,
            passes: 0,
            iterations: 0,
            max_iterations: 0,
            trained: true,
        })
    }

    /// Kernel family and parameters of this model
    pub fn kernel(&self) -> KernelSpec {
        KernelSpec::new(self.kernel_type, self.kernel_param.clone())
    }

    /// Number of support vectors
    pub fn n_support_vectors(&self) -> usize {
        self.model_x.nrows()
    }

    /// Expected input width, when it can be told from the stored vectors
    pub fn n_features(&self) -> Option<usize> {
        if self.model_x.ncols() > 0 {
            Some(self.model_x.ncols())
        } else if !self.w.is_empty() {
            Some(self.w.len())
        } else {
            None
        }
    }

    /// Raw decision values `f(x) = b + Σ alpha_j y_j K(x, sv_j)`, one per input row
    ///
    /// A single column whose length equals the feature count is read as one
    /// example.
    pub fn predict(&self, input: &ArrayView2<f64>) -> Result<Array1<f64>> {
        if !self.trained {
            return Err(SVMError::ModelNotTrained);
        }

        let n_features = self.n_features();
        let input = match n_features {
            Some(n) if n > 1 && input.ncols() == 1 && input.nrows() == n => {
                input.view().reversed_axes()
            }
            _ => input.view(),
        };

        if let Some(n) = n_features {
            if input.ncols() != n {
                return Err(SVMError::DimensionMismatch {
                    expected: n,
                    actual: input.ncols(),
                });
            }
        }

        if self.uses_primal_weights() {
            return Ok(input.dot(&self.w) + self.b);
        }

        if self.n_support_vectors() == 0 {
            return Ok(Array1::from_elem(input.nrows(), self.b));
        }

        let weights = &self.alpha * &self.model_y;

        if self.kernel_type == KernelType::Gaussian {
            let kernel = GaussianKernel::from_params(&self.kernel_param);
            let mut k = squared_distances(&input, &self.model_x.view());
            k.mapv_inplace(|d| kernel.from_squared_distance(d));
            return Ok(k.dot(&weights) + self.b);
        }

        let scores = input
            .rows()
            .into_iter()
            .map(|row| {
                self.model_x
                    .rows()
                    .into_iter()
                    .zip(weights.iter())
                    .fold(self.b, |acc, (sv, &wt)| {
                        acc + wt * run(self.kernel_type, row, sv, &self.kernel_param)
                    })
            })
            .collect();

        Ok(scores)
    }

    /// Decision value for a single example
    pub fn predict_one(&self, x: ArrayView1<f64>) -> Result<f64> {
        let scores = self.predict(&x.insert_axis(Axis(0)))?;
        Ok(scores[0])
    }

    /// Label each row with the model category when its score exceeds `threshold`, 0 otherwise
    pub fn classify(&self, input: &ArrayView2<f64>, threshold: f64) -> Result<Vec<i32>> {
        <Self as BinaryClassifier>::classify(self, input, threshold)
    }

    /// Count misclassifications of a one-vs-rest labelling
    ///
    /// A true label other than `category` is expected to be classified as 0.
    pub fn test(true_labels: &[i32], classification: &[i32], category: i32) -> Result<usize> {
        if true_labels.len() != classification.len() {
            return Err(SVMError::DimensionMismatch {
                expected: true_labels.len(),
                actual: classification.len(),
            });
        }

        Ok(true_labels
            .iter()
            .zip(classification)
            .filter(|(&truth, &predicted)| {
                let expected = if truth == category { category } else { 0 };
                expected != predicted
            })
            .count())
    }

    /// Linear models carrying `W` score as `input·W + B`
    fn uses_primal_weights(&self) -> bool {
        self.kernel_type == KernelType::Linear && !self.w.is_empty()
    }
}

impl BinaryClassifier for TrainedModel {
    fn predict(&self, input: &ArrayView2<f64>) -> Result<Array1<f64>> {
        TrainedModel::predict(self, input)
    }

    fn category(&self) -> i32 {
        self.category
    }

    fn n_support_vectors(&self) -> usize {
        TrainedModel::n_support_vectors(self)
    }

    fn bias(&self) -> f64 {
        self.b
    }
}
