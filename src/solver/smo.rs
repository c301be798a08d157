//! Sequential Minimal Optimization (SMO) training session
//!
//! This implements the simplified SMO algorithm for binary SVM
//! classification: every sweep visits each example in order, and each KKT
//! violator is paired with a second example chosen uniformly at random.
//! Training runs one sweep per [`TrainingSession::step`] call so a caller
//! can interleave it with other work.

use crate::core::{KernelSpec, KernelType, Result, SVMError, SessionState, TrainingConfig};
use crate::kernel::matrix::kernel_matrix;
use crate::model::TrainedModel;
use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bounds closer than this are treated as equal and the pair is skipped
const BOUND_EPSILON: f64 = f64::EPSILON;

/// Dense buffers owned by a session between setup and generate
#[derive(Debug, Clone)]
struct TrainingState {
    x: Array2<f64>,
    /// Labels mapped to +1 for the target category and -1 otherwise
    y: Array1<f64>,
    kernel_matrix: Array2<f64>,
    alpha: Array1<f64>,
    errors: Array1<f64>,
    b: f64,
}

impl TrainingState {
    /// E_k = f(x_k) - y_k with f(x_k) = b + Σ alpha_l y_l K[k, l]
    fn error(&self, k: usize) -> f64 {
        let row = self.kernel_matrix.row(k);
        let mut e = self.b;
        for l in 0..self.alpha.len() {
            e += self.alpha[l] * self.y[l] * row[l];
        }
        e - self.y[k]
    }
}

/// Training state for a single one-vs-rest binary classifier
///
/// The random source used for second-variable selection is owned by the
/// session; seed it for reproducible runs.
#[derive(Debug)]
pub struct TrainingSession<R: Rng = StdRng> {
    config: TrainingConfig,
    kernel: KernelSpec,
    rng: R,
    state: Option<TrainingState>,
    model: Option<TrainedModel>,
    iterations: usize,
    sweeps: usize,
}

impl TrainingSession<StdRng> {
    /// Create a session whose random source is seeded from entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a session with a fixed seed for reproducible training
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Create a session seeded from `config.seed`, or from entropy when absent
    pub fn from_config_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }
}

impl Default for TrainingSession<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> TrainingSession<R> {
    /// Create a session drawing from an injected random source
    pub fn with_rng(rng: R) -> Self {
        Self {
            config: TrainingConfig::default(),
            kernel: KernelSpec::default(),
            rng,
            state: None,
            model: None,
            iterations: 0,
            sweeps: 0,
        }
    }

    /// Load training data and precompute the kernel matrix
    ///
    /// `x` holds one example per row and `y` the raw category code of each
    /// example. Both are copied. Labels equal to `config.category` map to +1,
    /// everything else to -1. Any previous training state or generated model
    /// is discarded.
    pub fn setup(
        &mut self,
        x: &ArrayView2<f64>,
        y: &[i32],
        kernel: KernelSpec,
        config: TrainingConfig,
    ) -> Result<()> {
        self.free();

        config.validate()?;
        kernel.validate()?;

        let (m, n) = x.dim();
        if m == 0 || n == 0 {
            return Err(SVMError::EmptyDataset);
        }
        if y.len() != m {
            return Err(SVMError::DimensionMismatch {
                expected: m,
                actual: y.len(),
            });
        }
        if m < 2 {
            return Err(SVMError::InvalidDataset(
                "Training requires at least 2 examples".to_string(),
            ));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(SVMError::InvalidDataset(
                "Features must be finite".to_string(),
            ));
        }

        let labels: Array1<f64> = y
            .iter()
            .map(|&label| if label == config.category { 1.0 } else { -1.0 })
            .collect();

        let positives = labels.iter().filter(|&&l| l > 0.0).count();
        if positives == 0 {
            warn!(
                "Category {} does not occur in the labels, every example is negative",
                config.category
            );
        }

        let x = x.to_owned();
        let kernel_matrix = kernel_matrix(&x.view(), &kernel);

        info!(
            "Setup: {m} examples, {n} features, {positives} positive for category {}, {} kernel {:?}",
            config.category, kernel.kind, kernel.params
        );

        self.state = Some(TrainingState {
            x,
            y: labels,
            kernel_matrix,
            alpha: Array1::zeros(m),
            errors: Array1::zeros(m),
            b: 0.0,
        });
        self.kernel = kernel;
        self.config = config;
        self.iterations = 0;
        self.sweeps = 0;

        Ok(())
    }

    /// Run one optimization sweep over all examples
    ///
    /// Returns `true` once `max_passes` sweeps without any alpha change have
    /// accumulated. Those sweeps need not be consecutive. Once done, further
    /// calls return `true` without doing any work.
    pub fn step(&mut self) -> Result<bool> {
        if self.iterations >= self.config.max_passes || self.model.is_some() {
            return Ok(true);
        }

        let state = self
            .state
            .as_mut()
            .ok_or(SVMError::SessionNotInitialized)?;

        let c = self.config.c;
        let tol = self.config.tolerance;
        let m = state.y.len();
        let mut changed = 0usize;

        for i in 0..m {
            let e_i = state.error(i);
            state.errors[i] = e_i;

            let y_i = state.y[i];
            let r_i = y_i * e_i;
            if !((r_i < -tol && state.alpha[i] < c) || (r_i > tol && state.alpha[i] > 0.0)) {
                continue;
            }

            // Uniform over every index except i
            let mut j = self.rng.gen_range(0..m - 1);
            if j >= i {
                j += 1;
            }

            let e_j = state.error(j);
            state.errors[j] = e_j;

            let y_j = state.y[j];
            let alpha_i_old = state.alpha[i];
            let alpha_j_old = state.alpha[j];

            let (low, high) = if y_i == y_j {
                (
                    (alpha_j_old + alpha_i_old - c).max(0.0),
                    (alpha_j_old + alpha_i_old).min(c),
                )
            } else {
                (
                    (alpha_j_old - alpha_i_old).max(0.0),
                    (c + alpha_j_old - alpha_i_old).min(c),
                )
            };

            if (low - high).abs() <= BOUND_EPSILON {
                continue;
            }

            let k_ij = state.kernel_matrix[[j, i]];
            let k_ii = state.kernel_matrix[[i, i]];
            let k_jj = state.kernel_matrix[[j, j]];

            let eta = 2.0 * k_ij - k_ii - k_jj;
            if eta >= 0.0 {
                continue;
            }

            let alpha_j = (alpha_j_old - y_j * (e_i - e_j) / eta).min(high).max(low);

            if (alpha_j - alpha_j_old).abs() < tol {
                continue;
            }

            // Exact in real arithmetic, clamped to absorb rounding at the box edges
            let alpha_i = (alpha_i_old + y_i * y_j * (alpha_j_old - alpha_j)).clamp(0.0, c);
            state.alpha[j] = alpha_j;
            state.alpha[i] = alpha_i;

            let delta_i = y_i * (alpha_i - alpha_i_old);
            let delta_j = y_j * (alpha_j - alpha_j_old);
            let b1 = state.b - e_i - delta_i * k_ij - delta_j * k_ij;
            let b2 = state.b - e_j - delta_i * k_ij - delta_j * k_jj;

            state.b = if 0.0 < alpha_i && alpha_i < c {
                b1
            } else if 0.0 < alpha_j && alpha_j < c {
                b2
            } else {
                (b1 + b2) / 2.0
            };

            changed += 1;
        }

        self.sweeps += 1;
        if changed == 0 {
            self.iterations += 1;
        }

        debug!(
            "Sweep {}: {changed} pairs changed, {}/{} passes without change, b = {:.6}",
            self.sweeps, self.iterations, self.config.max_passes, state.b
        );

        Ok(self.iterations >= self.config.max_passes)
    }

    /// Compact the training state into a trained model
    ///
    /// Support vectors are the examples whose alpha is nonzero. All training
    /// buffers are released. Calling this again returns the same model.
    pub fn generate(&mut self) -> Result<&TrainedModel> {
        if let Some(state) = self.state.take() {
            let model = self.build_model(state);
            self.model = Some(model);
        }

        self.model.as_ref().ok_or(SVMError::SessionNotInitialized)
    }

    fn build_model(&self, state: TrainingState) -> TrainedModel {
        let support: Vec<usize> = state
            .alpha
            .iter()
            .enumerate()
            .filter(|(_, &a)| a.abs() > 0.0)
            .map(|(i, _)| i)
            .collect();

        if support.is_empty() {
            warn!(
                "Category {}: no support vectors, model predicts the bias only",
                self.config.category
            );
        }

        let model_x = state.x.select(Axis(0), &support);
        let model_y = state.y.select(Axis(0), &support);
        let alpha = state.alpha.select(Axis(0), &support);

        // W = Xᵗ (alpha ⊙ y), only used by the linear fast path
        let w = if self.kernel.kind == KernelType::Linear {
            let weights = &state.alpha * &state.y;
            state.x.t().dot(&weights)
        } else {
            Array1::zeros(0)
        };

        info!(
            "Generate: category {}, {} support vectors, b = {:.6}, {} passes",
            self.config.category,
            support.len(),
            state.b,
            self.iterations
        );

        TrainedModel {
            model_x,
            model_y,
            kernel_type: self.kernel.kind,
            kernel_param: self.kernel.params.clone(),
            alpha,
            w,
            b: state.b,
            c: self.config.c,
            tolerance: self.config.tolerance,
            category: self.config.category,
            passes: self.iterations,
            iterations: self.iterations,
            max_iterations: self.config.max_passes,
            trained: true,
        }
    }

    /// Setup, step until done, then generate
    pub fn train(
        &mut self,
        x: &ArrayView2<f64>,
        y: &[i32],
        kernel: KernelSpec,
        config: TrainingConfig,
    ) -> Result<&TrainedModel> {
        self.setup(x, y, kernel, config)?;
        while !self.step()? {}
        self.generate()
    }

    /// Release all training buffers and any generated model
    pub fn free(&mut self) {
        self.state = None;
        self.model = None;
        self.iterations = 0;
        self.sweeps = 0;
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        match (&self.state, &self.model) {
            (_, Some(_)) => SessionState::Trained,
            (Some(_), None) if self.sweeps == 0 => SessionState::Ready,
            (Some(_), None) => SessionState::Training,
            (None, None) => SessionState::Uninitialized,
        }
    }

    /// Accumulated number of sweeps that changed no alpha
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of no-change sweeps after which training halts
    pub fn max_iterations(&self) -> usize {
        self.config.max_passes
    }

    /// Total number of sweeps run since setup
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Target category of this session
    pub fn category(&self) -> i32 {
        self.config.category
    }

    /// Current dual variables, while training
    pub fn alpha(&self) -> Option<ArrayView1<'_, f64>> {
        self.state.as_ref().map(|s| s.alpha.view())
    }

    /// Current bias, while training
    pub fn bias(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.b)
    }

    /// The generated model, if any
    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    /// Take ownership of the generated model
    pub fn into_model(self) -> Option<TrainedModel> {
        self.model
    }

    #[cfg(test)]
    pub(crate) fn mapped_labels(&self) -> Option<ArrayView1<'_, f64>> {
        self.state.as_ref().map(|s| s.y.view())
    }

    #[cfg(test)]
    pub(crate) fn kernel_matrix(&self) -> Option<ArrayView2<'_, f64>> {
        self.state.as_ref().map(|s| s.kernel_matrix.view())
    }

    #[cfg(test)]
    pub(crate) fn error_cache(&self) -> Option<ArrayView1<'_, f64>> {
        self.state.as_ref().map(|s| s.errors.view())
    }
}
