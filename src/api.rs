//! High-level API for Support Vector Machine operations
//!
//! This module provides a user-friendly interface for common SVM tasks:
//! training binary and one-vs-rest classifiers, prediction, and evaluation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use smosvm::api::SVM;
//! use smosvm::core::KernelSpec;
//! use smosvm::data::DelimitedDataset;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = DelimitedDataset::from_file("train.tsv", '\t')?;
//!
//! // One binary model per category found in the labels
//! let classifier = SVM::new()
//!     .with_kernel(KernelSpec::gaussian(0.5))
//!     .with_c(1.0)
//!     .with_seed(42)
//!     .train_one_vs_rest(&dataset.features(), dataset.labels())?;
//!
//! let labels = classifier.classify(&dataset.features())?;
//! println!("Classified {} examples", labels.len());
//! println!("Accuracy: {:.2}%", classifier.accuracy(&dataset.features(), dataset.labels())? * 100.0);
//! # Ok(())
//! # }
//! ```

use crate::core::{BinaryClassifier, KernelSpec, Result, SVMError, TrainingConfig};
use crate::data::{positive_categories, DelimitedDataset};
use crate::model::TrainedModel;
use crate::solver::TrainingSession;
use log::info;
use ndarray::{Array2, ArrayView2};
use std::path::Path;

/// High-level SVM interface with builder pattern
#[derive(Debug, Clone, Default)]
pub struct SVM {
    kernel: KernelSpec,
    config: TrainingConfig,
}

impl SVM {
    /// Create a new SVM with linear kernel and default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the kernel family and parameters
    pub fn with_kernel(mut self, kernel: KernelSpec) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set KKT tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set the number of sweeps without change after which training stops
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.config.max_passes = max_passes;
        self
    }

    /// Set the category treated as the positive class
    pub fn with_category(mut self, category: i32) -> Self {
        self.config.category = category;
        self
    }

    /// Seed the random source for reproducible training
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn kernel(&self) -> &KernelSpec {
        &self.kernel
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Fresh training session using this builder's seed
    pub fn session(&self) -> TrainingSession {
        TrainingSession::from_config_seed(self.config.seed)
    }

    /// Train a binary model for the configured category
    pub fn train(&self, x: &ArrayView2<f64>, y: &[i32]) -> Result<TrainedModel> {
        let mut session = self.session();
        session.train(x, y, self.kernel.clone(), self.config.clone())?;
        session.into_model().ok_or(SVMError::SessionNotInitialized)
    }

    /// Train one binary model per positive category found in `y`
    pub fn train_one_vs_rest(&self, x: &ArrayView2<f64>, y: &[i32]) -> Result<OneVsRest> {
        let categories = positive_categories(y);
        if categories.is_empty() {
            return Err(SVMError::InvalidDataset(
                "No positive category labels found".to_string(),
            ));
        }

        let mut models = Vec::with_capacity(categories.len());
        for category in categories {
            info!("Training category {category}");
            models.push(self.clone().with_category(category).train(x, y)?);
        }

        Ok(OneVsRest::new(models))
    }

    /// Train a one-vs-rest classifier from a delimited text file
    pub fn train_from_file<P: AsRef<Path>>(&self, path: P, delimiter: char) -> Result<OneVsRest> {
        let dataset = DelimitedDataset::from_file(path, delimiter)?;
        self.train_one_vs_rest(&dataset.features(), dataset.labels())
    }
}

/// Multiclass classifier composed of independent binary models
#[derive(Debug, Clone, Default)]
pub struct OneVsRest {
    models: Vec<TrainedModel>,
}

impl OneVsRest {
    pub fn new(models: Vec<TrainedModel>) -> Self {
        Self { models }
    }

    pub fn models(&self) -> &[TrainedModel] {
        &self.models
    }

    pub fn into_models(self) -> Vec<TrainedModel> {
        self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Category of each model, in model order
    pub fn categories(&self) -> Vec<i32> {
        self.models.iter().map(|m| m.category).collect()
    }

    /// Raw scores of every trained model: one row per example, one column per model
    ///
    /// Columns of untrained models are filled with negative infinity. A
    /// single column whose length equals the feature count is read as one
    /// example, as [`TrainedModel::predict`] does.
    pub fn scores(&self, x: &ArrayView2<f64>) -> Result<Array2<f64>> {
        let n_features = self
            .models
            .iter()
            .filter(|m| m.trained)
            .find_map(TrainedModel::n_features);
        let x = match n_features {
            Some(n) if n > 1 && x.ncols() == 1 && x.nrows() == n => x.view().reversed_axes(),
            _ => x.view(),
        };

        let mut scores = Array2::from_elem((x.nrows(), self.models.len()), f64::NEG_INFINITY);
        for (col, model) in self.models.iter().enumerate() {
            if model.trained {
                scores.column_mut(col).assign(&model.predict(&x)?);
            }
        }
        Ok(scores)
    }

    /// Label each example with the category of its highest-scoring model
    ///
    /// The winning model still applies its own threshold, so an example no
    /// model claims is labelled 0. Ties go to the earlier model.
    pub fn classify(&self, x: &ArrayView2<f64>) -> Result<Vec<i32>> {
        if !self.models.iter().any(|m| m.trained) {
            return Err(SVMError::ModelNotTrained);
        }

        let scores = self.scores(x)?;
        let labels = scores
            .rows()
            .into_iter()
            .map(|row| {
                let mut best: Option<(usize, f64)> = None;
                for (idx, &score) in row.iter().enumerate() {
                    if !self.models[idx].trained {
                        continue;
                    }
                    match best {
                        Some((_, top)) if score <= top => {}
                        _ => best = Some((idx, score)),
                    }
                }

                match best {
                    Some((idx, score)) if score > 0.0 => self.models[idx].category(),
                    _ => 0,
                }
            })
            .collect();

        Ok(labels)
    }

    /// Fraction of examples whose predicted label equals the true label
    pub fn accuracy(&self, x: &ArrayView2<f64>, y: &[i32]) -> Result<f64> {
        if y.len() != x.nrows() {
            return Err(SVMError::DimensionMismatch {
                expected: x.nrows(),
                actual: y.len(),
            });
        }
        if y.is_empty() {
            return Ok(0.0);
        }

        let predicted = self.classify(x)?;
        let correct = predicted.iter().zip(y).filter(|(p, t)| p == t).count();
        Ok(correct as f64 / y.len() as f64)
    }
}

/// Detailed binary evaluation metrics for one category
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    pub fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// Tally predictions against true labels, `category` being the positive class
    pub fn from_labels(truth: &[i32], predicted: &[i32], category: i32) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(SVMError::DimensionMismatch {
                expected: truth.len(),
                actual: predicted.len(),
            });
        }

        let mut metrics = Self::new(0, 0, 0, 0);
        for (&actual, &pred) in truth.iter().zip(predicted) {
            match (pred == category, actual == category) {
                (true, true) => metrics.true_positives += 1,
                (false, false) => metrics.true_negatives += 1,
                (true, false) => metrics.false_positives += 1,
                (false, true) => metrics.false_negatives += 1,
            }
        }

        Ok(metrics)
    }

    /// Evaluate a binary model on labelled data
    pub fn evaluate(model: &TrainedModel, x: &ArrayView2<f64>, y: &[i32]) -> Result<Self> {
        let predicted = model.classify(x, 0.0)?;
        Self::from_labels(y, &predicted, model.category)
    }

    /// Number of misclassified examples
    pub fn errors(&self) -> usize {
        self.false_positives + self.false_negatives
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        let total =
            self.true_positives + self.true_negatives + self.false_positives + self.false_negatives;
        if total == 0 {
            0.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate recall (sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Calculate specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        let denominator = self.true_negatives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_negatives as f64 / denominator as f64
        }
    }
}
