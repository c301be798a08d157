//! Core traits for SVM models

use crate::core::Result;
use ndarray::{Array1, ArrayView2};

/// A trained one-vs-rest binary classifier
pub trait BinaryClassifier {
    /// Raw decision values, one per input row
    fn predict(&self, input: &ArrayView2<f64>) -> Result<Array1<f64>>;

    /// Category this classifier answers for
    fn category(&self) -> i32;

    /// Label each row with `category()` when its score exceeds `threshold`, 0 otherwise
    fn classify(&self, input: &ArrayView2<f64>, threshold: f64) -> Result<Vec<i32>> {
        let category = self.category();
        Ok(self
            .predict(input)?
            .iter()
            .map(|&score| if score > threshold { category } else { 0 })
            .collect())
    }

    /// Get the number of support vectors
    fn n_support_vectors(&self) -> usize;

    /// Get the bias term
    fn bias(&self) -> f64;
}
