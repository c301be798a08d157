//! Kernel Support Vector Machine training with simplified SMO
//!
//! Each training session fits one binary one-vs-rest classifier. It
//! precomputes a dense kernel matrix, runs the Sequential Minimal
//! Optimization sweeps one step at a time, and compacts the result into a
//! [`TrainedModel`] that keeps only the support vectors.

pub mod api;
pub mod core;
pub mod data;
pub mod kernel;
pub mod model;
pub mod persistence;
pub mod solver;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{EvaluationMetrics, OneVsRest, SVM};
pub use crate::core::error::*;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::DelimitedDataset;
pub use crate::kernel::Kernel;
pub use crate::model::TrainedModel;
pub use crate::persistence::{ClassifierFile, ModelRecord};
pub use crate::solver::TrainingSession;
pub use crate::utils::MinMaxNormalizer;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
