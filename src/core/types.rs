//! Core type definitions for SVM training

use crate::core::{Result, SVMError};
use std::fmt;
use std::str::FromStr;

/// Kernel family identifier
///
/// The discriminants are the integer ids used in persisted models (`Type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelType {
    /// `(x·y + bias)^exponent`
    Polynomial = 0,
    /// `exp(-||x - y||² / (2σ²))`
    Gaussian = 1,
    /// `exp(-||x - y|| / (2σ²))`, non-squared norm
    Radial = 2,
    /// `tanh(slope * x·y / n + intercept)`
    Sigmoid = 3,
    /// `slope * x·y + intercept`
    Linear = 4,
    /// Dirichlet-style product over feature differences
    Fourier = 5,
}

impl KernelType {
    /// All supported kernel families, in id order
    pub const ALL: [KernelType; 6] = [
        KernelType::Polynomial,
        KernelType::Gaussian,
        KernelType::Radial,
        KernelType::Sigmoid,
        KernelType::Linear,
        KernelType::Fourier,
    ];

    /// Integer id used in persisted models
    pub fn id(self) -> i32 {
        self as i32
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            KernelType::Polynomial => "polynomial",
            KernelType::Gaussian => "gaussian",
            KernelType::Radial => "radial",
            KernelType::Sigmoid => "sigmoid",
            KernelType::Linear => "linear",
            KernelType::Fourier => "fourier",
        }
    }

    /// Preset parameters offered for each family
    pub fn default_params(self) -> Vec<f64> {
        match self {
            KernelType::Polynomial => vec![0.0, 2.0],
            KernelType::Gaussian | KernelType::Radial => vec![0.01],
            KernelType::Sigmoid | KernelType::Linear => vec![1.0, 0.0],
            KernelType::Fourier => vec![1.0],
        }
    }

    /// Names of the free parameters, in order
    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            KernelType::Polynomial => &["bias", "exponent"],
            KernelType::Gaussian | KernelType::Radial => &["sigma"],
            KernelType::Sigmoid | KernelType::Linear => &["slope", "intercept"],
            KernelType::Fourier => &["scaling factor"],
        }
    }
}

impl TryFrom<i32> for KernelType {
    type Error = SVMError;

    fn try_from(id: i32) -> Result<Self> {
        KernelType::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == id)
            .ok_or(SVMError::UnsupportedKernel(id))
    }
}

impl From<KernelType> for i32 {
    fn from(kind: KernelType) -> Self {
        kind.id()
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelType {
    type Err = SVMError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "polynomial" | "poly" => Ok(KernelType::Polynomial),
            "gaussian" | "rbf" => Ok(KernelType::Gaussian),
            "radial" => Ok(KernelType::Radial),
            "sigmoid" => Ok(KernelType::Sigmoid),
            "linear" => Ok(KernelType::Linear),
            "fourier" => Ok(KernelType::Fourier),
            other => Err(SVMError::InvalidParameter(format!(
                "Unknown kernel: {other}"
            ))),
        }
    }
}

/// Kernel family together with its ordered parameter list
#[derive(Debug, Clone, PartialEq)]
pub struct KernelSpec {
    pub kind: KernelType,
    pub params: Vec<f64>,
}

impl KernelSpec {
    /// Create a kernel specification with explicit parameters
    pub fn new(kind: KernelType, params: Vec<f64>) -> Self {
        Self { kind, params }
    }

    /// Create a kernel specification using the family presets
    pub fn with_defaults(kind: KernelType) -> Self {
        Self::new(kind, kind.default_params())
    }

    /// Linear kernel with slope 1 and intercept 0
    pub fn linear() -> Self {
        Self::new(KernelType::Linear, vec![1.0, 0.0])
    }

    /// Gaussian kernel with the given width
    pub fn gaussian(sigma: f64) -> Self {
        Self::new(KernelType::Gaussian, vec![sigma])
    }

    /// Parameter at `index`, or `default` when the list is too short
    pub fn param(&self, index: usize, default: f64) -> f64 {
        self.params.get(index).copied().unwrap_or(default)
    }

    /// Reject parameter lists containing NaN or infinities
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.params.iter().find(|p| !p.is_finite()) {
            return Err(SVMError::InvalidParameter(format!(
                "Kernel parameter must be finite, got: {bad}"
            )));
        }
        Ok(())
    }
}

impl Default for KernelSpec {
    fn default() -> Self {
        Self::linear()
    }
}

/// Configuration for a single binary training session
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Regularization parameter (upper bound for alpha)
    pub c: f64,
    /// Tolerance for KKT violations and alpha changes
    pub tolerance: f64,
    /// Number of sweeps without alpha changes before training halts
    pub max_passes: usize,
    /// Category treated as the positive class
    pub category: i32,
    /// Seed for second-variable selection; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl TrainingConfig {
    /// Check the numeric ranges the solver relies on
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "C must be positive and finite, got: {}",
                self.c
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "Tolerance must be non-negative and finite, got: {}",
                self.tolerance
            )));
        }
        if self.max_passes == 0 {
            return Err(SVMError::InvalidParameter(
                "max_passes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 0.001,
            max_passes: 5,
            category: 1,
            seed: None,
        }
    }
}

/// Lifecycle state of a training session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No training data loaded
    Uninitialized,
    /// Setup done, no sweep performed yet
    Ready,
    /// At least one sweep performed
    Training,
    /// Model generated, training buffers released
    Trained,
}
