//! SVM solver implementations
//!
//! This module implements the simplified Sequential Minimal Optimization
//! (SMO) algorithm with random second-variable selection.

pub mod smo;

pub use self::smo::*;
