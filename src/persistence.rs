//! Model serialization and persistence
//!
//! A classifier file holds every one-vs-rest model of a run together with
//! the feature normalization that was applied to the training data:
//!
//! ```json
//! { "Models": [ { "ModelX": [[..]], "ModelY": [..], "Type": 1, ... } ],
//!   "Normalization": [[min, max], ...] }
//! ```

use crate::core::{KernelSpec, KernelType, Result, SVMError};
use crate::model::TrainedModel;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable representation of a trained binary model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModelRecord {
    /// Support vectors, one per row
    pub model_x: Vec<Vec<f64>>,
    pub model_y: Vec<f64>,
    /// Integer kernel id
    #[serde(rename = "Type")]
    pub kernel_type: i32,
    pub kernel_param: Vec<f64>,
    pub alpha: Vec<f64>,
    /// Primal weights, empty for non-linear kernels
    #[serde(default)]
    pub w: Vec<f64>,
    pub b: f64,
    pub c: f64,
    pub tolerance: f64,
    pub category: i32,
    pub passes: usize,
    pub iterations: usize,
    pub max_iterations: usize,
    pub trained: bool,
}

impl From<&TrainedModel> for ModelRecord {
    fn from(model: &TrainedModel) -> Self {
        Self {
            model_x: model
                .model_x
                .rows()
                .into_iter()
                .map(|row| row.to_vec())
                .collect(),
            model_y: model.model_y.to_vec(),
            kernel_type: model.kernel_type.id(),
            kernel_param: model.kernel_param.clone(),
            alpha: model.alpha.to_vec(),
            w: model.w.to_vec(),
            b: model.b,
            c: model.c,
            tolerance: model.tolerance,
            category: model.category,
            passes: model.passes,
            iterations: model.iterations,
            max_iterations: model.max_iterations,
            trained: model.trained,
        }
    }
}

impl TryFrom<ModelRecord> for TrainedModel {
    type Error = SVMError;

    fn try_from(record: ModelRecord) -> Result<Self> {
        let kind = KernelType::try_from(record.kernel_type)?;

        let rows = record.model_x.len();
        let cols = match record.model_x.first() {
            Some(first) => first.len(),
            None => record.w.len(),
        };
        if let Some(row) = record.model_x.iter().find(|row| row.len() != cols) {
            return Err(SVMError::InvalidDataset(format!(
                "ModelX rows must all have {cols} columns, found one with {}",
                row.len()
            )));
        }

        let flat: Vec<f64> = record.model_x.into_iter().flatten().collect();
        let model_x = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|e| SVMError::InvalidDataset(e.to_string()))?;

        let mut model = TrainedModel::from_support_vectors(
            model_x,
            Array1::from(record.model_y),
            Array1::from(record.alpha),
            record.b,
            KernelSpec::new(kind, record.kernel_param),
            Array1::from(record.w),
        )?;

        model.c = record.c;
        model.tolerance = record.tolerance;
        model.category = record.category;
        model.passes = record.passes;
        model.iterations = record.iterations;
        model.max_iterations = record.max_iterations;
        model.trained = record.trained;

        Ok(model)
    }
}

/// Serializable set of one-vs-rest models plus feature normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClassifierFile {
    pub models: Vec<ModelRecord>,
    /// Per-feature `[min, max]`, empty when the data was not normalized
    #[serde(default)]
    pub normalization: Vec<[f64; 2]>,
}

impl ClassifierFile {
    /// Collect trained models and their normalization bounds
    pub fn from_models(models: &[TrainedModel], normalization: Vec<[f64; 2]>) -> Self {
        Self {
            models: models.iter().map(ModelRecord::from).collect(),
            normalization,
        }
    }

    /// Rebuild every stored model
    pub fn to_models(&self) -> Result<Vec<TrainedModel>> {
        self.models
            .iter()
            .cloned()
            .map(TrainedModel::try_from)
            .collect()
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| SVMError::SerializationError(e.to_string()))
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SVMError::SerializationError(e.to_string()))
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SVMError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let reader = BufReader::new(file);
        let classifier = serde_json::from_reader(reader)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(classifier)
    }

    /// Print a summary of the stored models
    pub fn print_summary(&self) {
        println!("=== SVM Classifier Summary ===");
        println!("Models: {}", self.models.len());
        if self.normalization.is_empty() {
            println!("Normalization: none");
        } else {
            println!("Normalization: {} features", self.normalization.len());
        }

        for record in &self.models {
            let kernel = KernelType::try_from(record.kernel_type)
                .map(|k| k.name().to_string())
                .unwrap_or_else(|_| format!("unknown ({})", record.kernel_type));

            println!();
            println!("Category: {}", record.category);
            println!("  Kernel: {} {:?}", kernel, record.kernel_param);
            println!("  Support Vectors: {}", record.model_x.len());
            println!("  Bias: {:.6}", record.b);
            println!("  C: {}", record.c);
            println!("  Tolerance: {}", record.tolerance);
            println!(
                "  Passes: {} (max {})",
                record.passes, record.max_iterations
            );
            println!("  Trained: {}", record.trained);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TrainingConfig;
    use crate::solver::TrainingSession;
    use ndarray::array;
    use tempfile::NamedTempFile;

    fn trained_model(kernel: KernelSpec) -> TrainedModel {
        let x = array![[0.0, 0.0], [0.0, 1.0], [5.0, 5.0], [5.0, 6.0]];
        let y = [0, 0, 1, 1];
        let config = TrainingConfig {
            max_passes: 10,
            ..TrainingConfig::default()
        };
        let mut session = TrainingSession::with_seed(17);
        session
            .train(&x.view(), &y, kernel, config)
            .expect("training failed")
            .clone()
    }

    #[test]
    fn test_record_field_names() {
        let model = trained_model(KernelSpec::linear());
        let value = serde_json::to_value(ModelRecord::from(&model)).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "ModelX",
            "ModelY",
            "Type",
            "KernelParam",
            "Alpha",
            "W",
            "B",
            "C",
            "Tolerance",
            "Category",
            "Passes",
            "Iterations",
            "MaxIterations",
            "Trained",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object.len(), 14);
        assert_eq!(object["Type"], 4);
    }

    #[test]
    fn test_record_round_trip() {
        for kernel in [KernelSpec::linear(), KernelSpec::gaussian(1.5)] {
            let model = trained_model(kernel);
            let restored = TrainedModel::try_from(ModelRecord::from(&model)).unwrap();
            assert_eq!(restored, model);
        }
    }

    #[test]
    fn test_file_round_trip_predicts_identically() -> Result<()> {
        let model = trained_model(KernelSpec::gaussian(2.0));
        let file = ClassifierFile::from_models(&[model.clone()], vec![[0.0, 5.0], [0.0, 6.0]]);

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        file.save_to_file(temp_file.path())?;
        let loaded = ClassifierFile::load_from_file(temp_file.path())?;

        assert_eq!(loaded.normalization, vec![[0.0, 5.0], [0.0, 6.0]]);
        let models = loaded.to_models()?;
        assert_eq!(models.len(), 1);

        let probe = array![[1.0, 1.0], [4.0, 5.5], [2.5, 2.5]];
        let expected = model.predict(&probe.view())?;
        let actual = models[0].predict(&probe.view())?;
        for (a, b) in expected.iter().zip(actual.iter()) {
            assert!((a - b).abs() < 1e-9);
        }

        Ok(())
    }

    #[test]
    fn test_parse_hand_written_file() -> Result<()> {
        let json = r#"{
            "Models": [{
                "ModelX": [[1.0, 0.0], [0.0, 1.0]],
                "ModelY": [1.0, -1.0],
                "Type": 0,
                "KernelParam": [1.0, 2.0],
                "Alpha": [0.5, 0.5],
                "W": [],
                "B": 0.1,
                "C": 2.0,
                "Tolerance": 0.01,
                "Category": 3,
                "Passes": 4,
                "Iterations": 4,
                "MaxIterations": 5,
                "Trained": true
            }]
        }"#;

        let file = ClassifierFile::from_json(json)?;
        assert!(file.normalization.is_empty());

        let model = &file.to_models()?[0];
        assert_eq!(model.kernel_type, KernelType::Polynomial);
        assert_eq!(model.category, 3);
        assert_eq!(model.c, 2.0);
        assert_eq!(model.max_iterations, 5);

        // 0.1 + 0.5 * (1 + 1)^2 - 0.5 * (0 + 1)^2
        let score = model.predict_one(array![1.0, 0.0].view())?;
        assert!((score - 1.6).abs() < 1e-12);

        let back = ClassifierFile::from_json(&file.to_json()?)?;
        assert_eq!(back, file);

        Ok(())
    }

    #[test]
    fn test_rejects_bad_records() {
        let model = trained_model(KernelSpec::linear());

        let mut record = ModelRecord::from(&model);
        record.kernel_type = 42;
        assert!(matches!(
            TrainedModel::try_from(record),
            Err(SVMError::UnsupportedKernel(42))
        ));

        let mut record = ModelRecord::from(&model);
        record.model_x.push(vec![1.0]);
        assert!(matches!(
            TrainedModel::try_from(record),
            Err(SVMError::InvalidDataset(_))
        ));

        let mut record = ModelRecord::from(&model);
        record.alpha.push(0.1);
        assert!(matches!(
            TrainedModel::try_from(record),
            Err(SVMError::DimensionMismatch { .. })
        ));

        assert!(matches!(
            ClassifierFile::from_json("{ not json"),
            Err(SVMError::SerializationError(_))
        ));
    }
}
