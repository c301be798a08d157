//! Integration tests for the smosvm library
//!
//! These tests verify end-to-end functionality across multiple modules
//! and validate real-world usage scenarios.

use ndarray::{array, Array2};
use smosvm::api::{OneVsRest, SVM};
use smosvm::core::{KernelSpec, KernelType, SVMError, SessionState, TrainingConfig};
use smosvm::data::DelimitedDataset;
use smosvm::model::TrainedModel;
use smosvm::persistence::ClassifierFile;
use smosvm::solver::TrainingSession;
use smosvm::utils::MinMaxNormalizer;
use std::io::Write;
use tempfile::NamedTempFile;

fn toy_set() -> (Array2<f64>, Vec<i32>) {
    (
        array![[0.0, 0.0], [0.0, 1.0], [5.0, 5.0], [5.0, 6.0]],
        vec![0, 0, 1, 1],
    )
}

fn toy_config() -> TrainingConfig {
    TrainingConfig {
        c: 1.0,
        tolerance: 1e-3,
        max_passes: 20,
        category: 1,
        seed: None,
    }
}

/// Two interleaved clusters per class along a diagonal
fn ring_set() -> (Array2<f64>, Vec<i32>) {
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for i in 0..12 {
        let angle = i as f64 * std::f64::consts::PI / 6.0;
        rows.push([0.5 * angle.cos(), 0.5 * angle.sin()]);
        labels.push(1);
        rows.push([2.0 * angle.cos(), 2.0 * angle.sin()]);
        labels.push(2);
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    (
        Array2::from_shape_vec((rows.len(), 2), flat).unwrap(),
        labels,
    )
}

/// Stepping to completion then generating separates the toy set
#[test]
fn test_step_until_done_separates_toy_set() {
    let (x, y) = toy_set();
    let mut separated = 0;

    for seed in 0..20u64 {
        let mut session = TrainingSession::with_seed(seed);
        session
            .setup(&x.view(), &y, KernelSpec::linear(), toy_config())
            .expect("Setup should succeed");
        assert_eq!(session.state(), SessionState::Ready);

        let mut steps = 0;
        while !session.step().expect("Step should succeed") {
            steps += 1;
            assert!(steps < 10_000, "Training did not halt");
        }

        let model = session.generate().expect("Generate should succeed");
        assert!(model.n_support_vectors() > 0, "seed {seed}");
        if model.classify(&x.view(), 0.0).unwrap() == vec![0, 0, 1, 1] {
            separated += 1;
        }
    }

    // A frozen bias can leave the odd seed misclassified
    assert!(separated >= 15, "only {separated} of 20 seeds separated");
}

/// Linear predictions equal X·W + B exactly
#[test]
fn test_linear_prediction_matches_primal_weights() {
    let (x, y) = toy_set();
    let model = SVM::new()
        .with_max_passes(20)
        .with_seed(11)
        .train(&x.view(), &y)
        .expect("Training should succeed");

    assert_eq!(model.w.len(), 2);
    let scores = model.predict(&x.view()).unwrap();
    assert_eq!(scores, x.dot(&model.w) + model.b);
}

/// The primal identity holds for non-default linear parameters too
#[test]
fn test_linear_prediction_with_offset_params_matches_primal_weights() {
    let (x, y) = toy_set();
    let model = SVM::new()
        .with_kernel(KernelSpec::new(KernelType::Linear, vec![2.0, 0.5]))
        .with_max_passes(20)
        .with_seed(42)
        .train(&x.view(), &y)
        .expect("Training should succeed");

    let scores = model.predict(&x.view()).unwrap();
    assert_eq!(scores, x.dot(&model.w) + model.b);
}

/// A fixed seed pins the linear toy-set result exactly
#[test]
fn test_linear_toy_set_with_pinned_seed() {
    let (x, y) = toy_set();
    let mut session = TrainingSession::with_seed(42);
    let model = session
        .train(&x.view(), &y, KernelSpec::linear(), toy_config())
        .expect("Training should succeed");

    assert_eq!(model.classify(&x.view(), 0.0).unwrap(), vec![0, 0, 1, 1]);
}

/// Identical seeds give bit-identical alpha trajectories and models
#[test]
fn test_seeded_training_is_deterministic() {
    let (x, y) = ring_set();
    let kernel = KernelSpec::gaussian(0.8);
    let config = TrainingConfig {
        max_passes: 5,
        category: 2,
        ..TrainingConfig::default()
    };

    let mut first = TrainingSession::with_seed(99);
    let mut second = TrainingSession::with_seed(99);
    first
        .setup(&x.view(), &y, kernel.clone(), config.clone())
        .unwrap();
    second.setup(&x.view(), &y, kernel, config).unwrap();

    loop {
        let done_first = first.step().unwrap();
        let done_second = second.step().unwrap();
        assert_eq!(first.alpha().unwrap(), second.alpha().unwrap());
        assert_eq!(first.bias(), second.bias());
        assert_eq!(done_first, done_second);
        if done_first {
            break;
        }
    }

    assert_eq!(first.generate().unwrap(), second.generate().unwrap());
}

/// The box constraint holds after every sweep for every kernel family
#[test]
fn test_box_constraint_for_every_kernel() {
    let (x, y) = ring_set();
    let c = 0.7;

    for kind in KernelType::ALL {
        let config = TrainingConfig {
            c,
            max_passes: 3,
            seed: Some(5),
            ..TrainingConfig::default()
        };
        let mut session = TrainingSession::from_config_seed(config.seed);
        session
            .setup(&x.view(), &y, KernelSpec::with_defaults(kind), config)
            .unwrap();

        for _ in 0..100 {
            let done = session.step().unwrap();
            assert!(
                session
                    .alpha()
                    .unwrap()
                    .iter()
                    .all(|&a| (0.0..=c).contains(&a)),
                "{kind}: alpha out of [0, C]"
            );
            if done {
                break;
            }
        }
    }
}

/// Gaussian one-vs-rest separates concentric rings
#[test]
fn test_one_vs_rest_on_rings() {
    let (x, y) = ring_set();

    let classifier = SVM::new()
        .with_kernel(KernelSpec::gaussian(0.5))
        .with_c(10.0)
        .with_max_passes(10)
        .with_seed(3)
        .train_one_vs_rest(&x.view(), &y)
        .expect("Training should succeed");

    assert_eq!(classifier.categories(), vec![1, 2]);
    let accuracy = classifier.accuracy(&x.view(), &y).unwrap();
    assert!(accuracy >= 0.9, "Accuracy too low: {accuracy}");
}

/// Save, reload and predict with every model of a classifier file
#[test]
fn test_classifier_file_round_trip() {
    let (x, y) = ring_set();
    let (normalizer, scaled) = MinMaxNormalizer::fit_transform(&x.view()).unwrap();

    let classifier = SVM::new()
        .with_kernel(KernelSpec::new(KernelType::Polynomial, vec![1.0, 2.0]))
        .with_max_passes(5)
        .with_seed(8)
        .train_one_vs_rest(&scaled.view(), &y)
        .unwrap();

    let file = ClassifierFile::from_models(classifier.models(), normalizer.bounds().to_vec());
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file
        .write_all(file.to_json().unwrap().as_bytes())
        .expect("Failed to write");
    temp_file.flush().expect("Failed to flush");

    let loaded = ClassifierFile::load_from_file(temp_file.path()).unwrap();
    let restored = OneVsRest::new(loaded.to_models().unwrap());
    let restored_normalizer = MinMaxNormalizer::from_bounds(loaded.normalization.clone());
    let rescaled = restored_normalizer.transform(&x.view()).unwrap();

    for (original, reloaded) in classifier.models().iter().zip(restored.models()) {
        assert_eq!(original.category, reloaded.category);
        assert_eq!(original.passes, reloaded.passes);
        let a = original.predict(&scaled.view()).unwrap();
        let b = reloaded.predict(&rescaled.view()).unwrap();
        for (p, q) in a.iter().zip(b.iter()) {
            assert!((p - q).abs() < 1e-9, "{p} vs {q}");
        }
    }
}

/// Train directly from a delimited file with a header row
#[test]
fn test_workflow_from_delimited_file() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(temp_file, "x\ty\tclass").expect("Failed to write");
    writeln!(temp_file, "0.0\t0.0\t1").expect("Failed to write");
    writeln!(temp_file, "0.0\t1.0\t1").expect("Failed to write");
    writeln!(temp_file, "5.0\t5.0\t2").expect("Failed to write");
    writeln!(temp_file, "5.0\t6.0\t2").expect("Failed to write");
    temp_file.flush().expect("Failed to flush");

    let dataset = DelimitedDataset::from_file(temp_file.path(), '\t').unwrap();
    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.categories(), vec![1, 2]);

    let classifier = SVM::new()
        .with_kernel(KernelSpec::gaussian(1.0))
        .with_max_passes(20)
        .with_seed(2)
        .train_from_file(temp_file.path(), '\t')
        .unwrap();

    assert_eq!(
        classifier.classify(&dataset.features()).unwrap(),
        vec![1, 1, 2, 2]
    );
}

/// A model rebuilt without training behaves like the trained one
#[test]
fn test_direct_constructor_matches_trained_model() {
    let (x, y) = toy_set();
    let trained = SVM::new()
        .with_kernel(KernelSpec::new(KernelType::Radial, vec![2.0]))
        .with_max_passes(10)
        .with_seed(4)
        .train(&x.view(), &y)
        .unwrap();

    let rebuilt = TrainedModel::from_support_vectors(
        trained.model_x.clone(),
        trained.model_y.clone(),
        trained.alpha.clone(),
        trained.b,
        trained.kernel(),
        trained.w.clone(),
    )
    .unwrap();

    assert_eq!(
        rebuilt.predict(&x.view()).unwrap(),
        trained.predict(&x.view()).unwrap()
    );
}

/// Caller contract violations fail fast
#[test]
fn test_error_handling() {
    let (x, _) = toy_set();
    let mut session = TrainingSession::with_seed(0);

    assert!(matches!(
        session.setup(&x.view(), &[0, 1], KernelSpec::linear(), toy_config()),
        Err(SVMError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        session.step(),
        Err(SVMError::SessionNotInitialized)
    ));
    assert!(matches!(
        KernelType::try_from(17),
        Err(SVMError::UnsupportedKernel(17))
    ));

    let (x, y) = toy_set();
    let model = SVM::new()
        .with_max_passes(2)
        .with_seed(0)
        .train(&x.view(), &y)
        .unwrap();
    let wide = array![[1.0, 2.0, 3.0]];
    assert!(matches!(
        model.predict(&wide.view()),
        Err(SVMError::DimensionMismatch { .. })
    ));
}
