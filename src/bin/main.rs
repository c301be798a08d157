//! smosvm Command Line Interface
//!
//! A command-line interface for training one-vs-rest SVM classifiers on
//! delimited text data, classifying new data, and evaluating saved models.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{debug, error, info, warn};
use ndarray::{s, Array2};
use smosvm::api::{EvaluationMetrics, OneVsRest};
use smosvm::core::{KernelSpec, KernelType, Result, SVMError, TrainingConfig};
use smosvm::data::DelimitedDataset;
use smosvm::model::TrainedModel;
use smosvm::persistence::ClassifierFile;
use smosvm::solver::TrainingSession;
use smosvm::utils::MinMaxNormalizer;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

/// Sweeps between progress reports while training
const PROGRESS_INTERVAL: usize = 50;

#[derive(Parser)]
#[command(name = "smosvm")]
#[command(about = "Kernel SVM classifiers trained with simplified SMO")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "smosvm contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train one binary model per category
    Train(TrainArgs),
    /// Label data with a trained classifier
    Classify(ClassifyArgs),
    /// Evaluate a classifier on labelled data
    Evaluate(EvaluateArgs),
    /// Display classifier information
    Info(InfoArgs),
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file, last column is the category
    #[arg(long)]
    data: PathBuf,

    /// Output classifier file
    #[arg(short, long)]
    output: PathBuf,

    /// Field delimiter (default: comma for .csv files, tab otherwise)
    #[arg(long)]
    delimiter: Option<CliDelimiter>,

    /// Kernel family
    #[arg(short, long, default_value = "linear")]
    kernel: CliKernel,

    /// Kernel parameters in order, e.g. --param 0.5 or --param 1,0
    #[arg(long = "param", value_delimiter = ',', allow_hyphen_values = true)]
    params: Vec<f64>,

    /// Regularization parameter C
    #[arg(short = 'C', long, default_value = "1.0")]
    c: f64,

    /// KKT tolerance
    #[arg(short, long, default_value = "0.001")]
    tolerance: f64,

    /// Sweeps without change before a model is done
    #[arg(short = 'p', long, default_value = "5")]
    max_passes: usize,

    /// Categories to train (default: every positive label in the data)
    #[arg(long = "category")]
    categories: Vec<i32>,

    /// Scale features to [0, 1] before training
    #[arg(short, long)]
    normalize: bool,

    /// Seed for reproducible training
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliKernel {
    Polynomial,
    Gaussian,
    Radial,
    Sigmoid,
    Linear,
    Fourier,
}

impl From<CliKernel> for KernelType {
    fn from(kernel: CliKernel) -> Self {
        match kernel {
            CliKernel::Polynomial => KernelType::Polynomial,
            CliKernel::Gaussian => KernelType::Gaussian,
            CliKernel::Radial => KernelType::Radial,
            CliKernel::Sigmoid => KernelType::Sigmoid,
            CliKernel::Linear => KernelType::Linear,
            CliKernel::Fourier => KernelType::Fourier,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliDelimiter {
    Tab,
    Comma,
    Space,
    Pipe,
    Colon,
    Semicolon,
    Slash,
    Backslash,
}

impl From<CliDelimiter> for char {
    fn from(delimiter: CliDelimiter) -> Self {
        match delimiter {
            CliDelimiter::Tab => '\t',
            CliDelimiter::Comma => ',',
            CliDelimiter::Space => ' ',
            CliDelimiter::Pipe => '|',
            CliDelimiter::Colon => ':',
            CliDelimiter::Semicolon => ';',
            CliDelimiter::Slash => '/',
            CliDelimiter::Backslash => '\\',
        }
    }
}

#[derive(Args)]
struct ClassifyArgs {
    /// Trained classifier file
    #[arg(short, long)]
    model: PathBuf,

    /// Input data file
    #[arg(long)]
    data: PathBuf,

    /// Field delimiter (default: comma for .csv files, tab otherwise)
    #[arg(long)]
    delimiter: Option<CliDelimiter>,

    /// Output labels file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append the raw score of every model after the label
    #[arg(long)]
    scores: bool,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained classifier file
    #[arg(short, long)]
    model: PathBuf,

    /// Labelled test data file
    #[arg(long)]
    data: PathBuf,

    /// Field delimiter (default: comma for .csv files, tab otherwise)
    #[arg(long)]
    delimiter: Option<CliDelimiter>,

    /// Show detailed metrics
    #[arg(long)]
    detailed: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Classifier file
    model: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Classify(args) => classify_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Info(args) => info_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    let delimiter = resolve_delimiter(args.delimiter, &args.data);
    info!("Loading training data from: {:?}", args.data);
    let mut dataset = DelimitedDataset::from_file(&args.data, delimiter)?;
    info!(
        "Loaded {} examples with {} features",
        dataset.len(),
        dataset.n_features()
    );

    let normalization = if args.normalize {
        let normalizer = MinMaxNormalizer::fit(&dataset.features())?;
        normalizer.transform_inplace(dataset.features_mut())?;
        info!("Normalized {} features to [0, 1]", normalizer.n_features());
        normalizer.bounds().to_vec()
    } else {
        Vec::new()
    };

    let categories = if args.categories.is_empty() {
        dataset.categories()
    } else {
        args.categories.clone()
    };
    if categories.is_empty() {
        return Err(SVMError::InvalidDataset(
            "No positive category labels found".to_string(),
        ));
    }

    let kind = KernelType::from(args.kernel);
    let kernel = if args.params.is_empty() {
        KernelSpec::with_defaults(kind)
    } else {
        KernelSpec::new(kind, args.params.clone())
    };
    info!(
        "Kernel: {} {:?}, C={}, tolerance={}, max passes={}",
        kind, kernel.params, args.c, args.tolerance, args.max_passes
    );

    let mut sessions = Vec::with_capacity(categories.len());
    for &category in &categories {
        let config = TrainingConfig {
            c: args.c,
            tolerance: args.tolerance,
            max_passes: args.max_passes,
            category,
            seed: args.seed,
        };
        let mut session = TrainingSession::from_config_seed(config.seed);
        session.setup(&dataset.features(), dataset.labels(), kernel.clone(), config)?;
        sessions.push(session);
    }

    let models = train_round_robin(&mut sessions)?;

    let file = ClassifierFile::from_models(&models, normalization);
    file.save_to_file(&args.output)?;
    info!("Classifier saved to: {:?}", args.output);

    let classifier = OneVsRest::new(models);
    let accuracy = classifier.accuracy(&dataset.features(), dataset.labels())?;
    info!("Training accuracy: {:.2}%", accuracy * 100.0);

    Ok(())
}

/// Step every session in turn until all of them are done, then generate
fn train_round_robin(sessions: &mut [TrainingSession]) -> Result<Vec<TrainedModel>> {
    let mut done = vec![false; sessions.len()];
    let mut round = 0usize;

    while done.iter().any(|d| !d) {
        round += 1;
        for (session, finished) in sessions.iter_mut().zip(done.iter_mut()) {
            if *finished {
                continue;
            }
            if session.step()? {
                *finished = true;
                info!(
                    "Category {} done after {} sweeps",
                    session.category(),
                    session.sweeps()
                );
            }
        }

        if round % PROGRESS_INTERVAL == 0 {
            let remaining = done.iter().filter(|d| !**d).count();
            info!("Round {round}: {remaining} models still training");
        }
    }

    sessions
        .iter_mut()
        .map(|session| session.generate().map(TrainedModel::clone))
        .collect()
}

fn classify_command(args: ClassifyArgs) -> Result<()> {
    info!("Loading classifier from: {:?}", args.model);
    let file = ClassifierFile::load_from_file(&args.model)?;
    let models = file.to_models()?;
    if models.is_empty() {
        return Err(SVMError::InvalidParameter(
            "Classifier file contains no models".to_string(),
        ));
    }

    let delimiter = resolve_delimiter(args.delimiter, &args.data);
    info!("Loading data from: {:?}", args.data);
    let dataset = DelimitedDataset::from_file_unlabeled(&args.data, delimiter)?;
    let x = prepare_features(&dataset, &models, &file.normalization)?;

    let classifier = OneVsRest::new(models);
    let labels = classifier.classify(&x.view())?;
    let scores = if args.scores {
        Some(classifier.scores(&x.view())?)
    } else {
        None
    };

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    for (i, label) in labels.iter().enumerate() {
        match &scores {
            Some(scores) => {
                let row: Vec<String> = scores.row(i).iter().map(|s| format!("{s:.6}")).collect();
                writeln!(writer, "{label}\t{}", row.join("\t"))?;
            }
            None => writeln!(writer, "{label}")?,
        }
    }
    writer.flush()?;

    if let Some(path) = &args.output {
        info!("Labels saved to: {path:?}");
    }

    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    info!("Loading classifier from: {:?}", args.model);
    let file = ClassifierFile::load_from_file(&args.model)?;
    let models = file.to_models()?;

    let delimiter = resolve_delimiter(args.delimiter, &args.data);
    info!("Loading test data from: {:?}", args.data);
    let dataset = DelimitedDataset::from_file(&args.data, delimiter)?;
    let x = prepare_features(&dataset, &models, &file.normalization)?;
    let labels = dataset.labels();

    println!("=== Model Evaluation ===");
    println!("Examples: {}", labels.len());

    for model in &models {
        let predicted = model.classify(&x.view(), 0.0)?;
        let errors = TrainedModel::test(labels, &predicted, model.category)?;
        let metrics = EvaluationMetrics::from_labels(labels, &predicted, model.category)?;

        println!();
        println!("Category {}:", model.category);
        println!("  Errors:   {errors}");
        println!("  Accuracy: {:.2}%", metrics.accuracy() * 100.0);

        if args.detailed {
            println!("  True Positives:  {}", metrics.true_positives);
            println!("  True Negatives:  {}", metrics.true_negatives);
            println!("  False Positives: {}", metrics.false_positives);
            println!("  False Negatives: {}", metrics.false_negatives);
            println!("  Precision:       {:.4}", metrics.precision());
            println!("  Recall:          {:.4}", metrics.recall());
            println!("  F1 Score:        {:.4}", metrics.f1_score());
            println!("  Specificity:     {:.4}", metrics.specificity());
        }
    }

    let classifier = OneVsRest::new(models);
    let accuracy = classifier.accuracy(&x.view(), labels)?;
    println!();
    println!("Overall accuracy: {:.2}%", accuracy * 100.0);

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading classifier from: {:?}", args.model);
    let file = ClassifierFile::load_from_file(&args.model)?;
    file.print_summary();
    Ok(())
}

/// Drop a trailing label column if present and apply stored normalization
fn prepare_features(
    dataset: &DelimitedDataset,
    models: &[TrainedModel],
    normalization: &[[f64; 2]],
) -> Result<Array2<f64>> {
    let expected = models
        .iter()
        .find_map(TrainedModel::n_features)
        .unwrap_or_else(|| dataset.n_features());

    let features = dataset.features();
    let mut x = if features.ncols() == expected + 1 && !dataset.is_labelled() {
        debug!("Ignoring trailing label column");
        features.slice(s![.., ..expected]).to_owned()
    } else {
        features.to_owned()
    };

    if !normalization.is_empty() {
        MinMaxNormalizer::from_bounds(normalization.to_vec()).transform_inplace(&mut x)?;
    }

    Ok(x)
}

fn resolve_delimiter(delimiter: Option<CliDelimiter>, path: &Path) -> char {
    if let Some(delimiter) = delimiter {
        return delimiter.into();
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => ',',
        Some("tsv") | Some("txt") => '\t',
        _ => {
            warn!("Unknown file extension, assuming tab-delimited data");
            '\t'
        }
    }
}
