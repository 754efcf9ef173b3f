use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use compressor_advisor::audio::{self, AudioError};
use compressor_advisor::config::{self, Config};
use compressor_advisor::midi::{self, Arrangement};
use compressor_advisor::recommend::{
    ClassifierRecommender, GenerativeRecommender, OpenAiClient, RecommendError, Recommender,
};
use compressor_advisor::report;

/// Audio compressor advisor and waltz MIDI writer
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an audio file and recommend compressor settings
    Analyze(AnalyzeArgs),

    /// Write the waltz melody, harmony and bass parts as MIDI files
    Waltz(WaltzArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Ask a text-generation service
    Generative,
    /// Classify the metrics and pick a preset
    Classifier,
}

/// Analyze an audio file and recommend compressor settings
#[derive(Parser)]
struct AnalyzeArgs {
    /// Path to the input audio file (defaults to the configured input file)
    file: Option<PathBuf>,

    /// How settings are recommended
    #[arg(short, long, value_enum, default_value_t = Strategy::Generative)]
    strategy: Strategy,

    /// Classifier model file (classifier strategy, defaults to the bundled model)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Analyze at the file's own sample rate instead of resampling
    #[arg(long)]
    native_rate: bool,

    /// Only print the metrics
    #[arg(long)]
    metrics_only: bool,
}

/// Write the waltz parts as MIDI files
#[derive(Parser)]
struct WaltzArgs {
    /// Directory to write melody.mid, harmony.mid and bass.mid into
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "compressor_advisor=debug"
    } else {
        "compressor_advisor=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_recommender(
    args: &AnalyzeArgs,
    config: &Config,
) -> Result<Box<dyn Recommender>, RecommendError> {
    match args.strategy {
        Strategy::Generative => {
            let client = OpenAiClient::from_env(&config.generative)?;
            Ok(Box::new(GenerativeRecommender::new(client, &config.generative)))
        }
        Strategy::Classifier => {
            let mut classifier = config.classifier.clone();
            if let Some(path) = &args.model {
                classifier.model_path = Some(path.clone());
            }
            let model = classifier.load_model()?;
            Ok(Box::new(ClassifierRecommender::new(
                model,
                config.classifier.presets.clone(),
            )))
        }
    }
}

fn run_analyze_command(args: &AnalyzeArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let path = args
        .file
        .clone()
        .unwrap_or_else(|| config.common.input_file.clone());

    // Check if the audio file exists with a clear error message
    if !Path::new(&path).exists() {
        return Err(AudioError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Audio file not found: {}", path.display()),
        ))
        .into());
    }

    let mut analysis = config.analysis.clone();
    if args.native_rate {
        analysis.target_sample_rate = None;
    }

    let metrics = audio::analyze_file(&path, &analysis)?;

    if args.metrics_only {
        io::stdout().write_all(report::format_metrics(&metrics).as_bytes())?;
        return Ok(());
    }

    let recommender = build_recommender(args, config)?;
    info!("Recommending settings with the {} strategy", recommender.name());
    let recommendation = recommender.recommend(&metrics)?;

    io::stdout().write_all(report::format_report(&metrics, &recommendation).as_bytes())?;
    Ok(())
}

fn run_waltz_command(args: &WaltzArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut midi_config = config.midi.clone();
    if let Some(dir) = &args.out_dir {
        midi_config.output_dir = dir.clone();
    }

    let written = midi::write_arrangement(&Arrangement::waltz(), &midi_config)?;

    for path in &written {
        let summary = midi::read_summary(path)?;
        println!(
            "{}: {} track, {} notes, {:.0} BPM",
            path.display(),
            summary.track_count,
            summary.note_count,
            summary.tempo_bpm.unwrap_or_default()
        );
    }

    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::load_config(&cli.config)?;

    match &cli.command {
        Commands::Analyze(args) => run_analyze_command(args, &config)?,
        Commands::Waltz(args) => run_waltz_command(args, &config)?,
    }

    Ok(())
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(err) => {
            eprintln!("\nERROR: {}\n", err);
            if let Some(AudioError::Io(ref io_err)) = err.downcast_ref::<AudioError>() {
                if io_err.kind() == io::ErrorKind::NotFound {
                    eprintln!("Please check that:");
                    eprintln!("1. The file path is correct");
                    eprintln!("2. The file exists");
                    eprintln!("3. You have permission to read the file");
                }
            }
            match err.downcast_ref::<RecommendError>() {
                Some(RecommendError::MissingApiKey(_)) => {
                    eprintln!("Export an API key or use --strategy classifier.");
                }
                Some(RecommendError::ShapeMismatch { .. }) => {
                    eprintln!("The classifier must have one class per configured preset.");
                }
                _ => {}
            }
            process::exit(1);
        }
    }
}
