use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use music_describer::analysis::Analyzer;
use music_describer::batch::artifacts::write_track_artifacts;
use music_describer::batch::report::summary_report;
use music_describer::batch::BatchRunner;
use music_describer::config::AppConfig;
use music_describer::describe::DescriptionSet;
use music_describer::record::AnalysisRecord;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "music_describer",
    about = "Analyze audio tracks and generate text descriptions"
)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one audio file and write its record and descriptions
    Analyze {
        file: PathBuf,
        /// Defaults to the configured single-file output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Analyze every audio file in a directory and write batch reports
    Batch {
        dir: PathBuf,
        /// Defaults to the configured batch output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Serve the upload/download HTTP interface
    #[cfg(feature = "http")]
    Serve {
        /// Defaults to the configured bind address
        #[arg(long)]
        addr: Option<std::net::SocketAddr>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli
        .config
        .as_ref()
        .map(AppConfig::load_from_file)
        .unwrap_or_default();

    match cli.command {
        Commands::Analyze { file, output_dir } => {
            let output_dir =
                output_dir.unwrap_or_else(|| PathBuf::from(&config.batch.single_output_dir));
            run_analyze(&config, &file, &output_dir)
        }
        Commands::Batch { dir, output_dir } => {
            let output_dir =
                output_dir.unwrap_or_else(|| PathBuf::from(&config.batch.batch_output_dir));
            run_batch(&config, &dir, &output_dir)
        }
        #[cfg(feature = "http")]
        Commands::Serve { addr } => run_serve(&config, addr),
    }
}

fn run_analyze(config: &AppConfig, file: &Path, output_dir: &Path) -> Result<()> {
    tracing::info!(file = %file.display(), output_dir = %output_dir.display(), "analyze");
    let analyzer = Analyzer::with_heuristics(config);
    let record = analyzer
        .analyze_file(file)
        .with_context(|| format!("analyzing {}", file.display()))?;
    let descriptions = DescriptionSet::render_checked(&record)?;

    let written = write_track_artifacts(output_dir, &record, &descriptions)
        .with_context(|| format!("writing results to {}", output_dir.display()))?;
    for path in &written {
        println!("✓ Saved {}", path.display());
    }

    print_summary(&record);
    Ok(())
}

fn print_summary(record: &AnalysisRecord) {
    let rule = "=".repeat(50);
    println!("\n{rule}");
    println!("ANALYSIS SUMMARY");
    println!("{rule}");
    println!("File: {}", record.file_name);
    println!("Genre: {} - {}", record.genre, record.sub_genre);
    println!("Mood: {}", record.mood);
    println!("Tempo: {:.1} BPM | Key: {}", record.tempo, record.key);
    println!("Duration: {}", record.duration);
    println!("Instruments: {}", record.instruments.join(", "));
    println!(
        "\nEnergy: {}% | Danceability: {}% | Valence: {}%",
        record.energy, record.danceability, record.valence
    );
    println!("{rule}");
}

fn run_batch(config: &AppConfig, dir: &Path, output_dir: &Path) -> Result<()> {
    tracing::info!(dir = %dir.display(), output_dir = %output_dir.display(), "batch");
    let analyzer = Analyzer::with_heuristics(config);
    let outcome = BatchRunner::new(&analyzer, config.batch.clone())
        .run(dir, output_dir)
        .with_context(|| format!("batch processing {}", dir.display()))?;

    println!("{}", summary_report(&outcome.summary, &outcome.generated));
    println!(
        "Processed {} tracks ({} failed). Results saved to {}",
        outcome.processed(),
        outcome.failed.len(),
        output_dir.display()
    );
    for failed in &outcome.failed {
        println!("  skipped: {}", failed.display());
    }
    Ok(())
}

#[cfg(feature = "http")]
fn run_serve(config: &AppConfig, addr: Option<std::net::SocketAddr>) -> Result<()> {
    let addr = match addr {
        Some(addr) => addr,
        None => config
            .server
            .bind_addr
            .parse()
            .with_context(|| format!("parsing bind address {}", config.server.bind_addr))?,
    };

    tracing::info!(%addr, "serve");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    runtime.block_on(music_describer::http::serve(config, addr))
}
