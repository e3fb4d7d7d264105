// Batch module - analyze a directory of tracks and report on the whole set
//
// Flow: discover files → analyze each (failures logged and skipped) →
// write per-track artifacts → aggregate → write reports.
//
// Module organization:
// - summary: BatchSummary aggregation (histograms, stats, rankings, genre groups)
// - report: text renderings of the summary and genre groups
// - export: CSV export
// - artifacts: filesystem layout for everything written

pub mod artifacts;
pub mod export;
pub mod report;
pub mod summary;

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::Analyzer;
use crate::config::BatchConfig;
use crate::describe::DescriptionSet;
use crate::error::{
    log_analysis_error, log_batch_error, log_render_error, AnalysisError, BatchError, ErrorCode,
    RenderError,
};
use crate::record::{AnalysisRecord, DATE_FORMAT};

pub use summary::BatchSummary;

/// Result of a batch run
#[derive(Debug)]
pub struct BatchOutcome {
    /// Successfully analysed records in processing order
    pub records: Vec<AnalysisRecord>,
    /// Files that failed analysis or artifact writing
    pub failed: Vec<PathBuf>,
    pub summary: BatchSummary,
    /// Timestamp printed in the summary report header
    pub generated: String,
}

impl BatchOutcome {
    pub fn processed(&self) -> usize {
        self.records.len()
    }
}

/// List supported audio files directly inside `dir`, sorted by file name
pub fn discover_audio_files(dir: &Path, config: &BatchConfig) -> Result<Vec<PathBuf>, BatchError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| config.is_supported_extension(ext))
                .unwrap_or(false)
        })
        .collect();

    if files.is_empty() {
        return Err(BatchError::NoAudioFiles {
            dir: dir.display().to_string(),
        });
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Runs the analyzer over a directory
pub struct BatchRunner<'a> {
    analyzer: &'a Analyzer,
    config: BatchConfig,
}

impl<'a> BatchRunner<'a> {
    pub fn new(analyzer: &'a Analyzer, config: BatchConfig) -> Self {
        Self { analyzer, config }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("Analyzing tracks [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    }

    /// Analyze every supported file in `input_dir` and write all outputs
    ///
    /// # Arguments
    /// * `input_dir` - Directory scanned (non-recursively) for audio files
    /// * `output_dir` - Created if missing
    ///
    /// # Returns
    /// * `Ok(BatchOutcome)` - at least one file was analysed
    /// * `Err(BatchError)` - no files, every file failed, or report writing failed
    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchOutcome, BatchError> {
        let files = discover_audio_files(input_dir, &self.config)?;
        log::info!("[Batch] Found {} audio files in {}", files.len(), input_dir.display());

        let tracks_dir = output_dir.join(artifacts::TRACKS_DIR);
        let bar = self.progress_bar(files.len());
        let mut records = Vec::with_capacity(files.len());
        let mut failed = Vec::new();

        for path in files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            bar.set_message(name.clone());

            match self.process_file(&path, &tracks_dir) {
                Ok(record) => records.push(record),
                Err(failure) => {
                    failure.log(&name);
                    failed.push(path);
                }
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        let summary = BatchSummary::from_records(&records)?;
        let generated = chrono::Local::now().format(DATE_FORMAT).to_string();
        artifacts::write_batch_reports(output_dir, &summary, &records, &generated)?;

        log::info!(
            "[Batch] Complete: {} processed, {} failed, results in {}",
            records.len(),
            failed.len(),
            output_dir.display()
        );

        Ok(BatchOutcome {
            records,
            failed,
            summary,
            generated,
        })
    }

    fn process_file(&self, path: &Path, tracks_dir: &Path) -> Result<AnalysisRecord, FileFailure> {
        let record = self.analyzer.analyze_file(path).map_err(FileFailure::Analysis)?;
        let descriptions = DescriptionSet::render_checked(&record).map_err(FileFailure::Render)?;
        artifacts::write_track_artifacts(tracks_dir, &record, &descriptions)
            .map_err(FileFailure::Artifacts)?;
        Ok(record)
    }
}

/// Why a single file was skipped
#[derive(Debug)]
enum FileFailure {
    Analysis(AnalysisError),
    /// Record failed its invariants; a defect, never bad input
    Render(RenderError),
    Artifacts(BatchError),
}

impl FileFailure {
    fn log(&self, context: &str) {
        match self {
            FileFailure::Analysis(err) => log_analysis_error(err, context),
            FileFailure::Render(err) => log_render_error(err, context),
            FileFailure::Artifacts(err) => log_batch_error(err, context),
        }
    }
}

impl ErrorCode for FileFailure {
    fn code(&self) -> i32 {
        match self {
            FileFailure::Analysis(err) => err.code(),
            FileFailure::Render(err) => err.code(),
            FileFailure::Artifacts(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        match self {
            FileFailure::Analysis(err) => err.message(),
            FileFailure::Render(err) => err.message(),
            FileFailure::Artifacts(err) => err.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::testing::signals::{noise, sine, write_wav};

    fn quiet_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.batch.show_progress = false;
        config
    }

    #[test]
    fn test_discovery_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.WAV", "a.mp3", "notes.txt", "c.flac"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.wav")).unwrap();

        let files = discover_audio_files(dir.path(), &BatchConfig::default()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mp3", "b.WAV", "c.flac"]);
    }

    #[test]
    fn test_empty_directory_has_no_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_audio_files(dir.path(), &BatchConfig::default()).unwrap_err();
        assert!(matches!(err, BatchError::NoAudioFiles { .. }));
    }

    #[test]
    fn test_run_skips_failures_and_writes_outputs() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_wav(&input.path().join("tone.wav"), &sine(440.0, 22050, 2.0, 0.4), 22050).unwrap();
        write_wav(&input.path().join("hiss.wav"), &noise(22050, 2.0, 0.3, 3), 22050).unwrap();
        fs::write(input.path().join("broken.mp3"), b"not really an mp3").unwrap();

        let config = quiet_config();
        let analyzer = Analyzer::with_heuristics(&config);
        let outcome = BatchRunner::new(&analyzer, config.batch.clone())
            .run(input.path(), output.path())
            .unwrap();

        assert_eq!(outcome.processed(), 2);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.summary.total_tracks, 2);
        let written = fs::read_to_string(output.path().join(artifacts::SUMMARY_FILE)).unwrap();
        assert_eq!(written, report::summary_report(&outcome.summary, &outcome.generated));

        let out = output.path();
        assert!(out.join(artifacts::SUMMARY_FILE).is_file());
        assert!(out.join(artifacts::CSV_FILE).is_file());
        assert!(out.join(artifacts::TRACKS_DIR).join("tone_analysis.json").is_file());
        assert!(out.join(artifacts::TRACKS_DIR).join("hiss_social.txt").is_file());
        assert!(!out.join(artifacts::TRACKS_DIR).join("broken_analysis.json").exists());
    }

    #[test]
    fn test_render_failure_keeps_render_code() {
        let failure = FileFailure::Render(RenderError::InvariantViolation {
            field: "energy".to_string(),
        });
        assert_eq!(failure.code(), crate::error::RenderErrorCodes::INVARIANT_VIOLATION);
        assert!(failure.message().contains("energy"));
        assert!(!failure.message().contains("CSV"));
        failure.log("bad.wav");
    }

    #[test]
    fn test_run_with_only_failures_is_empty_batch() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("junk.wav"), b"RIFF").unwrap();

        let config = quiet_config();
        let analyzer = Analyzer::with_heuristics(&config);
        let err = BatchRunner::new(&analyzer, config.batch.clone())
            .run(input.path(), output.path())
            .unwrap_err();
        assert_eq!(err, BatchError::EmptyBatch);
    }
}
