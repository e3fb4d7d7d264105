// Analysis module - per-file description pipeline
//
// Pipeline: AudioLoader → resample to 22050 Hz → FeatureExtractor →
// TrackClassifier → RecordBuilder
//
// The classifier is an explicitly constructed strategy passed in by the
// caller; HeuristicClassifier is the default. A failure anywhere before the
// record is built aborts that file and no partial record is produced.

use std::path::Path;

use crate::audio::{resample_to_analysis_rate, AudioLoader, ANALYSIS_SAMPLE_RATE};
use crate::config::{AnalysisConfig, AppConfig};
use crate::error::AnalysisError;
use crate::record::{AnalysisRecord, RecordBuilder};

pub mod classifier;
pub mod features;
pub mod rules;

use classifier::{HeuristicClassifier, TrackClassifier};
use features::FeatureExtractor;

/// Runs the complete analysis for one track at a time
pub struct Analyzer {
    loader: AudioLoader,
    config: AnalysisConfig,
    classifier: Box<dyn TrackClassifier>,
}

impl Analyzer {
    /// Create an analyzer with an explicit classifier
    ///
    /// # Arguments
    /// * `config` - Application configuration (analysis window, formats)
    /// * `classifier` - Strategy mapping features to labels
    pub fn new(config: &AppConfig, classifier: Box<dyn TrackClassifier>) -> Self {
        Self {
            loader: AudioLoader::new(config.analysis.max_duration_secs, config.batch.clone()),
            config: config.analysis.clone(),
            classifier,
        }
    }

    /// Create an analyzer using the rule-based classifier
    pub fn with_heuristics(config: &AppConfig) -> Self {
        Self::new(config, Box::new(HeuristicClassifier::new()))
    }

    /// Analyze an audio file on disk
    ///
    /// # Returns
    /// * `Ok(AnalysisRecord)` - complete record
    /// * `Err(AnalysisError)` - file missing, unsupported, undecodable or empty
    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisRecord, AnalysisError> {
        log::info!("[Analyzer] Analyzing {}", path.display());

        let audio = self.loader.load(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.analyze_samples(file_name, &audio.samples, audio.sample_rate)
    }

    /// Analyze already-decoded mono samples
    ///
    /// Samples at any rate other than 22050 Hz are resampled first, so the
    /// same content yields the same labels whatever rate it was stored at.
    ///
    /// # Arguments
    /// * `file_name` - Name recorded in the result
    /// * `samples` - Mono samples in [-1.0, 1.0]
    /// * `sample_rate` - Sample rate of `samples` in Hz
    ///
    /// # Returns
    /// * `Ok(AnalysisRecord)` - record whose duration is the length of `samples`
    /// * `Err(AnalysisError::ResampleFailed)` - sample rate could not be converted
    pub fn analyze_samples(
        &self,
        file_name: impl Into<String>,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<AnalysisRecord, AnalysisError> {
        let duration_secs = if sample_rate == 0 {
            0.0
        } else {
            samples.len() as f64 / sample_rate as f64
        };
        let resampled = resample_to_analysis_rate(samples, sample_rate)?;

        let extractor = FeatureExtractor::new(ANALYSIS_SAMPLE_RATE, &self.config);
        let features = extractor.extract(&resampled);
        let classification = self.classifier.classify(&features);

        let record = RecordBuilder::new(file_name)
            .duration_secs(duration_secs)
            .build(classification);

        log::info!(
            "[Analyzer] {}: {} - {}, {} BPM, {}",
            record.file_name,
            record.genre,
            record.sub_genre,
            record.tempo,
            record.key
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::Classification;
    use crate::analysis::features::FeatureVector;
    use crate::testing::signals::{sine, write_wav};

    struct FixedClassifier;

    impl TrackClassifier for FixedClassifier {
        fn classify(&self, features: &FeatureVector) -> Classification {
            Classification {
                tempo: features.tempo,
                key: "D Major".to_string(),
                genre: "Jazz".to_string(),
                sub_genre: "Bebop".to_string(),
                mood: "Cheerful & Positive".to_string(),
                instruments: vec!["Saxophone".to_string()],
                energy: 50,
                danceability: 50,
                valence: 50,
                loudness: -10.0,
            }
        }
    }

    #[test]
    fn test_analyze_wav_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, &sine(440.0, 22050, 3.0, 0.5), 22050).unwrap();

        let record = Analyzer::with_heuristics(&AppConfig::default())
            .analyze_file(&path)
            .unwrap();

        assert_eq!(record.file_name, "tone.wav");
        assert_eq!(record.duration, "0:03");
        assert!(record.key.starts_with("A "), "got {}", record.key);
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn test_classifier_is_injected() {
        let analyzer = Analyzer::new(&AppConfig::default(), Box::new(FixedClassifier));
        let record = analyzer
            .analyze_samples("x.wav", &sine(220.0, 8000, 1.0, 0.3), 8000)
            .unwrap();
        assert_eq!(record.genre, "Jazz");
        assert_eq!(record.instruments, vec!["Saxophone"]);
    }

    #[test]
    fn test_missing_file_produces_no_record() {
        let result = Analyzer::with_heuristics(&AppConfig::default())
            .analyze_file(Path::new("/definitely/missing.mp3"));
        assert!(matches!(result, Err(AnalysisError::FileNotFound { .. })));
    }

    /// 1500 Hz tone, loud for the first quarter of every 22-hop beat
    fn pulsed_tone(sample_rate: u32, secs: f32) -> Vec<f32> {
        let period = (22 * 512) as u64 * sample_rate as u64 / ANALYSIS_SAMPLE_RATE as u64;
        sine(1500.0, sample_rate, secs, 1.0)
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let gain = if (i as u64 % period) < period / 4 { 0.5 } else { 0.1 };
                s * gain
            })
            .collect()
    }

    #[test]
    fn test_labels_do_not_depend_on_storage_rate() {
        let analyzer = Analyzer::with_heuristics(&AppConfig::default());
        let native = analyzer
            .analyze_samples("a.wav", &pulsed_tone(22050, 10.0), 22050)
            .unwrap();
        let hi_res = analyzer
            .analyze_samples("a.wav", &pulsed_tone(44100, 10.0), 44100)
            .unwrap();

        assert!(hi_res.instruments.contains(&"Drums".to_string()), "{:?}", hi_res.instruments);
        assert_eq!(hi_res.genre, native.genre);
        assert_eq!(hi_res.sub_genre, native.sub_genre);
        assert_eq!(hi_res.instruments, native.instruments);
        assert_eq!(hi_res.key, native.key);
        assert_eq!(hi_res.mood, native.mood);
        assert!((hi_res.tempo - native.tempo).abs() < 1.0);
        assert_eq!(hi_res.duration, native.duration);
    }

    #[test]
    fn test_duration_is_the_analysed_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.wav");
        write_wav(&path, &sine(440.0, 44100, 3.0, 0.5), 44100).unwrap();

        let mut config = AppConfig::default();
        config.analysis.max_duration_secs = 2.0;
        let record = Analyzer::with_heuristics(&config).analyze_file(&path).unwrap();

        assert_eq!(record.duration, "0:02");
        assert_eq!(record.duration_seconds, 2.0);
    }
}
