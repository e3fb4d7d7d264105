// Classifier - heuristic rule-based track description
//
// This module maps a FeatureVector onto the discrete labels and 0-100
// scores used in an AnalysisRecord. The mapping is deterministic and has
// no side effects, so the same features always describe the same way.
//
// Labels produced:
// - Key and mode from chroma (argmax pitch class, mask correlation for mode)
// - Genre/sub-genre and instruments from the ordered tables in `rules`
// - Mood from (energy level, chroma tonality)
// - Energy, danceability and valence scores from RMS, tempo and chroma spread
// - Mean loudness in dB
//
// The TrackClassifier trait is the seam for a model-backed classifier;
// HeuristicClassifier is the always-available implementation.

use crate::analysis::features::{FeatureVector, PITCH_CLASSES};
use crate::analysis::rules::{self, EnergyLevel, Tonality, TrackProfile};

/// Pitch class names, index 0 = C
pub const PITCH_CLASS_NAMES: [&str; PITCH_CLASSES] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Binary scale masks rooted on C
const MAJOR_MASK: [f32; PITCH_CLASSES] = [1., 0., 1., 0., 1., 1., 0., 1., 0., 1., 0., 1.];
const MINOR_MASK: [f32; PITCH_CLASSES] = [1., 0., 1., 1., 0., 1., 0., 1., 1., 0., 1., 0.];

/// Amplitude floor for dB conversion (-100 dB)
const LOUDNESS_AMIN: f32 = 1e-5;

/// Loudness reported for a track with no frames
pub const SILENCE_DB: f32 = -100.0;

/// Dynamic range kept below the loudest frame
const LOUDNESS_TOP_DB: f32 = 80.0;

/// Labels and scores for one track
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Classification {
    /// Tempo in BPM, unrounded
    pub tempo: f32,
    /// "<PitchClass> Major" or "<PitchClass> Minor"
    pub key: String,
    pub genre: String,
    pub sub_genre: String,
    pub mood: String,
    /// 1 to 5 instrument names
    pub instruments: Vec<String>,
    pub energy: u8,
    pub danceability: u8,
    pub valence: u8,
    /// Mean frame loudness in dB, unrounded, always finite
    pub loudness: f32,
}

/// Strategy for turning features into a Classification
///
/// Implementations must be deterministic for equal inputs.
pub trait TrackClassifier: Send + Sync {
    fn classify(&self, features: &FeatureVector) -> Classification;
}

/// Threshold-rule classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl TrackClassifier for HeuristicClassifier {
    fn classify(&self, features: &FeatureVector) -> Classification {
        let profile = TrackProfile {
            tempo: features.tempo,
            centroid: features.mean_centroid(),
            zcr: features.mean_zcr(),
            low_band_contrast: features.contrast_band_mean(0),
        };
        let mean_rms = features.mean_rms();
        let chroma_variance = features.chroma_variance();

        let (genre, sub_genre) = rules::match_genre(&profile);
        let mood = rules::lookup_mood(
            EnergyLevel::from_features(mean_rms, features.tempo),
            Tonality::from_chroma_variance(chroma_variance),
        );

        let classification = Classification {
            tempo: features.tempo,
            key: detect_key(features),
            genre: genre.to_string(),
            sub_genre: sub_genre.to_string(),
            mood: mood.to_string(),
            instruments: rules::detect_instruments(&profile),
            energy: energy_score(mean_rms),
            danceability: danceability_score(features.tempo, mean_rms),
            valence: valence_score(chroma_variance, mean_rms),
            loudness: loudness_db(&features.rms),
        };

        log::debug!(
            "[Classifier] {} / {} | {} | {} | centroid {:.0} Hz, zcr {:.3}, rms {:.4}",
            classification.genre,
            classification.sub_genre,
            classification.mood,
            classification.key,
            profile.centroid,
            profile.zcr,
            mean_rms
        );

        classification
    }
}

/// Detect key and mode from the chroma matrix
///
/// Tonic is the pitch class with the largest total energy (first wins on
/// ties). Mode is "Major" only when the time-averaged chroma correlates
/// strictly better with the major mask than with the minor mask.
pub fn detect_key(features: &FeatureVector) -> String {
    let energy = features.chroma_energy();
    let tonic = energy
        .iter()
        .enumerate()
        .fold((0, f32::MIN), |best, (i, &e)| if e > best.1 { (i, e) } else { best })
        .0;

    let chroma_mean = features.chroma_mean();
    let major_corr = pearson(&chroma_mean, &MAJOR_MASK);
    let minor_corr = pearson(&chroma_mean, &MINOR_MASK);
    let mode = if major_corr > minor_corr { "Major" } else { "Minor" };

    format!("{} {}", PITCH_CLASS_NAMES[tonic], mode)
}

/// Pearson correlation, 0.0 when either input has zero variance
pub fn pearson(x: &[f32], y: &[f32]) -> f32 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let mean_x = x[..n].iter().sum::<f32>() / n as f32;
    let mean_y = y[..n].iter().sum::<f32>() / n as f32;

    let (mut cov, mut var_x, mut var_y) = (0.0_f32, 0.0_f32, 0.0_f32);
    for (a, b) in x[..n].iter().zip(y[..n].iter()) {
        let (dx, dy) = (a - mean_x, b - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom > 1e-12 {
        cov / denom
    } else {
        0.0
    }
}

fn to_score(value: f32) -> u8 {
    if value.is_finite() {
        value.clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

/// Energy score: mean RMS scaled by 100 x 150, truncated to [0, 100]
pub fn energy_score(mean_rms: f32) -> u8 {
    to_score(mean_rms * 100.0 * 150.0)
}

/// Danceability score peaking at 125 BPM
///
/// 0.4 x tempo_score + 0.3 x 70 (fixed rhythm term) + 0.3 x mean RMS x 100,
/// with tempo_score = clamp(100 - |tempo - 125| x 2, 0, 100).
pub fn danceability_score(tempo: f32, mean_rms: f32) -> u8 {
    let tempo_score = (100.0 - (tempo - 125.0).abs() * 2.0).clamp(0.0, 100.0);
    let rhythm_score = 70.0;
    let energy_score = mean_rms * 100.0;
    to_score(tempo_score * 0.4 + rhythm_score * 0.3 + energy_score * 0.3)
}

/// Valence score: low chroma spread and higher energy read as positive
pub fn valence_score(chroma_variance: f32, mean_rms: f32) -> u8 {
    let tonality_score = (1.0 - chroma_variance.min(1.0)) * 100.0;
    let energy_score = mean_rms * 100.0;
    to_score(tonality_score * 0.6 + energy_score * 0.4)
}

/// Mean frame loudness in dB
///
/// Each frame is 20 * log10(max(rms, 1e-5)), then raised to no lower than
/// LOUDNESS_TOP_DB below the loudest frame before averaging.
///
/// # Returns
/// Mean dB, or -100.0 for an empty series
pub fn loudness_db(rms: &[f32]) -> f32 {
    if rms.is_empty() {
        return SILENCE_DB;
    }

    let frames_db: Vec<f32> = rms
        .iter()
        .map(|&r| {
            let r = if r.is_finite() { r } else { 0.0 };
            20.0 * r.max(LOUDNESS_AMIN).log10()
        })
        .collect();
    let floor = frames_db.iter().copied().fold(f32::MIN, f32::max) - LOUDNESS_TOP_DB;

    frames_db.iter().map(|db| db.max(floor)).sum::<f32>() / frames_db.len() as f32
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
