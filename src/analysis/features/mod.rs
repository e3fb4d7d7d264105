// FeatureExtractor - DSP feature extraction for whole-track description
//
// This module turns mono PCM into the frame-wise feature series the
// classifier works from. All frequency-domain features share one STFT
// (Hann window, frame_size samples, hop_size hop, frames not centred).
//
// Module organization:
// - types: Data structures (FeatureVector)
// - fft: FFT computation with windowing
// - spectral: Frequency-domain features (centroid, rolloff, contrast)
// - temporal: Time-domain features (ZCR, RMS)
// - chroma: Pitch-class profile
// - mfcc: Mel-frequency cepstral coefficients
// - tempo: Onset envelope, tempo and beat estimation
// - mod.rs: Coordinator (FeatureExtractor)
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

mod chroma;
mod fft;
mod mfcc;
mod spectral;
mod tempo;
mod temporal;
mod types;

pub use tempo::TempoEstimate;
pub use types::{mean, FeatureVector, CONTRAST_BANDS, MFCC_COEFFICIENTS, PITCH_CLASSES};

use crate::config::AnalysisConfig;
use chroma::ChromaMapper;
use fft::FftProcessor;
use mfcc::MfccProcessor;
use spectral::SpectralFeatures;
use tempo::TempoEstimator;

/// FeatureExtractor coordinates the DSP feature extraction pipeline
///
/// Built once per sample rate; `extract` is pure and may be called repeatedly.
pub struct FeatureExtractor {
    fft_processor: FftProcessor,
    spectral_features: SpectralFeatures,
    chroma_mapper: ChromaMapper,
    mfcc_processor: MfccProcessor,
    tempo_estimator: TempoEstimator,
    frame_size: usize,
    hop_size: usize,
}

impl FeatureExtractor {
    /// Create a new FeatureExtractor
    ///
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz (e.g., 44100)
    /// * `config` - Frame/hop sizes and tempo search range
    pub fn new(sample_rate: u32, config: &AnalysisConfig) -> Self {
        let frame_size = config.frame_size.max(2);
        let hop_size = config.hop_size.max(1);
        let frame_rate = sample_rate as f32 / hop_size as f32;

        Self {
            fft_processor: FftProcessor::new(frame_size),
            spectral_features: SpectralFeatures::new(sample_rate, frame_size),
            chroma_mapper: ChromaMapper::new(sample_rate, frame_size),
            mfcc_processor: MfccProcessor::new(sample_rate, frame_size),
            tempo_estimator: TempoEstimator::new(frame_rate, config.min_bpm, config.max_bpm),
            frame_size,
            hop_size,
        }
    }

    /// Number of STFT frames for a signal of `len` samples
    ///
    /// A non-empty signal shorter than one frame still yields one
    /// zero-padded frame.
    pub fn frame_count(&self, len: usize) -> usize {
        match len {
            0 => 0,
            n if n <= self.frame_size => 1,
            n => 1 + (n - self.frame_size) / self.hop_size,
        }
    }

    /// Extract all features from a mono signal
    ///
    /// # Arguments
    /// * `audio` - Mono samples in [-1.0, 1.0]
    ///
    /// # Returns
    /// FeatureVector with one entry per frame in every series
    pub fn extract(&self, audio: &[f32]) -> FeatureVector {
        let num_frames = self.frame_count(audio.len());
        let mut features = FeatureVector {
            chroma: Vec::with_capacity(num_frames),
            spectral_centroid: Vec::with_capacity(num_frames),
            spectral_rolloff: Vec::with_capacity(num_frames),
            zero_crossing_rate: Vec::with_capacity(num_frames),
            mfcc: vec![Vec::with_capacity(num_frames); MFCC_COEFFICIENTS],
            rms: Vec::with_capacity(num_frames),
            spectral_contrast: vec![Vec::with_capacity(num_frames); CONTRAST_BANDS],
            ..Default::default()
        };

        let mut onset_envelope = Vec::with_capacity(num_frames);
        let mut previous_spectrum = vec![0.0; self.fft_processor.num_bins()];

        for index in 0..num_frames {
            let start = index * self.hop_size;
            let end = (start + self.frame_size).min(audio.len());
            let frame = &audio[start..end];

            let spectrum = self.fft_processor.compute_magnitude_spectrum(frame);

            features
                .spectral_centroid
                .push(self.spectral_features.compute_centroid(&spectrum));
            features
                .spectral_rolloff
                .push(self.spectral_features.compute_rolloff(&spectrum));
            for (band, value) in self
                .spectral_features
                .compute_contrast(&spectrum)
                .into_iter()
                .enumerate()
            {
                features.spectral_contrast[band].push(value);
            }

            features.chroma.push(self.chroma_mapper.compute(&spectrum));
            for (coefficient, value) in self.mfcc_processor.compute(&spectrum).into_iter().enumerate() {
                features.mfcc[coefficient].push(value);
            }

            features.zero_crossing_rate.push(temporal::compute_zcr(frame));
            features.rms.push(temporal::compute_rms(frame));

            // First frame has no predecessor and carries no onset strength
            onset_envelope.push(if index == 0 {
                0.0
            } else {
                TempoEstimator::onset_strength(&previous_spectrum, &spectrum)
            });
            previous_spectrum = spectrum;
        }

        let tempo = self.tempo_estimator.estimate(&onset_envelope);
        features.tempo = tempo.bpm;
        features.beat_frames = tempo.beat_frames;

        log::debug!(
            "[FeatureExtractor] {} frames, tempo {:.1} BPM, mean centroid {:.0} Hz",
            num_frames,
            features.tempo,
            features.mean_centroid()
        );

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::signals::{click_track, noise, sine};

    const SR: u32 = 22050;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(SR, &AnalysisConfig::default())
    }

    #[test]
    fn test_frame_count() {
        let extractor = extractor();
        assert_eq!(extractor.frame_count(0), 0);
        assert_eq!(extractor.frame_count(100), 1);
        assert_eq!(extractor.frame_count(2048), 1);
        assert_eq!(extractor.frame_count(2048 + 512), 2);
        assert_eq!(extractor.frame_count(2048 + 1023), 2);
    }

    #[test]
    fn test_series_lengths_agree() {
        let features = extractor().extract(&sine(440.0, SR, 2.0, 0.5));
        let n = extractor().frame_count((SR * 2) as usize);

        assert_eq!(features.chroma.len(), n);
        assert_eq!(features.spectral_centroid.len(), n);
        assert_eq!(features.spectral_rolloff.len(), n);
        assert_eq!(features.zero_crossing_rate.len(), n);
        assert_eq!(features.rms.len(), n);
        assert_eq!(features.mfcc.len(), MFCC_COEFFICIENTS);
        assert!(features.mfcc.iter().all(|c| c.len() == n));
        assert_eq!(features.spectral_contrast.len(), CONTRAST_BANDS);
        assert!(features.spectral_contrast.iter().all(|b| b.len() == n));
    }

    #[test]
    fn test_empty_signal_gives_empty_features() {
        let features = extractor().extract(&[]);
        assert_eq!(features.tempo, 0.0);
        assert!(features.rms.is_empty());
        assert!(features.beat_frames.is_empty());
    }

    #[test]
    fn test_short_signal_is_zero_padded() {
        let features = extractor().extract(&sine(1000.0, SR, 0.01, 0.5));
        assert_eq!(features.spectral_centroid.len(), 1);
        assert!(features.spectral_centroid[0] > 0.0);
    }

    #[test]
    fn test_silence() {
        let features = extractor().extract(&vec![0.0; SR as usize * 2]);
        assert_eq!(features.tempo, 0.0);
        assert!(features.beat_frames.is_empty());
        assert_eq!(features.mean_rms(), 0.0);
        assert_eq!(features.mean_centroid(), 0.0);
        assert_eq!(features.chroma_energy(), [0.0; PITCH_CLASSES]);
    }

    #[test]
    fn test_a440_dominates_chroma() {
        let features = extractor().extract(&sine(440.0, SR, 2.0, 0.5));
        let energy = features.chroma_energy();
        let strongest = energy
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(strongest, 9);
    }

    #[test]
    fn test_centroid_and_zcr_track_brightness() {
        let low = extractor().extract(&sine(200.0, SR, 1.0, 0.5));
        let bright = extractor().extract(&noise(SR, 1.0, 0.5, 7));

        assert!(low.mean_centroid() < 1000.0, "got {}", low.mean_centroid());
        assert!(bright.mean_centroid() > 3000.0, "got {}", bright.mean_centroid());
        assert!(low.mean_zcr() < 0.05);
        assert!(bright.mean_zcr() > 0.3);
    }

    #[test]
    fn test_click_track_tempo() {
        // 22 hops between clicks: 60 * 22050 / (22 * 512) = 117.45 BPM
        let interval = 22 * 512;
        let features = extractor().extract(&click_track(SR, 20.0, interval, 0.9));

        assert!(
            (features.tempo - 117.45).abs() < 6.0,
            "Expected ~117 BPM, got {}",
            features.tempo
        );
        assert!(!features.beat_frames.is_empty());
    }
}
