// Types module - Data structures for extracted audio features
//
// A FeatureVector is produced once per analysis call and discarded after
// classification. Series are indexed by STFT frame.

/// Number of pitch classes in a chroma vector (C, C#, ..., B)
pub const PITCH_CLASSES: usize = 12;

/// Number of spectral contrast bands
pub const CONTRAST_BANDS: usize = 7;

/// Number of MFCC coefficients
pub const MFCC_COEFFICIENTS: usize = 13;

/// Features extracted from a whole analysis window
#[derive(Debug, Clone, Default)]
pub struct FeatureVector {
    /// Estimated global tempo in BPM (0.0 when no pulse was found)
    pub tempo: f32,

    /// Beat positions as STFT frame indices
    pub beat_frames: Vec<usize>,

    /// Per-frame pitch-class energy, each frame normalized so its peak is 1.0
    pub chroma: Vec<[f32; PITCH_CLASSES]>,

    /// Spectral centroid in Hz per frame
    pub spectral_centroid: Vec<f32>,

    /// 85% energy rolloff frequency in Hz per frame
    pub spectral_rolloff: Vec<f32>,

    /// Zero-crossing rate (0.0 to 1.0) per frame
    pub zero_crossing_rate: Vec<f32>,

    /// MFCC matrix, `mfcc[coefficient][frame]`
    pub mfcc: Vec<Vec<f32>>,

    /// Root-mean-square amplitude per frame
    pub rms: Vec<f32>,

    /// Octave-band peak/valley contrast in dB, `spectral_contrast[band][frame]`
    pub spectral_contrast: Vec<Vec<f32>>,
}

impl FeatureVector {
    pub fn mean_centroid(&self) -> f32 {
        mean(&self.spectral_centroid)
    }

    pub fn mean_zcr(&self) -> f32 {
        mean(&self.zero_crossing_rate)
    }

    pub fn mean_rms(&self) -> f32 {
        mean(&self.rms)
    }

    /// Mean of one spectral contrast band (0.0 for a missing band)
    pub fn contrast_band_mean(&self, band: usize) -> f32 {
        self.spectral_contrast
            .get(band)
            .map(|series| mean(series))
            .unwrap_or(0.0)
    }

    /// Total chroma energy per pitch class across all frames
    pub fn chroma_energy(&self) -> [f32; PITCH_CLASSES] {
        let mut totals = [0.0_f32; PITCH_CLASSES];
        for frame in &self.chroma {
            for (total, value) in totals.iter_mut().zip(frame.iter()) {
                *total += value;
            }
        }
        totals
    }

    /// Time-averaged chroma vector
    pub fn chroma_mean(&self) -> [f32; PITCH_CLASSES] {
        let mut totals = self.chroma_energy();
        if !self.chroma.is_empty() {
            let n = self.chroma.len() as f32;
            for total in totals.iter_mut() {
                *total /= n;
            }
        }
        totals
    }

    /// Population variance over every value of the chroma matrix
    pub fn chroma_variance(&self) -> f32 {
        let count = self.chroma.len() * PITCH_CLASSES;
        if count == 0 {
            return 0.0;
        }
        let values = || self.chroma.iter().flat_map(|frame| frame.iter().copied());
        let mean = values().sum::<f32>() / count as f32;
        values().map(|v| (v - mean) * (v - mean)).sum::<f32>() / count as f32
    }
}

/// Arithmetic mean, 0.0 for an empty series
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}
