// Spectral module - Frequency-domain feature extraction
//
// This module computes per-frame spectral features from magnitude spectra.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Jiang, D. et al. (2002). Music type classification by spectral contrast feature

use super::types::CONTRAST_BANDS;

/// Spectral rolloff threshold (85% of spectral energy)
const ROLLOFF_THRESHOLD: f32 = 0.85;

/// Lowest octave band edge for spectral contrast (Hz)
const CONTRAST_FMIN: f32 = 200.0;

/// Fraction of a band's bins averaged for its peak and valley
const CONTRAST_QUANTILE: f32 = 0.02;

/// Spectral feature computation functions
pub struct SpectralFeatures {
    sample_rate: u32,
    fft_size: usize,
    /// Bin index boundaries for the contrast octave bands (len = CONTRAST_BANDS + 1)
    contrast_edges: Vec<usize>,
}

impl SpectralFeatures {
    /// Create a new spectral features processor
    ///
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `fft_size` - FFT window size
    pub fn new(sample_rate: u32, fft_size: usize) -> Self {
        let num_bins = fft_size / 2 + 1;
        let bin_width = sample_rate as f32 / fft_size as f32;

        // Bands: [0, 200), [200, 400), ... doubling, last band runs to Nyquist
        let mut contrast_edges = vec![0usize];
        let mut edge_hz = CONTRAST_FMIN;
        for _ in 0..CONTRAST_BANDS - 1 {
            contrast_edges.push(((edge_hz / bin_width).round() as usize).min(num_bins));
            edge_hz *= 2.0;
        }
        contrast_edges.push(num_bins);

        Self {
            sample_rate,
            fft_size,
            contrast_edges,
        }
    }

    fn bin_width(&self) -> f32 {
        self.sample_rate as f32 / self.fft_size as f32
    }

    /// Compute spectral centroid (weighted mean frequency)
    ///
    /// Formula: centroid = Σ(f_i × |X[i]|) / Σ|X[i]|
    ///
    /// # Returns
    /// Spectral centroid in Hz (0.0 for a silent frame)
    pub fn compute_centroid(&self, spectrum: &[f32]) -> f32 {
        let freq_bin_width = self.bin_width();

        let weighted_sum: f32 = spectrum
            .iter()
            .enumerate()
            .map(|(i, &mag)| i as f32 * freq_bin_width * mag)
            .sum();

        let magnitude_sum: f32 = spectrum.iter().sum();

        if magnitude_sum > 1e-10 {
            weighted_sum / magnitude_sum
        } else {
            0.0
        }
    }

    /// Compute spectral rolloff (85% energy threshold frequency)
    ///
    /// # Returns
    /// Rolloff frequency in Hz
    pub fn compute_rolloff(&self, spectrum: &[f32]) -> f32 {
        let total_energy: f32 = spectrum.iter().map(|&mag| mag * mag).sum();

        if total_energy < 1e-10 {
            return 0.0;
        }

        let threshold = ROLLOFF_THRESHOLD * total_energy;
        let freq_bin_width = self.bin_width();

        let mut cumulative_energy = 0.0;
        for (i, &mag) in spectrum.iter().enumerate() {
            cumulative_energy += mag * mag;
            if cumulative_energy >= threshold {
                return i as f32 * freq_bin_width;
            }
        }

        (spectrum.len() - 1) as f32 * freq_bin_width
    }

    /// Compute octave-band spectral contrast
    ///
    /// For each band the mean of the strongest and weakest `CONTRAST_QUANTILE`
    /// share of bins gives a peak and a valley; the contrast is their ratio in dB.
    ///
    /// # Returns
    /// One contrast value per band (dB, 0.0 for an empty band)
    pub fn compute_contrast(&self, spectrum: &[f32]) -> [f32; CONTRAST_BANDS] {
        let mut contrast = [0.0_f32; CONTRAST_BANDS];

        for (band, value) in contrast.iter_mut().enumerate() {
            let start = self.contrast_edges[band].min(spectrum.len());
            let end = self.contrast_edges[band + 1].min(spectrum.len());
            if end <= start {
                continue;
            }

            let mut mags: Vec<f32> = spectrum[start..end].to_vec();
            mags.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let n = mags.len();
            let take = ((n as f32 * CONTRAST_QUANTILE).round() as usize).clamp(1, n);

            let valley = mags[..take].iter().sum::<f32>() / take as f32;
            let peak = mags[n - take..].iter().sum::<f32>() / take as f32;
            *value = 10.0 * ((peak + 1e-10) / (valley + 1e-10)).log10();
        }

        contrast
    }
}
