// FFT module - Fast Fourier Transform computation
//
// This module handles FFT computation with Hann windowing to reduce
// spectral leakage. The magnitude spectrum feeds every frequency-domain
// feature (centroid, rolloff, contrast, chroma, MFCC, onset strength).

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// FFT processor that computes magnitude spectra from audio frames
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Hann window for FFT (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `fft_size` - FFT window size (2048 for full-track analysis)
    pub fn new(fft_size: usize) -> Self {
        let fft_size = fft_size.max(2);
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0
                    - ((2.0 * std::f32::consts::PI * i as f32) / (fft_size as f32 - 1.0)).cos())
            })
            .collect();

        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(fft_size),
            fft_size,
            window,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of bins in the returned magnitude spectrum
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Compute magnitude spectrum using FFT
    ///
    /// Applies Hann windowing, zero-pads short frames, performs FFT, and
    /// returns the magnitude spectrum for positive frequencies only.
    ///
    /// # Arguments
    /// * `audio` - Audio frame (length <= fft_size, extra samples are ignored)
    ///
    /// # Returns
    /// Magnitude spectrum (size = fft_size / 2 + 1)
    pub fn compute_magnitude_spectrum(&self, audio: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = audio
            .iter()
            .take(self.fft_size)
            .zip(self.window.iter())
            .map(|(sample, w)| Complex::new(sample * w, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer[..self.num_bins()].iter().map(|c| c.norm()).collect()
    }
}
