// MFCC module - Mel-frequency cepstral coefficients
//
// Pipeline per frame: power spectrum → triangular mel filterbank → natural
// log → DCT-II, keeping the first MFCC_COEFFICIENTS coefficients.

use super::types::MFCC_COEFFICIENTS;

const NUM_MEL_FILTERS: usize = 40;

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10f32.powf(mel / 2595.0) - 1.0)
}

/// Mel filterbank plus DCT basis, built once per sample rate
pub struct MfccProcessor {
    /// filters[m][bin] weights
    filters: Vec<Vec<f32>>,
    /// dct[k][m] basis values
    dct: Vec<Vec<f32>>,
}

impl MfccProcessor {
    pub fn new(sample_rate: u32, fft_size: usize) -> Self {
        let num_bins = fft_size / 2 + 1;
        let bin_width = sample_rate as f32 / fft_size as f32;
        let mel_max = hz_to_mel(sample_rate as f32 / 2.0);

        // NUM_MEL_FILTERS + 2 equally spaced points on the mel scale
        let edges_hz: Vec<f32> = (0..NUM_MEL_FILTERS + 2)
            .map(|i| mel_to_hz(mel_max * i as f32 / (NUM_MEL_FILTERS + 1) as f32))
            .collect();

        let filters = (0..NUM_MEL_FILTERS)
            .map(|m| {
                let (lower, center, upper) = (edges_hz[m], edges_hz[m + 1], edges_hz[m + 2]);
                (0..num_bins)
                    .map(|bin| {
                        let freq = bin as f32 * bin_width;
                        if freq <= lower || freq >= upper {
                            0.0
                        } else if freq <= center {
                            (freq - lower) / (center - lower).max(f32::EPSILON)
                        } else {
                            (upper - freq) / (upper - center).max(f32::EPSILON)
                        }
                    })
                    .collect()
            })
            .collect();

        let dct = (0..MFCC_COEFFICIENTS)
            .map(|k| {
                (0..NUM_MEL_FILTERS)
                    .map(|m| {
                        (std::f32::consts::PI * k as f32 * (m as f32 + 0.5)
                            / NUM_MEL_FILTERS as f32)
                            .cos()
                    })
                    .collect()
            })
            .collect();

        Self { filters, dct }
    }

    /// Compute the MFCCs of one magnitude spectrum
    pub fn compute(&self, spectrum: &[f32]) -> [f32; MFCC_COEFFICIENTS] {
        let log_energies: Vec<f32> = self
            .filters
            .iter()
            .map(|filter| {
                let energy: f32 = filter
                    .iter()
                    .zip(spectrum.iter())
                    .map(|(w, mag)| w * mag * mag)
                    .sum();
                (energy + 1e-10).ln()
            })
            .collect();

        let mut coefficients = [0.0_f32; MFCC_COEFFICIENTS];
        for (coefficient, basis) in coefficients.iter_mut().zip(self.dct.iter()) {
            *coefficient = log_energies.iter().zip(basis.iter()).map(|(e, b)| e * b).sum();
        }
        coefficients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mel_scale_round_trip() {
        for hz in [0.0, 440.0, 4000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 0.5);
        }
    }

    #[test]
    fn test_silence_gives_constant_log_floor() {
        let mfcc = MfccProcessor::new(22050, 2048);
        let coefficients = mfcc.compute(&vec![0.0; 1025]);
        // Only the zeroth (DC) coefficient carries the flat log floor
        assert!((coefficients[0] - NUM_MEL_FILTERS as f32 * (1e-10_f32).ln()).abs() < 1e-2);
        assert!(coefficients[1..].iter().all(|c| c.abs() < 1e-2));
    }

    #[test]
    fn test_tone_differs_from_silence() {
        let mfcc = MfccProcessor::new(22050, 2048);
        let mut spectrum = vec![0.0; 1025];
        spectrum[40] = 10.0;
        let tone = mfcc.compute(&spectrum);
        let silence = mfcc.compute(&vec![0.0; 1025]);
        assert!(tone[0] > silence[0]);
    }
}
