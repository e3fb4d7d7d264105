// Chroma module - Pitch-class energy profile
//
// Each FFT bin between CHROMA_FMIN and CHROMA_FMAX is mapped to its nearest
// equal-tempered pitch class (MIDI = 69 + 12 * log2(f / 440)) and its power
// is accumulated there. Frames are scaled so the strongest class is 1.0.

use super::types::PITCH_CLASSES;

const CHROMA_FMIN: f32 = 20.0;
const CHROMA_FMAX: f32 = 8000.0;

/// Maps magnitude spectra onto the 12 pitch classes
pub struct ChromaMapper {
    /// Pitch class per FFT bin, None for bins outside the mapped range
    bin_to_class: Vec<Option<usize>>,
}

impl ChromaMapper {
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `fft_size` - FFT window size
    pub fn new(sample_rate: u32, fft_size: usize) -> Self {
        let num_bins = fft_size / 2 + 1;
        let bin_width = sample_rate as f32 / fft_size as f32;

        let bin_to_class = (0..num_bins)
            .map(|bin| {
                let freq = bin as f32 * bin_width;
                if !(CHROMA_FMIN..=CHROMA_FMAX).contains(&freq) {
                    return None;
                }
                let midi = 69.0 + 12.0 * (freq / 440.0).log2();
                Some((midi.round() as i32).rem_euclid(PITCH_CLASSES as i32) as usize)
            })
            .collect();

        Self { bin_to_class }
    }

    /// Compute one chroma frame (index 0 = C)
    ///
    /// # Returns
    /// Pitch-class energies scaled to a peak of 1.0, or all zeros for silence
    pub fn compute(&self, spectrum: &[f32]) -> [f32; PITCH_CLASSES] {
        let mut chroma = [0.0_f32; PITCH_CLASSES];
        for (mag, class) in spectrum.iter().zip(self.bin_to_class.iter()) {
            if let Some(class) = class {
                chroma[*class] += mag * mag;
            }
        }

        let peak = chroma.iter().copied().fold(0.0_f32, f32::max);
        if peak > 1e-10 {
            for value in chroma.iter_mut() {
                *value /= peak;
            }
        } else {
            chroma = [0.0; PITCH_CLASSES];
        }
        chroma
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a440_maps_to_pitch_class_a() {
        // 8000 / 1000 gives 8 Hz bins, so bin 55 is exactly 440 Hz
        let mapper = ChromaMapper::new(8000, 1000);
        let mut spectrum = vec![0.0; 501];
        spectrum[55] = 3.0;

        let chroma = mapper.compute(&spectrum);
        assert_eq!(chroma[9], 1.0);
        assert_eq!(chroma.iter().filter(|&&v| v > 0.0).count(), 1);
    }

    #[test]
    fn test_frames_are_peak_normalized() {
        let mapper = ChromaMapper::new(8000, 1000);
        let mut spectrum = vec![0.0; 501];
        spectrum[55] = 2.0; // A
        spectrum[33] = 1.0; // 264 Hz, C

        let chroma = mapper.compute(&spectrum);
        assert_eq!(chroma[9], 1.0);
        assert!((chroma[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_silence_and_out_of_range_bins_give_zeros() {
        let mapper = ChromaMapper::new(22050, 2048);
        assert_eq!(mapper.compute(&vec![0.0; 1025]), [0.0; PITCH_CLASSES]);

        let mut spectrum = vec![0.0; 1025];
        spectrum[0] = 5.0; // DC is below CHROMA_FMIN
        assert_eq!(mapper.compute(&spectrum), [0.0; PITCH_CLASSES]);
    }
}
