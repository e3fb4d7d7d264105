// Temporal module - Time-domain feature extraction
//
// This module computes features directly from time-domain frames:
// zero-crossing rate and RMS energy.

/// Compute zero-crossing rate (ZCR)
///
/// ZCR measures how often the signal changes sign. High ZCR indicates
/// percussive, noisy or high-frequency content.
///
/// # Returns
/// Zero-crossing rate (0.0 to 1.0), normalized by frame length
pub fn compute_zcr(frame: &[f32]) -> f32 {
    if frame.len() < 2 {
        return 0.0;
    }

    let crossings = frame
        .windows(2)
        .filter(|pair| (pair[1] >= 0.0) != (pair[0] >= 0.0))
        .count();

    crossings as f32 / frame.len() as f32
}

/// Compute root-mean-square amplitude
pub fn compute_rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    (frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zcr_alternating_signal() {
        let frame: Vec<f32> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!((compute_zcr(&frame) - 0.99).abs() < 1e-6);
    }

    #[test]
    fn test_zcr_constant_signal() {
        assert_eq!(compute_zcr(&[0.5; 64]), 0.0);
        assert_eq!(compute_zcr(&[0.5]), 0.0);
    }

    #[test]
    fn test_rms_of_constant() {
        assert!((compute_rms(&[0.5; 32]) - 0.5).abs() < 1e-6);
        assert_eq!(compute_rms(&[]), 0.0);
    }
}
