//! Sample-rate conversion to the fixed analysis rate
//!
//! Every threshold in the classifier (ZCR, centroid cut-offs, frame timing)
//! assumes 22050 Hz mono input, so decoded audio at any other rate is
//! converted with a band-limited sinc resampler before feature extraction.

use std::borrow::Cow;

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::error::AnalysisError;

/// Sample rate all features are computed at
pub const ANALYSIS_SAMPLE_RATE: u32 = 22050;

const SINC_LEN: usize = 256;

/// Convert mono samples to [`ANALYSIS_SAMPLE_RATE`]
///
/// # Arguments
/// * `samples` - Mono samples
/// * `sample_rate` - Rate of `samples` in Hz
///
/// # Returns
/// * `Ok(Cow::Borrowed)` - input already at the analysis rate (or empty)
/// * `Ok(Cow::Owned)` - resampled signal, `round(len * 22050 / sample_rate)` long
/// * `Err(AnalysisError::ResampleFailed)` - zero rate or resampler failure
pub fn resample_to_analysis_rate(
    samples: &[f32],
    sample_rate: u32,
) -> Result<Cow<'_, [f32]>, AnalysisError> {
    if sample_rate == ANALYSIS_SAMPLE_RATE || samples.is_empty() {
        return Ok(Cow::Borrowed(samples));
    }

    let fail = |reason: String| AnalysisError::ResampleFailed {
        sample_rate,
        reason,
    };
    if sample_rate == 0 {
        return Err(fail("sample rate is zero".to_string()));
    }

    let ratio = ANALYSIS_SAMPLE_RATE as f64 / sample_rate as f64;
    let expected = (samples.len() as f64 * ratio).round() as usize;

    // Trailing silence flushes the filter delay out of a single fixed chunk
    let padding = (2.0 * SINC_LEN as f64 / ratio.min(1.0)).ceil() as usize;
    let mut padded = Vec::with_capacity(samples.len() + padding);
    padded.extend_from_slice(samples);
    padded.resize(samples.len() + padding, 0.0);
    let chunk_size = padded.len();
    let wave_in = vec![padded];

    let params = SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, chunk_size, 1)
        .map_err(|err| fail(err.to_string()))?;
    let delay = resampler.output_delay();

    let output = resampler
        .process(&wave_in, None)
        .map_err(|err| fail(err.to_string()))?
        .into_iter()
        .next()
        .unwrap_or_default();

    let resampled: Vec<f32> = output.into_iter().skip(delay).take(expected).collect();
    log::debug!(
        "[Resampler] {} Hz -> {} Hz: {} -> {} samples",
        sample_rate,
        ANALYSIS_SAMPLE_RATE,
        samples.len(),
        resampled.len()
    );
    Ok(Cow::Owned(resampled))
}
