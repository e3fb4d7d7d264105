//! Deterministic synthetic signals and WAV writers for tests.

use std::f32::consts::PI;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn sample_count(sample_rate: u32, secs: f32) -> usize {
    (sample_rate as f32 * secs).max(0.0) as usize
}

/// Pure sine wave
pub fn sine(frequency_hz: f32, sample_rate: u32, secs: f32, amplitude: f32) -> Vec<f32> {
    (0..sample_count(sample_rate, secs))
        .map(|i| (2.0 * PI * frequency_hz * i as f32 / sample_rate as f32).sin() * amplitude)
        .collect()
}

/// Sum of equal-amplitude sines, scaled so the peak stays below `amplitude`
pub fn chord(frequencies_hz: &[f32], sample_rate: u32, secs: f32, amplitude: f32) -> Vec<f32> {
    let voices = frequencies_hz.len().max(1) as f32;
    let mut mix = vec![0.0; sample_count(sample_rate, secs)];
    for &freq in frequencies_hz {
        for (out, value) in mix.iter_mut().zip(sine(freq, sample_rate, secs, amplitude / voices)) {
            *out += value;
        }
    }
    mix
}

/// Seeded uniform white noise in [-amplitude, amplitude)
pub fn noise(sample_rate: u32, secs: f32, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..sample_count(sample_rate, secs))
        .map(|_| rng.gen_range(-amplitude..amplitude))
        .collect()
}

/// Short decaying clicks every `interval_samples`, silence in between
pub fn click_track(sample_rate: u32, secs: f32, interval_samples: usize, amplitude: f32) -> Vec<f32> {
    let interval = interval_samples.max(1);
    let click_len = (sample_rate as usize / 500).max(1);
    (0..sample_count(sample_rate, secs))
        .map(|i| {
            let pos = i % interval;
            if pos < click_len {
                let decay = 1.0 - pos as f32 / click_len as f32;
                let sign = if pos % 2 == 0 { 1.0 } else { -1.0 };
                amplitude * decay * sign
            } else {
                0.0
            }
        })
        .collect()
}

/// Write mono samples as a 16-bit PCM WAV
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()
}
