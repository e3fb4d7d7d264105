// Audio module - file decoding for offline analysis

pub mod loader;
pub mod resampler;

pub use loader::{downmix, AudioLoader, DecodedAudio};
pub use resampler::{resample_to_analysis_rate, ANALYSIS_SAMPLE_RATE};
