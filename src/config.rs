//! Configuration management for analysis, batch and server parameters
//!
//! This module provides runtime configuration loading from JSON files so
//! frame sizes, tempo search range, supported extensions and upload limits can
//! be adjusted without recompilation. Missing sections and fields fall back to
//! defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Feature extraction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// STFT frame length in samples
    pub frame_size: usize,
    /// Hop between consecutive frames in samples
    pub hop_size: usize,
    /// Only the first N seconds of each file are analyzed
    pub max_duration_secs: f32,
    /// Lower bound of the tempo search range
    pub min_bpm: f32,
    /// Upper bound of the tempo search range
    pub max_bpm: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            max_duration_secs: 60.0,
            min_bpm: 60.0,
            max_bpm: 200.0,
        }
    }
}

/// Batch discovery and output parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Lowercase extensions (without dot) picked up from the input directory
    pub audio_extensions: Vec<String>,
    /// Output directory for single-file analysis
    pub single_output_dir: String,
    /// Output directory for batch analysis
    pub batch_output_dir: String,
    /// Show a progress bar while processing
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            audio_extensions: ["mp3", "wav", "flac", "ogg", "m4a", "aac"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            single_output_dir: "analysis_results".to_string(),
            batch_output_dir: "batch_results".to_string(),
            show_progress: true,
        }
    }
}

impl BatchConfig {
    /// Case-insensitive check against the supported extension list
    pub fn is_supported_extension(&self, extension: &str) -> bool {
        let lower = extension.to_ascii_lowercase();
        self.audio_extensions.iter().any(|ext| *ext == lower)
    }
}

/// HTTP upload server parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Upload size cap in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults when the file is missing or
    /// its JSON is invalid (a warning is logged in both cases)
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
