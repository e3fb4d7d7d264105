// Batch error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Batch error code constants
///
/// Error code range: 2001-2004
pub struct BatchErrorCodes {}

impl BatchErrorCodes {
    /// Input directory contains no supported audio files
    pub const NO_AUDIO_FILES: i32 = 2001;

    /// Zero records reached the aggregation step
    pub const EMPTY_BATCH: i32 = 2002;

    /// Writing a report or artifact failed
    pub const IO: i32 = 2003;

    /// Tabular export failed
    pub const EXPORT_FAILED: i32 = 2004;
}

/// Log a batch error with structured context
pub fn log_batch_error(err: &BatchError, context: &str) {
    error!(
        "Batch error in {}: code={}, component=BatchRunner, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Batch-level errors
///
/// These abort aggregation and reporting, never the individual analyses that
/// already completed.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchError {
    /// No supported audio files found in the input directory
    NoAudioFiles { dir: String },

    /// Aggregation was asked to summarize zero records
    EmptyBatch,

    /// Filesystem error while writing reports or artifacts
    Io { details: String },

    /// CSV export failed
    ExportFailed { reason: String },
}

impl ErrorCode for BatchError {
    fn code(&self) -> i32 {
        match self {
            BatchError::NoAudioFiles { .. } => BatchErrorCodes::NO_AUDIO_FILES,
            BatchError::EmptyBatch => BatchErrorCodes::EMPTY_BATCH,
            BatchError::Io { .. } => BatchErrorCodes::IO,
            BatchError::ExportFailed { .. } => BatchErrorCodes::EXPORT_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            BatchError::NoAudioFiles { dir } => format!("No audio files found in {}", dir),
            BatchError::EmptyBatch => "No files were processed; nothing to aggregate".to_string(),
            BatchError::Io { details } => format!("I/O error: {}", details),
            BatchError::ExportFailed { reason } => format!("CSV export failed: {}", reason),
        }
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BatchError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for BatchError {}

impl From<std::io::Error> for BatchError {
    fn from(err: std::io::Error) -> Self {
        BatchError::Io {
            details: err.to_string(),
        }
    }
}

impl From<csv::Error> for BatchError {
    fn from(err: csv::Error) -> Self {
        BatchError::ExportFailed {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BatchError {
    fn from(err: serde_json::Error) -> Self {
        BatchError::Io {
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_error_codes() {
        assert_eq!(
            BatchError::NoAudioFiles {
                dir: "in".to_string()
            }
            .code(),
            2001
        );
        assert_eq!(BatchError::EmptyBatch.code(), 2002);
        assert_eq!(
            BatchError::Io {
                details: "x".to_string()
            }
            .code(),
            2003
        );
        assert_eq!(
            BatchError::ExportFailed {
                reason: "x".to_string()
            }
            .code(),
            2004
        );
    }

    #[test]
    fn test_batch_error_messages() {
        let err = BatchError::NoAudioFiles {
            dir: "tracks/".to_string(),
        };
        assert_eq!(err.message(), "No audio files found in tracks/");
        assert!(BatchError::EmptyBatch.message().contains("nothing to aggregate"));
    }
}
