// Analysis error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Analysis error code constants
///
/// Every variant of [`AnalysisError`] aborts the analysis of a single file;
/// no partial record is ever produced.
///
/// Error code range: 1001-1006
pub struct AnalysisErrorCodes {}

impl AnalysisErrorCodes {
    /// Input file does not exist
    pub const FILE_NOT_FOUND: i32 = 1001;

    /// Extension is not one of the supported audio formats
    pub const UNSUPPORTED_FORMAT: i32 = 1002;

    /// Decoder rejected the file contents
    pub const DECODE_FAILED: i32 = 1003;

    /// File decoded to zero samples
    pub const EMPTY_AUDIO: i32 = 1004;

    /// Filesystem error while reading the file
    pub const IO: i32 = 1005;

    /// Conversion to the analysis sample rate failed
    pub const RESAMPLE_FAILED: i32 = 1006;
}

/// Log an analysis error with structured context
///
/// Used by the batch runner, which logs and skips failed files instead of
/// aborting the run.
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    error!(
        "Analysis error in {}: code={}, component=Analyzer, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Per-file analysis errors
///
/// These errors cover loading, decoding and validating one audio input.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Input path does not exist
    FileNotFound { path: String },

    /// Extension not in the supported list
    UnsupportedFormat { path: String, extension: String },

    /// Audio payload could not be decoded
    DecodeFailed { path: String, reason: String },

    /// Audio decoded to no samples
    EmptyAudio { path: String },

    /// Underlying I/O failure
    Io { details: String },

    /// Sample-rate conversion could not be set up or run
    ResampleFailed { sample_rate: u32, reason: String },
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::FileNotFound { .. } => AnalysisErrorCodes::FILE_NOT_FOUND,
            AnalysisError::UnsupportedFormat { .. } => AnalysisErrorCodes::UNSUPPORTED_FORMAT,
            AnalysisError::DecodeFailed { .. } => AnalysisErrorCodes::DECODE_FAILED,
            AnalysisError::EmptyAudio { .. } => AnalysisErrorCodes::EMPTY_AUDIO,
            AnalysisError::Io { .. } => AnalysisErrorCodes::IO,
            AnalysisError::ResampleFailed { .. } => AnalysisErrorCodes::RESAMPLE_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            AnalysisError::FileNotFound { path } => format!("Audio file not found: {}", path),
            AnalysisError::UnsupportedFormat { path, extension } => {
                format!("Unsupported audio format '{}' for {}", extension, path)
            }
            AnalysisError::DecodeFailed { path, reason } => {
                format!("Failed to decode {}: {}", path, reason)
            }
            AnalysisError::EmptyAudio { path } => format!("No audio samples in {}", path),
            AnalysisError::Io { details } => format!("I/O error: {}", details),
            AnalysisError::ResampleFailed {
                sample_rate,
                reason,
            } => format!("Failed to resample from {} Hz: {}", sample_rate, reason),
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnalysisError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AnalysisError {}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::Io {
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_error_codes() {
        assert_eq!(
            AnalysisError::FileNotFound {
                path: "x".to_string()
            }
            .code(),
            AnalysisErrorCodes::FILE_NOT_FOUND
        );
        assert_eq!(
            AnalysisError::UnsupportedFormat {
                path: "x.txt".to_string(),
                extension: "txt".to_string()
            }
            .code(),
            AnalysisErrorCodes::UNSUPPORTED_FORMAT
        );
        assert_eq!(
            AnalysisError::DecodeFailed {
                path: "x".to_string(),
                reason: "bad header".to_string()
            }
            .code(),
            AnalysisErrorCodes::DECODE_FAILED
        );
        assert_eq!(
            AnalysisError::EmptyAudio {
                path: "x".to_string()
            }
            .code(),
            AnalysisErrorCodes::EMPTY_AUDIO
        );
        assert_eq!(
            AnalysisError::Io {
                details: "x".to_string()
            }
            .code(),
            AnalysisErrorCodes::IO
        );
        assert_eq!(
            AnalysisError::ResampleFailed {
                sample_rate: 0,
                reason: "x".to_string()
            }
            .code(),
            AnalysisErrorCodes::RESAMPLE_FAILED
        );
    }

    #[test]
    fn test_analysis_error_messages() {
        let err = AnalysisError::UnsupportedFormat {
            path: "notes.txt".to_string(),
            extension: "txt".to_string(),
        };
        assert_eq!(
            err.message(),
            "Unsupported audio format 'txt' for notes.txt"
        );

        let err = AnalysisError::FileNotFound {
            path: "missing.wav".to_string(),
        };
        assert!(err.message().contains("missing.wav"));
    }

    #[test]
    fn test_analysis_error_display() {
        let err = AnalysisError::EmptyAudio {
            path: "silence.wav".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("AnalysisError"));
        assert!(display.contains(&err.code().to_string()));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::other("disk on fire");
        let err: AnalysisError = io_err.into();
        match err {
            AnalysisError::Io { details } => assert!(details.contains("disk on fire")),
            _ => panic!("Expected Io"),
        }
    }
}
