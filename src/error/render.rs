// Render error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Render error code constants
///
/// Error code range: 3001
pub struct RenderErrorCodes {}

impl RenderErrorCodes {
    /// A record reached the renderer with an out-of-range field
    pub const INVARIANT_VIOLATION: i32 = 3001;
}

/// Log a render error with structured context
pub fn log_render_error(err: &RenderError, context: &str) {
    error!(
        "Render error in {}: code={}, component=DescriptionSet, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Rendering errors
///
/// Unreachable for records built by [`crate::record::RecordBuilder`]; any
/// occurrence is a programming defect, not a recoverable condition.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Field outside its documented range
    InvariantViolation { field: String },
}

impl ErrorCode for RenderError {
    fn code(&self) -> i32 {
        match self {
            RenderError::InvariantViolation { .. } => RenderErrorCodes::INVARIANT_VIOLATION,
        }
    }

    fn message(&self) -> String {
        match self {
            RenderError::InvariantViolation { field } => {
                format!("Record field '{}' is outside its documented range", field)
            }
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RenderError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for RenderError {}
