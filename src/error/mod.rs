// Error types for the music describer
//
// This module defines custom error types for per-file analysis, batch
// aggregation and description rendering, each carrying a stable numeric code.

mod analysis;
mod batch;
mod render;

pub use analysis::{log_analysis_error, AnalysisError, AnalysisErrorCodes};
pub use batch::{log_batch_error, BatchError, BatchErrorCodes};
pub use render::{log_render_error, RenderError, RenderErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the CLI, batch runner and HTTP surface.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
