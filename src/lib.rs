// Music Describer - audio analysis and text description generation
// Feature extraction, heuristic classification, batch reporting

// Module declarations
pub mod analysis;
pub mod audio;
pub mod batch;
pub mod config;
pub mod describe;
pub mod error;
pub mod record;
pub mod testing;

#[cfg(feature = "http")]
pub mod http;

// Re-exports for convenience
pub use analysis::Analyzer;
pub use config::AppConfig;
pub use describe::{DescriptionFormat, DescriptionSet};
pub use record::AnalysisRecord;
