//! Testability helpers.
//!
//! Synthetic signal generators used by unit tests, integration tests and
//! anyone who needs reproducible audio without shipping fixture files.

pub mod signals;
