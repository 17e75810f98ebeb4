//! # gazette-core
//!
//! Core types for the Gazette log engine: the `LogRecord` model with its
//! normalization rules, tag classification (meaningful vs noise), the shared
//! error type, and the wire field names of the record schema.

pub mod error;
pub mod fields;
pub mod record;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use record::{LogRecord, MEANINGFUL_TAGS, NOISE_TAGS, SLOW_REQUEST_THRESHOLD_MS};
