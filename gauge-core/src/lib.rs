//! Gauge Core - Fundamental types
//!
//! This crate provides the core types used throughout Gauge:
//! - `ConversionError`: Validation failures raised by the conversion engine
//! - `GaugeError`: Structured errors for protocol consumers
//! - `ResultFormatter`: Fixed-point / scientific rendering of results

mod error;
mod format;

pub use error::{ConversionError, GaugeError, Severity, codes};
pub use format::{ResultFormatter, MAX_PRECISION, SCIENTIFIC_THRESHOLD};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{ConversionError, GaugeError, ResultFormatter, Severity};
    pub use crate::error::codes;
}
