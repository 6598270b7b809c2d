//! Conversion errors and structured errors for protocol consumers
//!
//! Engine failures are plain enum values. At the server boundary they are
//! lifted into `GaugeError`, which carries a machine-readable code and a
//! suggestion for the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_CATEGORY: &str = "UNKNOWN_CATEGORY";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const INVALID_VALUE: &str = "INVALID_VALUE";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const AMBIGUOUS_UNIT: &str = "AMBIGUOUS_UNIT";
    pub const INCOMPATIBLE_UNITS: &str = "INCOMPATIBLE_UNITS";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Validation failure from the conversion engine.
///
/// None of these are retryable; the caller is expected to re-prompt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown unit '{unit}' for category {category}")]
    UnknownUnit { category: String, unit: String },

    #[error("Invalid value: {0} is not a finite number")]
    InvalidValue(f64),
}

impl ConversionError {
    pub fn unknown_unit(category: impl Into<String>, unit: impl Into<String>) -> Self {
        ConversionError::UnknownUnit {
            category: category.into(),
            unit: unit.into(),
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConversionError::UnknownCategory(_) => codes::UNKNOWN_CATEGORY,
            ConversionError::UnknownUnit { .. } => codes::UNKNOWN_UNIT,
            ConversionError::InvalidValue(_) => codes::INVALID_VALUE,
        }
    }
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Request rejected, session continues
    Error,
    /// Server cannot continue
    Fatal,
}

/// Structured error returned to protocol clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Severity level
    pub severity: Severity,
}

impl GaugeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
            .with_suggestion("Write queries as '<value> <unit> to <unit>', e.g. '5 Kilometers to Miles'")
    }

    pub fn arg_type(tool: &str, arg: &str, expected: &str) -> Self {
        Self::new(codes::ARG_TYPE, format!("{}: argument '{}' must be {}", tool, arg, expected))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for GaugeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for GaugeError {}

impl From<ConversionError> for GaugeError {
    fn from(err: ConversionError) -> Self {
        let suggestion = match &err {
            ConversionError::UnknownCategory(_) => "Use list_categories to see available categories".to_string(),
            ConversionError::UnknownUnit { category, .. } => {
                format!("Use list_units(\"{}\") to see valid units", category)
            }
            ConversionError::InvalidValue(_) => "Provide a finite number".to_string(),
        };
        Self::new(err.code(), err.to_string()).with_suggestion(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            ConversionError::UnknownCategory("Frobnicate".into()),
            ConversionError::unknown_unit("Length", "Parsecs"),
            ConversionError::InvalidValue(f64::NAN),
        ];
        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes, vec![codes::UNKNOWN_CATEGORY, codes::UNKNOWN_UNIT, codes::INVALID_VALUE]);
    }

    #[test]
    fn test_display_messages() {
        let err = ConversionError::unknown_unit("Length", "Parsecs");
        assert_eq!(err.to_string(), "Unknown unit 'Parsecs' for category Length");

        let err = ConversionError::InvalidValue(f64::INFINITY);
        assert_eq!(err.to_string(), "Invalid value: inf is not a finite number");
    }

    #[test]
    fn test_from_conversion_error() {
        let err: GaugeError = ConversionError::unknown_unit("Length", "Parsecs").into();
        assert_eq!(err.code, codes::UNKNOWN_UNIT);
        assert_eq!(err.severity, Severity::Error);
        assert!(err.suggestion.unwrap().contains("list_units(\"Length\")"));
    }

    #[test]
    fn test_serialize_skips_empty_suggestion() {
        let err = GaugeError::new(codes::INVALID_VALUE, "bad");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INVALID_VALUE");
        assert_eq!(json["severity"], "error");
        assert!(json.get("suggestion").is_none());
    }

    #[test]
    fn test_display_includes_suggestion() {
        let err = GaugeError::internal("boom");
        assert_eq!(
            err.to_string(),
            "[INTERNAL] Internal error: boom (suggestion: This is a bug, please report it)"
        );
    }
}
