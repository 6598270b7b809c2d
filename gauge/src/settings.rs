//! Session display settings

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use gauge_core::ResultFormatter;

/// Precision, notation and preferred default units for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Decimal places, `0..=10`
    pub precision: u32,
    /// Use scientific notation for very small magnitudes
    pub scientific: bool,
    /// Preferred default source unit per category
    #[serde(default)]
    pub default_units: HashMap<String, String>,
}

impl DisplaySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = ResultFormatter::clamp_precision(precision);
        self
    }

    pub fn with_scientific(mut self, scientific: bool) -> Self {
        self.scientific = scientific;
        self
    }

    /// Unchecked; `Gauge::set_default_unit` validates against the registry
    pub fn with_default_unit(mut self, category: &str, unit: &str) -> Self {
        self.default_units.insert(category.to_string(), unit.to_string());
        self
    }

    pub fn formatter(&self) -> ResultFormatter {
        ResultFormatter::new(self.precision, self.scientific)
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            precision: 4,
            scientific: false,
            default_units: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = DisplaySettings::default();
        assert_eq!(s.precision, 4);
        assert!(!s.scientific);
        assert!(s.default_units.is_empty());
    }

    #[test]
    fn test_builder_clamps_precision() {
        let s = DisplaySettings::new().with_precision(42).with_scientific(true);
        assert_eq!(s.precision, 10);
        assert_eq!(s.formatter(), ResultFormatter::new(10, true));
    }

    #[test]
    fn test_default_unit() {
        let s = DisplaySettings::new().with_default_unit("Length", "Feet");
        assert_eq!(s.default_units.get("Length").map(String::as_str), Some("Feet"));
    }
}
