//! Conversion rules
//!
//! A category converts either by scaling through a table of per-unit
//! factors, or (temperature) by bridging through Celsius.

use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// How a factor table turns (value, from, to) into a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorOrientation {
    /// `value * factor[from] / factor[to]`
    FromOverTo,
    /// `value * factor[to] / factor[from]` (Angle)
    ToOverFrom,
}

/// Invalid factor table input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("factor for {unit} must be a positive finite number, got {factor}")]
    NonPositiveFactor { unit: String, factor: f64 },

    #[error("duplicate unit {0}")]
    DuplicateUnit(String),
}

/// Ordered unit → factor mapping. Every factor is strictly positive and
/// every unit appears once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorTable {
    entries: Vec<(String, f64)>,
    orientation: FactorOrientation,
}

impl FactorTable {
    /// Build a table in display order
    pub fn new(entries: &[(&str, f64)]) -> Result<Self, TableError> {
        let mut table = Self::empty(entries.len());
        for &(unit, factor) in entries {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(TableError::NonPositiveFactor { unit: unit.to_string(), factor });
            }
            if table.factor(unit).is_some() {
                return Err(TableError::DuplicateUnit(unit.to_string()));
            }
            table.entries.push((unit.to_string(), factor));
        }
        Ok(table)
    }

    /// Built-in tables; `units::tests` checks them against `new`
    pub(crate) fn builtin(entries: &[(&str, f64)]) -> Self {
        let mut table = Self::empty(entries.len());
        table.entries.extend(entries.iter().map(|&(unit, factor)| (unit.to_string(), factor)));
        table
    }

    fn empty(capacity: usize) -> Self {
        FactorTable {
            entries: Vec::with_capacity(capacity),
            orientation: FactorOrientation::FromOverTo,
        }
    }

    /// Switch to the `factor[to] / factor[from]` orientation
    pub fn inverted(mut self) -> Self {
        self.orientation = FactorOrientation::ToOverFrom;
        self
    }

    pub fn orientation(&self) -> FactorOrientation {
        self.orientation
    }

    pub fn factor(&self, unit: &str) -> Option<f64> {
        self.entries.iter()
            .find(|(name, _)| name == unit)
            .map(|(_, factor)| *factor)
    }

    /// Unit names in display order
    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    /// The unit whose factor is exactly 1, if any
    pub fn reference_unit(&self) -> Option<&str> {
        self.entries.iter()
            .find(|(_, factor)| *factor == 1.0)
            .map(|(name, _)| name.as_str())
    }

    /// Apply the table to already-validated factors
    pub fn scale(&self, value: f64, from_factor: f64, to_factor: f64) -> f64 {
        match self.orientation {
            FactorOrientation::FromOverTo => value * from_factor / to_factor,
            FactorOrientation::ToOverFrom => value * to_factor / from_factor,
        }
    }
}

/// Temperature scales understood by the Celsius bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    /// All scales in display order
    pub const ALL: [TemperatureScale; 3] = [
        TemperatureScale::Celsius,
        TemperatureScale::Fahrenheit,
        TemperatureScale::Kelvin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "Celsius",
            TemperatureScale::Fahrenheit => "Fahrenheit",
            TemperatureScale::Kelvin => "Kelvin",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|scale| scale.name() == name)
    }

    pub fn to_celsius(&self, value: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => value,
            TemperatureScale::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureScale::Kelvin => value - 273.15,
        }
    }

    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureScale::Kelvin => celsius + 273.15,
        }
    }

    /// Convert between scales. Identical scales return `value` untouched.
    pub fn convert(&self, value: f64, target: TemperatureScale) -> f64 {
        if *self == target {
            return value;
        }
        let celsius = self.to_celsius(value);
        tracing::trace!(from = self.name(), celsius, "temperature bridge");
        target.from_celsius(celsius)
    }
}

impl fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a category converts between its units
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionRule {
    LinearFactor(FactorTable),
    Temperature,
}

impl ConversionRule {
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionRule::LinearFactor(_) => "linear_factor",
            ConversionRule::Temperature => "temperature",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_lookup() {
        let table = FactorTable::new(&[("Meters", 1.0), ("Kilometers", 1000.0)]).unwrap();
        assert_eq!(table.factor("Kilometers"), Some(1000.0));
        assert_eq!(table.factor("Parsecs"), None);
        assert_eq!(table.reference_unit(), Some("Meters"));
        assert_eq!(table.units().collect::<Vec<_>>(), vec!["Meters", "Kilometers"]);
    }

    #[test]
    fn test_scale_orientation() {
        let table = FactorTable::new(&[("A", 1.0), ("B", 4.0)]).unwrap();
        assert_eq!(table.scale(2.0, 4.0, 1.0), 8.0);

        let inverted = table.inverted();
        assert_eq!(inverted.orientation(), FactorOrientation::ToOverFrom);
        assert_eq!(inverted.scale(2.0, 4.0, 1.0), 0.5);
    }

    #[test]
    fn test_rejects_bad_factors() {
        for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = FactorTable::new(&[("A", 1.0), ("B", factor)]).unwrap_err();
            assert!(matches!(err, TableError::NonPositiveFactor { ref unit, .. } if unit == "B"));
        }
    }

    #[test]
    fn test_rejects_duplicate_unit() {
        let err = FactorTable::new(&[("A", 1.0), ("A", 2.0)]).unwrap_err();
        assert_eq!(err, TableError::DuplicateUnit("A".into()));
    }

    #[test]
    fn test_temperature_fixed_points() {
        use TemperatureScale::*;
        assert_eq!(Celsius.convert(0.0, Fahrenheit), 32.0);
        assert_eq!(Celsius.convert(100.0, Fahrenheit), 212.0);
        assert_eq!(Celsius.convert(0.0, Kelvin), 273.15);
        assert_eq!(Fahrenheit.convert(212.0, Celsius), 100.0);
        assert!((Kelvin.convert(0.0, Fahrenheit) - -459.67).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_identity_skips_bridge() {
        // 0.1 F would drift through the Celsius bridge
        let value = 0.1;
        assert_eq!(TemperatureScale::Fahrenheit.convert(value, TemperatureScale::Fahrenheit), value);
    }

    #[test]
    fn test_scale_names() {
        for scale in TemperatureScale::ALL {
            assert_eq!(TemperatureScale::from_name(scale.name()), Some(scale));
        }
        assert_eq!(TemperatureScale::from_name("Rankine"), None);
    }

    #[test]
    fn test_rule_kind() {
        let rule = ConversionRule::LinearFactor(FactorTable::new(&[("A", 1.0)]).unwrap());
        assert_eq!(rule.kind(), "linear_factor");
        assert_eq!(ConversionRule::Temperature.kind(), "temperature");
    }
}
