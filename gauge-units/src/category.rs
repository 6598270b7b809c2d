//! Conversion categories

use serde::Serialize;
use gauge_core::ConversionError;
use crate::rule::{ConversionRule, FactorTable, TemperatureScale};

/// A closed domain of mutually convertible units.
///
/// Units are always derived from the rule, so every listed unit has a
/// factor (or a temperature scale) and nothing else does.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// Display name, also the lookup key (e.g. "Length")
    pub name: String,
    units: Vec<String>,
    rule: ConversionRule,
}

impl Category {
    /// Linear category; units follow the table's order
    pub fn linear(name: &str, table: FactorTable) -> Self {
        Category {
            name: name.to_string(),
            units: table.units().map(str::to_string).collect(),
            rule: ConversionRule::LinearFactor(table),
        }
    }

    /// Temperature category over Celsius, Fahrenheit and Kelvin
    pub fn temperature(name: &str) -> Self {
        Category {
            name: name.to_string(),
            units: TemperatureScale::ALL.iter().map(|s| s.name().to_string()).collect(),
            rule: ConversionRule::Temperature,
        }
    }

    /// Unit names in display order; the first is the default selection
    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn rule(&self) -> &ConversionRule {
        &self.rule
    }

    pub fn has_unit(&self, unit: &str) -> bool {
        self.units.iter().any(|u| u == unit)
    }

    /// First unit in display order
    pub fn default_unit(&self) -> Option<&str> {
        self.units.first().map(String::as_str)
    }

    fn require_unit(&self, unit: &str) -> Result<(), ConversionError> {
        if self.has_unit(unit) {
            Ok(())
        } else {
            Err(ConversionError::unknown_unit(&self.name, unit))
        }
    }

    /// Convert `value` between two units of this category.
    ///
    /// Units are checked before the value, so a bad unit wins over a
    /// non-finite value.
    pub fn convert(&self, value: f64, from_unit: &str, to_unit: &str) -> Result<f64, ConversionError> {
        self.require_unit(from_unit)?;
        self.require_unit(to_unit)?;
        if !value.is_finite() {
            return Err(ConversionError::InvalidValue(value));
        }
        // Identity is exact; never round-trip through factors or Celsius
        if from_unit == to_unit {
            return Ok(value);
        }

        match &self.rule {
            ConversionRule::LinearFactor(table) => {
                let from = table.factor(from_unit)
                    .ok_or_else(|| ConversionError::unknown_unit(&self.name, from_unit))?;
                let to = table.factor(to_unit)
                    .ok_or_else(|| ConversionError::unknown_unit(&self.name, to_unit))?;
                Ok(table.scale(value, from, to))
            }
            ConversionRule::Temperature => {
                let from = TemperatureScale::from_name(from_unit)
                    .ok_or_else(|| ConversionError::unknown_unit(&self.name, from_unit))?;
                let to = TemperatureScale::from_name(to_unit)
                    .ok_or_else(|| ConversionError::unknown_unit(&self.name, to_unit))?;
                Ok(from.convert(value, to))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance() -> Category {
        Category::linear("Distance", FactorTable::new(&[("Meters", 1.0), ("Kilometers", 1000.0)]).unwrap())
    }

    #[test]
    fn test_linear_units_follow_table() {
        let c = distance();
        assert_eq!(c.units(), ["Meters", "Kilometers"]);
        assert_eq!(c.default_unit(), Some("Meters"));
    }

    #[test]
    fn test_convert_linear() {
        assert_eq!(distance().convert(2.5, "Kilometers", "Meters"), Ok(2500.0));
    }

    #[test]
    fn test_unit_checked_before_value() {
        let err = distance().convert(f64::NAN, "Meters", "Furlongs").unwrap_err();
        assert_eq!(err, ConversionError::unknown_unit("Distance", "Furlongs"));

        let err = distance().convert(f64::INFINITY, "Meters", "Kilometers").unwrap_err();
        assert!(matches!(err, ConversionError::InvalidValue(v) if v.is_infinite()));
    }

    #[test]
    fn test_identity_is_exact() {
        let c = Category::linear("Rate", FactorTable::new(&[("A", 1.0), ("B", 1609.34)]).unwrap());
        for value in [0.1, 1e308, -7.3e-310] {
            assert_eq!(c.convert(value, "B", "B"), Ok(value));
        }
    }

    #[test]
    fn test_units_always_match_table() {
        let table = FactorTable::new(&[("A", 1.0), ("B", 2.0)]).unwrap();
        let c = Category::linear("Pair", table.clone());
        assert_eq!(c.units().len(), table.entries().len());
        for unit in c.units() {
            assert!(table.factor(unit).is_some(), "{} listed without a factor", unit);
        }
        assert!(!c.has_unit("Ghost"));
        assert_eq!(c.convert(1.0, "A", "Ghost"), Err(ConversionError::unknown_unit("Pair", "Ghost")));
    }

    #[test]
    fn test_temperature_category() {
        let c = Category::temperature("Temperature");
        assert_eq!(c.units(), ["Celsius", "Fahrenheit", "Kelvin"]);
        assert_eq!(c.convert(100.0, "Celsius", "Fahrenheit"), Ok(212.0));
        assert!(c.convert(1.0, "Celsius", "Rankine").is_err());
    }
}
