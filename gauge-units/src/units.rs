//! Unit definitions - the built-in categories in display order

use std::collections::HashMap;
use crate::{Category, FactorTable};

/// Registry of conversion categories, ordered for display
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl UnitRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in category
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register_all_categories();
        registry
    }

    /// Add a category, replacing one with the same name in place
    pub fn with_category(mut self, category: Category) -> Self {
        self.register(category);
        self
    }

    /// Get a category by exact name
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.index.get(name).map(|&i| &self.categories[i])
    }

    /// All categories in display order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn register(&mut self, category: Category) {
        match self.index.get(&category.name) {
            Some(&i) => self.categories[i] = category,
            None => {
                self.index.insert(category.name.clone(), self.categories.len());
                self.categories.push(category);
            }
        }
    }

    fn register_all_categories(&mut self) {
        self.register_length();
        self.register_weight();
        self.register(Category::temperature("Temperature"));
        self.register_angle();
        self.register_speed();
        self.register_time();
        self.register_volume();
        self.register_pressure();
        self.register_energy();
        self.register_power();
        self.register_data_transfer_rate();
    }

    fn register_length(&mut self) {
        self.register(Category::linear("Length", FactorTable::builtin(&[
            ("Meters", 1.0),
            ("Kilometers", 1000.0),
            ("Miles", 1609.34),
            ("Feet", 0.3048),
            ("Inches", 0.0254),
            // Metric and imperial extras
            ("Yards", 0.9144),
            ("Centimeters", 0.01),
            ("Millimeters", 0.001),
        ])));
    }

    fn register_weight(&mut self) {
        self.register(Category::linear("Weight", FactorTable::builtin(&[
            ("Kilograms", 1.0),
            ("Grams", 0.001),
            ("Pounds", 0.453592),
            ("Ounces", 0.0283495),
        ])));
    }

    fn register_angle(&mut self) {
        // Calibrated for the to/from orientation; keep it inverted.
        self.register(Category::linear("Angle", FactorTable::builtin(&[
            ("Degrees", 1.0),
            ("Radians", 57.2958),
            ("Gradians", 0.9),
        ]).inverted()));
    }

    fn register_speed(&mut self) {
        self.register(Category::linear("Speed", FactorTable::builtin(&[
            ("Meters per second", 1.0),
            ("Kilometers per hour", 0.277778),
            ("Miles per hour", 0.44704),
            ("Knots", 0.514444),
        ])));
    }

    fn register_time(&mut self) {
        self.register(Category::linear("Time", FactorTable::builtin(&[
            ("Seconds", 1.0),
            ("Minutes", 60.0),
            ("Hours", 3600.0),
            ("Days", 86400.0),
            ("Weeks", 604800.0),
            ("Months", 2592000.0),  // 30 days
            ("Years", 31536000.0),  // 365 days
        ])));
    }

    fn register_volume(&mut self) {
        self.register(Category::linear("Volume", FactorTable::builtin(&[
            ("Liters", 1.0),
            ("Milliliters", 0.001),
            ("Cubic meters", 1000.0),
            ("Gallons (US)", 3.78541),
            ("Cubic feet", 28.3168),
        ])));
    }

    fn register_pressure(&mut self) {
        self.register(Category::linear("Pressure", FactorTable::builtin(&[
            ("Pascal", 1.0),
            ("Bar", 100000.0),
            ("PSI", 6894.76),
            ("Atmosphere", 101325.0),
            ("Kilopascal", 1000.0),
        ])));
    }

    fn register_energy(&mut self) {
        self.register(Category::linear("Energy", FactorTable::builtin(&[
            ("Joules", 1.0),
            ("Calories", 4.184),
            ("Kilowatt hours", 3600000.0),
            ("Electron volts", 1.602176634e-19),
            ("BTU", 1055.06),
        ])));
    }

    fn register_power(&mut self) {
        self.register(Category::linear("Power", FactorTable::builtin(&[
            ("Watts", 1.0),
            ("Kilowatts", 1000.0),
            ("Horsepower", 745.7),
            ("BTU/hour", 0.29307107),
        ])));
    }

    fn register_data_transfer_rate(&mut self) {
        self.register(Category::linear("Data Transfer Rate", FactorTable::builtin(&[
            ("Bits per second", 1.0),
            ("Kilobits per second", 1000.0),
            ("Megabits per second", 1e6),
            ("Gigabits per second", 1e9),
            ("Bytes per second", 8.0),
            ("Kilobytes per second", 8000.0),
            ("Megabytes per second", 8e6),
            ("Gigabytes per second", 8e9),
        ])));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConversionRule;

    #[test]
    fn test_display_order() {
        let registry = UnitRegistry::standard();
        assert_eq!(registry.names(), vec![
            "Length", "Weight", "Temperature", "Angle", "Speed", "Time",
            "Volume", "Pressure", "Energy", "Power", "Data Transfer Rate",
        ]);
    }

    #[test]
    fn test_every_linear_table_has_reference_unit() {
        let registry = UnitRegistry::standard();
        for category in registry.categories() {
            if let ConversionRule::LinearFactor(table) = category.rule() {
                assert_eq!(table.reference_unit(), category.default_unit(), "{}", category.name);
                assert_eq!(table.entries().len(), category.units().len());
            }
        }
    }

    #[test]
    fn test_builtin_tables_pass_validation() {
        let registry = UnitRegistry::standard();
        for category in registry.categories() {
            if let ConversionRule::LinearFactor(table) = category.rule() {
                let entries: Vec<(&str, f64)> = table.entries().iter()
                    .map(|(unit, factor)| (unit.as_str(), *factor))
                    .collect();
                assert!(FactorTable::new(&entries).is_ok(), "{}", category.name);
            }
        }
    }

    #[test]
    fn test_length_units() {
        let registry = UnitRegistry::standard();
        let length = registry.get("Length").unwrap();
        assert_eq!(length.units(), [
            "Meters", "Kilometers", "Miles", "Feet", "Inches",
            "Yards", "Centimeters", "Millimeters",
        ]);
    }

    #[test]
    fn test_unknown_category() {
        assert!(UnitRegistry::standard().get("Frobnicate").is_none());
        assert!(UnitRegistry::new().is_empty());
    }

    #[test]
    fn test_with_category_replaces_in_place() {
        let registry = UnitRegistry::standard()
            .with_category(Category::linear("Weight", FactorTable::new(&[("Grams", 1.0)]).unwrap()));
        assert_eq!(registry.len(), 11);
        assert_eq!(registry.names()[1], "Weight");
        assert_eq!(registry.get("Weight").unwrap().units(), ["Grams"]);
    }
}
