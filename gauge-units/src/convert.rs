//! Conversion engine

use std::sync::Arc;
use serde::{Serialize, Deserialize};
use gauge_core::ConversionError;
use crate::{Category, UnitRegistry};

/// A single conversion to perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub category: String,
    pub from_unit: String,
    pub to_unit: String,
    pub value: f64,
}

impl ConversionRequest {
    pub fn new(category: &str, from_unit: &str, to_unit: &str, value: f64) -> Self {
        ConversionRequest {
            category: category.to_string(),
            from_unit: from_unit.to_string(),
            to_unit: to_unit.to_string(),
            value,
        }
    }
}

/// Computed value paired with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
    pub category: String,
}

/// Pure conversion over a fixed registry
#[derive(Debug, Clone)]
pub struct ConversionEngine {
    registry: Arc<UnitRegistry>,
}

impl ConversionEngine {
    pub fn new(registry: UnitRegistry) -> Self {
        Self { registry: Arc::new(registry) }
    }

    /// Engine over the built-in categories
    pub fn standard() -> Self {
        Self::new(UnitRegistry::standard())
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    /// Categories in display order
    pub fn list_categories(&self) -> &[Category] {
        self.registry.categories()
    }

    /// Units of a category in display order
    pub fn list_units(&self, category: &str) -> Result<&[String], ConversionError> {
        Ok(self.category(category)?.units())
    }

    pub fn category(&self, name: &str) -> Result<&Category, ConversionError> {
        self.registry.get(name)
            .ok_or_else(|| ConversionError::UnknownCategory(name.to_string()))
    }

    /// Convert a value.
    ///
    /// Validation order: category, then units, then value.
    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, ConversionError> {
        let category = self.category(&request.category)?;
        let value = category.convert(request.value, &request.from_unit, &request.to_unit)?;

        tracing::debug!(
            category = %category.name,
            from = %request.from_unit,
            to = %request.to_unit,
            input = request.value,
            result = value,
            "converted"
        );

        Ok(ConversionResult {
            value,
            from_unit: request.from_unit.clone(),
            to_unit: request.to_unit.clone(),
            category: category.name.clone(),
        })
    }
}

impl Default for ConversionEngine {
    fn default() -> Self {
        Self::standard()
    }
}
