//! Gauge - unit conversion sessions
//!
//! A `Gauge` is one interactive session: the conversion engine, the
//! session's display settings and its rolling history. Each session owns
//! its own history; nothing is shared between sessions.

mod history;
mod render;
mod settings;

pub use history::{HistoryRecord, HistoryStore, HISTORY_CAPACITY};
pub use render::{history_line, history_lines, summary, EMPTY_HISTORY};
pub use settings::DisplaySettings;

use gauge_core::{ConversionError, ResultFormatter};
use gauge_units::{parse_query, Category, ConversionEngine, ConversionRequest, ConversionResult, QueryError};
use serde::Serialize;

/// A completed, formatted conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub input: f64,
    pub result: ConversionResult,
    /// Result rendered with the effective formatter
    pub formatted: String,
    /// `"<input> <from> = <formatted> <to>"`
    pub summary: String,
}

/// One conversion session
#[derive(Debug, Clone)]
pub struct Gauge {
    engine: ConversionEngine,
    settings: DisplaySettings,
    history: HistoryStore,
}

impl Gauge {
    pub fn new(engine: ConversionEngine) -> Self {
        Self {
            engine,
            settings: DisplaySettings::default(),
            history: HistoryStore::new(),
        }
    }

    /// Session over the built-in categories
    pub fn standard() -> Self {
        Self::new(ConversionEngine::standard())
    }

    pub fn with_settings(mut self, settings: DisplaySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn engine(&self) -> &ConversionEngine {
        &self.engine
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn set_precision(&mut self, precision: u32) {
        self.settings.precision = ResultFormatter::clamp_precision(precision);
    }

    pub fn set_scientific(&mut self, scientific: bool) {
        self.settings.scientific = scientific;
    }

    /// Convert with the session formatter and record the result
    pub fn convert(&mut self, request: &ConversionRequest) -> Result<Conversion, ConversionError> {
        let formatter = self.settings.formatter();
        self.convert_with(request, &formatter)
    }

    /// Convert with a one-off formatter; session settings are untouched
    pub fn convert_with(
        &mut self,
        request: &ConversionRequest,
        formatter: &ResultFormatter,
    ) -> Result<Conversion, ConversionError> {
        let result = self.engine.convert(request)?;
        self.history.record(HistoryRecord::new(request.value, &result));

        Ok(Conversion {
            input: request.value,
            formatted: formatter.format(result.value),
            summary: summary(request.value, &result, formatter),
            result,
        })
    }

    /// Parse and run a query such as "5 Kilometers to Miles"
    pub fn convert_query(&mut self, category: Option<&str>, query: &str) -> Result<Conversion, QueryError> {
        let formatter = self.settings.formatter();
        self.convert_query_with(category, query, &formatter)
    }

    pub fn convert_query_with(
        &mut self,
        category: Option<&str>,
        query: &str,
        formatter: &ResultFormatter,
    ) -> Result<Conversion, QueryError> {
        let request = parse_query(self.engine.registry(), category, query)?;
        tracing::debug!(query, category = %request.category, "parsed query");
        Ok(self.convert_with(&request, formatter)?)
    }

    pub fn categories(&self) -> &[Category] {
        self.engine.list_categories()
    }

    pub fn units(&self, category: &str) -> Result<&[String], ConversionError> {
        self.engine.list_units(category)
    }

    /// Default (from, to) selection for a category.
    ///
    /// Both default to the first unit in display order; the session may
    /// prefer a different source unit.
    pub fn default_units(&self, category: &str) -> Result<(String, String), ConversionError> {
        let category = self.engine.category(category)?;
        let first = category.default_unit()
            .ok_or_else(|| ConversionError::unknown_unit(&category.name, ""))?
            .to_string();
        let from = self.settings.default_units.get(&category.name)
            .filter(|unit| category.has_unit(unit))
            .cloned()
            .unwrap_or_else(|| first.clone());
        Ok((from, first))
    }

    /// Prefer `unit` as the default source unit of `category`
    pub fn set_default_unit(&mut self, category: &str, unit: &str) -> Result<(), ConversionError> {
        let found = self.engine.category(category)?;
        if !found.has_unit(unit) {
            return Err(ConversionError::unknown_unit(category, unit));
        }
        self.settings.default_units.insert(category.to_string(), unit.to_string());
        Ok(())
    }

    /// Recent conversions, newest first
    pub fn history(&self) -> &[HistoryRecord] {
        self.history.list()
    }

    /// History rendered at the session precision
    pub fn history_lines(&self) -> Vec<String> {
        history_lines(self.history.list(), self.settings.precision)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Self::standard()
    }
}
