//! Text rendering of conversions and history

use gauge_core::ResultFormatter;
use gauge_units::ConversionResult;
use crate::HistoryRecord;

/// Shown when the session has no history
pub const EMPTY_HISTORY: &str = "No conversion history yet";

/// One-line summary: input fixed-point, result through the formatter.
///
/// `1.0000 Kilometers = 1000.0000 Meters`
pub fn summary(input: f64, result: &ConversionResult, formatter: &ResultFormatter) -> String {
    format!(
        "{} {} = {} {}",
        ResultFormatter::fixed(input, formatter.precision()),
        result.from_unit,
        formatter.format(result.value),
        result.to_unit
    )
}

/// `Length: 1.00 Kilometers ➜ 1000.00 Meters`
pub fn history_line(record: &HistoryRecord, precision: u32) -> String {
    format!(
        "{}: {} {} ➜ {} {}",
        record.category,
        ResultFormatter::fixed(record.from_value, precision),
        record.from_unit,
        ResultFormatter::fixed(record.to_value, precision),
        record.to_unit
    )
}

/// Render every record, or the placeholder when there are none
pub fn history_lines(records: &[HistoryRecord], precision: u32) -> Vec<String> {
    if records.is_empty() {
        return vec![EMPTY_HISTORY.to_string()];
    }
    records.iter().map(|r| history_line(r, precision)).collect()
}
