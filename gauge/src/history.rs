//! Rolling conversion history

use serde::{Deserialize, Serialize};
use gauge_units::ConversionResult;

/// Maximum number of records kept per session
pub const HISTORY_CAPACITY: usize = 5;

/// Snapshot of one completed conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub from_value: f64,
    pub from_unit: String,
    pub to_value: f64,
    pub to_unit: String,
    pub category: String,
}

impl HistoryRecord {
    pub fn new(input: f64, result: &ConversionResult) -> Self {
        HistoryRecord {
            from_value: input,
            from_unit: result.from_unit.clone(),
            to_value: result.value,
            to_unit: result.to_unit.clone(),
            category: result.category.clone(),
        }
    }
}

/// Newest-first list of recent conversions, never longer than
/// `HISTORY_CAPACITY`.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front, evicting the oldest past capacity
    pub fn record(&mut self, entry: HistoryRecord) {
        self.records.insert(0, entry);
        self.records.truncate(HISTORY_CAPACITY);
    }

    /// Records, newest first
    pub fn list(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: u32) -> HistoryRecord {
        HistoryRecord {
            from_value: n as f64,
            from_unit: "Kilometers".into(),
            to_value: n as f64 * 1000.0,
            to_unit: "Meters".into(),
            category: "Length".into(),
        }
    }

    #[test]
    fn test_newest_first() {
        let mut store = HistoryStore::new();
        store.record(record(1));
        store.record(record(2));
        assert_eq!(store.list(), &[record(2), record(1)]);
    }

    #[test]
    fn test_capped_at_five() {
        let mut store = HistoryStore::new();
        for n in 1..=7 {
            store.record(record(n));
        }
        assert_eq!(store.len(), HISTORY_CAPACITY);
        let kept: Vec<f64> = store.list().iter().map(|r| r.from_value).collect();
        assert_eq!(kept, vec![7.0, 6.0, 5.0, 4.0, 3.0]);
    }

    #[test]
    fn test_list_does_not_mutate() {
        let mut store = HistoryStore::new();
        store.record(record(1));
        let first = store.list().to_vec();
        let second = store.list().to_vec();
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut store = HistoryStore::new();
        store.record(record(1));
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_from_result() {
        let result = ConversionResult {
            value: 32.0,
            from_unit: "Celsius".into(),
            to_unit: "Fahrenheit".into(),
            category: "Temperature".into(),
        };
        let r = HistoryRecord::new(0.0, &result);
        assert_eq!(r.from_value, 0.0);
        assert_eq!(r.to_value, 32.0);
        assert_eq!(r.category, "Temperature");
    }
}
