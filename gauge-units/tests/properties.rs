//! Property tests for the conversion engine
//!
//! Round-trips through every linear category and identity for every unit.

use gauge_units::{ConversionEngine, ConversionRequest, ConversionRule};
use proptest::prelude::*;

fn engine() -> ConversionEngine {
    ConversionEngine::standard()
}

/// (category, from, to) for every ordered unit pair of every linear category
fn linear_pairs() -> Vec<(String, String, String)> {
    let engine = engine();
    let mut pairs = Vec::new();
    for category in engine.list_categories() {
        if let ConversionRule::LinearFactor(_) = category.rule() {
            for a in category.units() {
                for b in category.units() {
                    pairs.push((category.name.clone(), a.clone(), b.clone()));
                }
            }
        }
    }
    pairs
}

fn every_unit() -> Vec<(String, String)> {
    let engine = engine();
    engine.list_categories().iter()
        .flat_map(|c| c.units().iter().map(move |u| (c.name.clone(), u.clone())))
        .collect()
}

fn close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}

proptest! {
    #[test]
    fn round_trip_linear(
        (category, a, b) in proptest::sample::select(linear_pairs()),
        x in -1e12f64..1e12f64,
    ) {
        let engine = engine();
        let there = engine.convert(&ConversionRequest::new(&category, &a, &b, x)).unwrap();
        let back = engine.convert(&ConversionRequest::new(&category, &b, &a, there.value)).unwrap();
        prop_assert!(close(back.value, x), "{} {} -> {} -> {}: {} vs {}", category, a, b, a, back.value, x);
    }

    #[test]
    fn identity_is_exact(
        (category, unit) in proptest::sample::select(every_unit()),
        x in proptest::num::f64::NORMAL | proptest::num::f64::ZERO | proptest::num::f64::SUBNORMAL,
    ) {
        let result = engine().convert(&ConversionRequest::new(&category, &unit, &unit, x)).unwrap();
        prop_assert_eq!(result.value.to_bits(), x.to_bits());
    }

    #[test]
    fn non_finite_values_rejected(
        (category, unit) in proptest::sample::select(every_unit()),
        x in prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)],
    ) {
        let err = engine().convert(&ConversionRequest::new(&category, &unit, &unit, x)).unwrap_err();
        prop_assert_eq!(err.code(), gauge_core::codes::INVALID_VALUE);
    }
}

#[test]
fn temperature_round_trip() {
    let engine = engine();
    for from in ["Celsius", "Fahrenheit", "Kelvin"] {
        for to in ["Celsius", "Fahrenheit", "Kelvin"] {
            for x in [-40.0, 0.0, 36.6, 100.0, 451.0] {
                let there = engine.convert(&ConversionRequest::new("Temperature", from, to, x)).unwrap();
                let back = engine.convert(&ConversionRequest::new("Temperature", to, from, there.value)).unwrap();
                assert!((back.value - x).abs() < 1e-9, "{} -> {} -> {}: {}", from, to, from, back.value);
            }
        }
    }
}
