//! Free-text query parsing - "5 Kilometers to Miles", "212 °F -> C"

use thiserror::Error;
use gauge_core::{codes, ConversionError, GaugeError};
use crate::{Category, ConversionRequest, UnitRegistry};

/// Separators between the source quantity and the target unit
const SEPARATORS: [&str; 4] = ["->", "→", " to ", " in "];

/// Abbreviations and symbols, matched case-insensitively
static ALIASES: &[(&str, &str)] = &[
    // Length
    ("m", "Meters"), ("metre", "Meters"), ("metres", "Meters"),
    ("km", "Kilometers"), ("kilometre", "Kilometers"), ("kilometres", "Kilometers"),
    ("mi", "Miles"), ("ft", "Feet"), ("foot", "Feet"),
    ("in", "Inches"), ("inch", "Inches"), ("yd", "Yards"),
    ("cm", "Centimeters"), ("mm", "Millimeters"),
    // Weight
    ("kg", "Kilograms"), ("g", "Grams"), ("lb", "Pounds"), ("lbs", "Pounds"), ("oz", "Ounces"),
    // Temperature
    ("c", "Celsius"), ("°c", "Celsius"), ("degc", "Celsius"),
    ("f", "Fahrenheit"), ("°f", "Fahrenheit"), ("degf", "Fahrenheit"),
    ("k", "Kelvin"),
    // Angle
    ("deg", "Degrees"), ("°", "Degrees"), ("rad", "Radians"), ("grad", "Gradians"), ("gon", "Gradians"),
    // Speed
    ("m/s", "Meters per second"), ("mps", "Meters per second"),
    ("km/h", "Kilometers per hour"), ("kph", "Kilometers per hour"), ("kmh", "Kilometers per hour"),
    ("mph", "Miles per hour"), ("kn", "Knots"), ("kt", "Knots"),
    // Time
    ("s", "Seconds"), ("sec", "Seconds"), ("min", "Minutes"), ("h", "Hours"), ("hr", "Hours"),
    ("d", "Days"), ("wk", "Weeks"), ("mo", "Months"), ("yr", "Years"),
    // Volume
    ("l", "Liters"), ("litre", "Liters"), ("litres", "Liters"), ("ml", "Milliliters"),
    ("m3", "Cubic meters"), ("m³", "Cubic meters"), ("gal", "Gallons (US)"), ("gallon", "Gallons (US)"),
    ("gallons", "Gallons (US)"), ("ft3", "Cubic feet"), ("ft³", "Cubic feet"),
    // Pressure
    ("pa", "Pascal"), ("atm", "Atmosphere"), ("kpa", "Kilopascal"),
    // Energy
    ("j", "Joules"), ("cal", "Calories"), ("kwh", "Kilowatt hours"), ("ev", "Electron volts"),
    // Power
    ("w", "Watts"), ("kw", "Kilowatts"), ("hp", "Horsepower"), ("btu/h", "BTU/hour"), ("btu/hr", "BTU/hour"),
    // Data transfer rate
    ("bps", "Bits per second"), ("kbps", "Kilobits per second"),
    ("mbps", "Megabits per second"), ("gbps", "Gigabits per second"),
];

/// Errors from parsing a free-text query
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("expected '<value> <unit> to <unit>', got '{0}'")]
    MissingSeparator(String),

    #[error("no number found in '{0}'")]
    InvalidNumber(String),

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("unit '{unit}' is ambiguous between {}", .categories.join(", "))]
    Ambiguous { unit: String, categories: Vec<String> },

    #[error("cannot convert {from} ({from_category}) to {to} ({to_category})")]
    Incompatible {
        from: String,
        from_category: String,
        to: String,
        to_category: String,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl From<QueryError> for GaugeError {
    fn from(err: QueryError) -> Self {
        match &err {
            QueryError::Conversion(e) => e.clone().into(),
            QueryError::UnknownUnit(_) => GaugeError::new(codes::UNKNOWN_UNIT, err.to_string())
                .with_suggestion("Use list_units to see valid unit names"),
            QueryError::Ambiguous { .. } => GaugeError::new(codes::AMBIGUOUS_UNIT, err.to_string())
                .with_suggestion("Pass the category explicitly"),
            QueryError::Incompatible { .. } => GaugeError::new(codes::INCOMPATIBLE_UNITS, err.to_string())
                .with_suggestion("Both units must belong to the same category"),
            QueryError::MissingSeparator(_) | QueryError::InvalidNumber(_) => {
                GaugeError::parse_error(err.to_string())
            }
        }
    }
}

/// Parse a query like "5 Kilometers to Miles" into a request.
///
/// When `category` is `None` it is inferred from the source unit.
pub fn parse_query(
    registry: &UnitRegistry,
    category: Option<&str>,
    input: &str,
) -> Result<ConversionRequest, QueryError> {
    let input = input.trim();
    let (quantity, target) = split_query(input)
        .ok_or_else(|| QueryError::MissingSeparator(input.to_string()))?;
    let (value, source) = parse_quantity(quantity)?;

    let scope = match category {
        Some(name) => Some(
            registry.get(name).ok_or_else(|| ConversionError::UnknownCategory(name.to_string()))?,
        ),
        None => None,
    };

    let (from_category, from_unit) = resolve_unit(registry, scope, source)?;
    let to_unit = match find_in_category(from_category, target) {
        Some(unit) => unit,
        None => {
            // Give a better error when the target exists elsewhere
            return Err(match resolve_unit(registry, None, target) {
                Ok((other, unit)) => QueryError::Incompatible {
                    from: from_unit.to_string(),
                    from_category: from_category.name.clone(),
                    to: unit.to_string(),
                    to_category: other.name.clone(),
                },
                Err(e) => e,
            });
        }
    };

    Ok(ConversionRequest::new(&from_category.name, from_unit, to_unit, value))
}

/// Resolve a unit name, optionally within one category.
///
/// Matching is exact first, then case-insensitive, then singular
/// ("kilogram" → "Kilograms"), then through the alias table.
pub fn resolve_unit<'r>(
    registry: &'r UnitRegistry,
    scope: Option<&'r Category>,
    name: &str,
) -> Result<(&'r Category, &'r str), QueryError> {
    let name = name.trim();
    let candidates: Vec<&Category> = match scope {
        Some(category) => vec![category],
        None => registry.categories().iter().collect(),
    };

    let matches: Vec<(&Category, &str)> = candidates.into_iter()
        .filter_map(|c| find_in_category(c, name).map(|u| (c, u)))
        .collect();

    match matches.len() {
        0 => Err(QueryError::UnknownUnit(name.to_string())),
        1 => Ok(matches[0]),
        _ => Err(QueryError::Ambiguous {
            unit: name.to_string(),
            categories: matches.iter().map(|(c, _)| c.name.clone()).collect(),
        }),
    }
}

fn find_in_category<'c>(category: &'c Category, name: &str) -> Option<&'c str> {
    let name = name.trim();
    let lower = name.to_lowercase();
    let plural = format!("{}s", lower);
    let alias = ALIASES.iter()
        .find(|(a, _)| *a == lower)
        .map(|(_, canonical)| *canonical);

    let units = category.units();
    units.iter().find(|u| *u == name)
        .or_else(|| units.iter().find(|u| u.to_lowercase() == lower))
        .or_else(|| units.iter().find(|u| u.to_lowercase() == plural))
        .or_else(|| alias.and_then(|a| units.iter().find(|u| *u == a)))
        .map(String::as_str)
}

fn split_query(input: &str) -> Option<(&str, &str)> {
    SEPARATORS.iter()
        .find_map(|sep| input.rsplit_once(sep))
        .map(|(left, right)| (left.trim(), right.trim()))
        .filter(|(left, right)| !left.is_empty() && !right.is_empty())
}

/// Split "5 Kilometers" / "-3.2e-4km" into value and unit text
fn parse_quantity(s: &str) -> Result<(f64, &str), QueryError> {
    let numeric_len = s.char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    // "2eV": the longest numeric-looking prefix may not parse, so back off
    let (value, rest) = (1..=numeric_len).rev()
        .find_map(|end| s[..end].parse::<f64>().ok().map(|v| (v, &s[end..])))
        .ok_or_else(|| QueryError::InvalidNumber(s.to_string()))?;

    let unit = rest.trim();
    if unit.is_empty() {
        return Err(QueryError::UnknownUnit(String::new()));
    }
    Ok((value, unit))
}
