//! Gauge Units - Categories, conversion rules and the conversion engine
//!
//! Categories (display order):
//! - Length (Meters, Kilometers, Miles, Feet, ...)
//! - Weight (Kilograms, Grams, Pounds, Ounces)
//! - Temperature (Celsius, Fahrenheit, Kelvin)
//! - Angle (Degrees, Radians, Gradians)
//! - Speed, Time, Volume, Pressure, Energy, Power
//! - Data Transfer Rate (Bits per second ... Gigabytes per second)
//!
//! Every category but Temperature converts through a factor table;
//! Temperature bridges through Celsius.

mod rule;
mod category;
mod units;
mod convert;
mod parse;

pub use rule::{ConversionRule, FactorTable, FactorOrientation, TableError, TemperatureScale};
pub use category::Category;
pub use units::UnitRegistry;
pub use convert::{ConversionEngine, ConversionRequest, ConversionResult};
pub use parse::{parse_query, resolve_unit, QueryError};
