//! Result formatting
//!
//! Renders a converted value either as fixed-point with a given number of
//! decimal places, or in scientific notation when the caller asked for it
//! and the magnitude is small enough to disappear in fixed-point.

use serde::{Deserialize, Serialize};

/// Largest accepted number of decimal places
pub const MAX_PRECISION: u32 = 10;

/// Magnitudes below this switch to scientific notation (when enabled)
pub const SCIENTIFIC_THRESHOLD: f64 = 0.0001;

/// Precision and notation choice for rendering a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultFormatter {
    precision: u32,
    scientific: bool,
}

impl ResultFormatter {
    /// Create a formatter. Precision above `MAX_PRECISION` is clamped.
    pub fn new(precision: u32, scientific: bool) -> Self {
        Self {
            precision: Self::clamp_precision(precision),
            scientific,
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn scientific(&self) -> bool {
        self.scientific
    }

    /// Clamp a requested precision into `0..=MAX_PRECISION`
    pub fn clamp_precision(precision: u32) -> u32 {
        if precision > MAX_PRECISION {
            tracing::warn!(requested = precision, max = MAX_PRECISION, "precision clamped");
            MAX_PRECISION
        } else {
            precision
        }
    }

    /// Render a value according to this formatter's settings
    pub fn format(&self, value: f64) -> String {
        if self.scientific && value.abs() < SCIENTIFIC_THRESHOLD {
            Self::scientific_notation(value, self.precision)
        } else {
            Self::fixed(value, self.precision)
        }
    }

    /// Fixed-point with exactly `precision` decimal places
    pub fn fixed(value: f64, precision: u32) -> String {
        format!("{:.*}", precision as usize, value)
    }

    /// Scientific notation with `precision` fractional mantissa digits.
    ///
    /// The exponent always carries a sign and at least two digits
    /// (`5.0000e-05`), the conventional calculator form.
    pub fn scientific_notation(value: f64, precision: u32) -> String {
        let raw = format!("{:.*e}", precision as usize, value);
        let Some((mantissa, exponent)) = raw.split_once('e') else {
            return raw;
        };
        let Ok(exponent) = exponent.parse::<i32>() else {
            return raw;
        };
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(4, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_value_scientific() {
        let f = ResultFormatter::new(4, true);
        assert_eq!(f.format(0.00005), "5.0000e-05");
    }

    #[test]
    fn test_small_value_fixed_rounds() {
        let f = ResultFormatter::new(4, false);
        assert_eq!(f.format(0.00005), "0.0001");
    }

    #[test]
    fn test_negative_fixed() {
        let f = ResultFormatter::new(2, false);
        assert_eq!(f.format(-3.14159), "-3.14");
    }

    #[test]
    fn test_scientific_only_below_threshold() {
        let f = ResultFormatter::new(2, true);
        assert_eq!(f.format(1234.5678), "1234.57");
        assert_eq!(f.format(0.0001), "0.00");
        assert_eq!(f.format(-0.00002), "-2.00e-05");
    }

    #[test]
    fn test_zero() {
        assert_eq!(ResultFormatter::new(3, false).format(0.0), "0.000");
        assert_eq!(ResultFormatter::new(1, true).format(0.0), "0.0e+00");
    }

    #[test]
    fn test_zero_precision() {
        assert_eq!(ResultFormatter::new(0, false).format(2.4), "2");
        assert_eq!(ResultFormatter::new(0, false).format(3.7), "4");
    }

    #[test]
    fn test_large_magnitude() {
        let f = ResultFormatter::new(2, true);
        assert_eq!(f.format(8e9), "8000000000.00");
        let huge = f.format(1e300);
        assert!(huge.starts_with('1'));
        assert!(huge.ends_with(".00"));
        assert_eq!(huge.len(), 301 + 3);
    }

    #[test]
    fn test_tiny_exponent_three_digits() {
        let f = ResultFormatter::new(3, true);
        assert_eq!(f.format(1.602176634e-19), "1.602e-19");
        assert_eq!(f.format(1.5e-200), "1.500e-200");
    }

    #[test]
    fn test_precision_clamped() {
        let f = ResultFormatter::new(25, false);
        assert_eq!(f.precision(), MAX_PRECISION);
        assert_eq!(f.format(1.0), "1.0000000000");
    }

    #[test]
    fn test_default() {
        let f = ResultFormatter::default();
        assert_eq!(f.precision(), 4);
        assert!(!f.scientific());
    }
}
