//! Result normalization and rendering.
//!
//! Values are rounded to 10 decimal digits before display, and results that
//! are mathematically integral (within the range where `f64` still resolves
//! integers exactly) are presented as integers: `4/2` shows `2`, not `2.0`.

use calc_model::Symbol;
use std::fmt;

/// Decimal digits kept when rounding a result for display.
const DISPLAY_DECIMALS: usize = 10;

/// Largest magnitude presented in integer form. Beyond this, `f64` can no
/// longer distinguish adjacent integers, so integer presentation would imply
/// precision that is not there.
const INTEGER_LIMIT: f64 = 1e15;

/// Magnitude bounds for plain (non-scientific) decimal rendering.
const PLAIN_MAX: f64 = 1e16;
const PLAIN_MIN: f64 = 1e-4;

/// Round to `digits` decimal places, ties to even. Magnitudes at or above
/// [`PLAIN_MAX`] pass through: they have no representable fraction left.
///
/// Rounding goes through the decimal formatter rather than scale-and-divide:
/// multiplying by `10^digits` first stops being exact once the scaled value
/// passes 2^53, which corrupts integral results near the top of the integer
/// display range.
#[must_use]
pub fn round_decimals(value: f64, digits: usize) -> f64 {
    if !value.is_finite() || value.abs() >= PLAIN_MAX {
        return value;
    }
    format!("{value:.digits$}").parse().unwrap_or(value)
}

/// A normalized result, ready for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayValue {
    Integer(i64),
    Decimal(f64),
}

impl DisplayValue {
    /// Normalize a finite evaluation result for display.
    #[must_use]
    pub fn from_f64(value: f64) -> DisplayValue {
        let rounded = round_decimals(value, DISPLAY_DECIMALS);
        if rounded.abs() <= INTEGER_LIMIT && rounded == rounded.trunc() {
            DisplayValue::Integer(rounded as i64)
        } else {
            DisplayValue::Decimal(rounded)
        }
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            DisplayValue::Integer(i) => i as f64,
            DisplayValue::Decimal(d) => d,
        }
    }

    /// Re-symbolize the rendering so a committed result becomes an editable
    /// buffer again. Every character the renderer emits (digits, `-`, `.`,
    /// `e`) is part of the alphabet.
    #[must_use]
    pub fn to_symbols(self) -> Vec<Symbol> {
        self.to_string()
            .chars()
            .filter_map(Symbol::from_char)
            .collect()
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DisplayValue::Integer(i) => write!(f, "{i}"),
            DisplayValue::Decimal(d) => {
                let magnitude = d.abs();
                // Plain notation in the readable range; scientific outside it
                // (Rust's `{}` would otherwise print `1e300` as 300 digits).
                if magnitude != 0.0 && (magnitude >= PLAIN_MAX || magnitude < PLAIN_MIN) {
                    write!(f, "{d:e}")
                } else {
                    write!(f, "{d}")
                }
            }
        }
    }
}
