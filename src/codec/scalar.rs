//! Scalar coercions: booleans, integers, floats and strings.

use super::{Coerce, Delimiters};
use std::str::FromStr;

/// Spellings accepted as `true` (matched after lowercasing and trimming).
pub const TRUE_VALUES: [&str; 6] = ["true", "vero", "on", "yes", "si", "1"];

/// Spellings accepted as `false` (matched after lowercasing and trimming).
pub const FALSE_VALUES: [&str; 5] = ["false", "falso", "off", "no", "0"];

/// Match a value against the boolean synonym tables.
///
/// The tables are checked in order, `true` first. A value in neither table
/// is not a boolean.
pub fn parse_bool(raw: &str) -> Option<bool> {
    let value = raw.to_lowercase();
    let value = value.trim();
    if TRUE_VALUES.contains(&value) {
        Some(true)
    } else if FALSE_VALUES.contains(&value) {
        Some(false)
    } else {
        None
    }
}

impl Coerce for bool {
    fn coerce(raw: &str, _: &Delimiters) -> Option<Self> {
        parse_bool(raw)
    }
}

// Integers: trimmed, `0x` selects base 16, anything else is base 10.
// Out-of-range values are malformed for the target width.
macro_rules! impl_coerce_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Coerce for $ty {
                fn coerce(raw: &str, _: &Delimiters) -> Option<Self> {
                    let value = raw.trim();
                    match value.strip_prefix("0x") {
                        Some(hex) => <$ty>::from_str_radix(hex, 16).ok(),
                        None => value.parse().ok(),
                    }
                }
            }
        )*
    };
}

impl_coerce_integer!(i8, i16, i32, i64, u16, u32, u64);

/// Trimmed base-10 float.
///
/// Non-finite values must be spelled `Infinity` or `NaN`, optionally signed.
/// Other spellings (`inf`, `infinity`, `nan`) are malformed.
pub(crate) fn parse_float<T: FromStr>(raw: &str) -> Option<T> {
    let value = raw.trim();
    let body = value.strip_prefix(['+', '-']).unwrap_or(value);
    if body.starts_with(|c: char| c.is_ascii_alphabetic()) && body != "Infinity" && body != "NaN" {
        return None;
    }
    value.parse().ok()
}

impl Coerce for f64 {
    fn coerce(raw: &str, _: &Delimiters) -> Option<Self> {
        parse_float(raw)
    }
}

impl Coerce for f32 {
    fn coerce(raw: &str, _: &Delimiters) -> Option<Self> {
        parse_float(raw)
    }
}

/// Strings are returned exactly as stored, untrimmed.
impl Coerce for String {
    fn coerce(raw: &str, _: &Delimiters) -> Option<Self> {
        Some(raw.to_string())
    }
}
