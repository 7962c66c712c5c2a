//! Exact decimal numbers.

use super::{Coerce, Delimiters};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An exact decimal value, `unscaled × 10^-scale`, of any precision.
///
/// The unscaled value is kept as its decimal digits, so values wider than
/// any machine integer survive unchanged. The representation is kept as
/// written: `1.0` and `1.00` differ in scale and do not compare equal. Use
/// [`Decimal::to_f64`] for arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    negative: bool,
    /// Magnitude of the unscaled value, no leading zeros (`"0"` for zero).
    digits: String,
    scale: i32,
}

impl Decimal {
    pub fn new(unscaled: i128, scale: i32) -> Self {
        Self {
            negative: unscaled < 0,
            digits: unscaled.unsigned_abs().to_string(),
            scale,
        }
    }

    /// Digits of the unscaled magnitude.
    pub fn unscaled_digits(&self) -> &str {
        &self.digits
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Number of significant digits in the unscaled value.
    pub fn precision(&self) -> usize {
        self.digits.len()
    }

    /// Nearest `f64`. Saturates to zero or infinity outside its range.
    pub fn to_f64(&self) -> f64 {
        let sign = if self.negative { "-" } else { "" };
        format!("{sign}{}e{}", self.digits, -i64::from(self.scale))
            .parse()
            .unwrap_or(f64::NAN)
    }

    /// Exponent of the leading digit: `digits - 1 - scale`.
    fn adjusted_exponent(&self) -> i64 {
        self.digits.len() as i64 - 1 - i64::from(self.scale)
    }
}

/// Error returned for text that is not a decimal number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDecimalError;

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid decimal literal")
    }
}

impl std::error::Error for ParseDecimalError {}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Grammar: `[+-]digits[.digits][(e|E)[+-]digits]`, or `[+-].digits...`.
    ///
    /// The only limit is on the scale, which must fit an `i32`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mantissa, exponent) = match s.find(['e', 'E']) {
            Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
            None => (s, None),
        };

        let (negative, digits) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseDecimalError);
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(ParseDecimalError);
        }

        let mut unscaled: String = int_part
            .chars()
            .chain(frac_part.chars())
            .skip_while(|&c| c == '0')
            .collect();
        if unscaled.is_empty() {
            unscaled.push('0');
        }

        let frac_len = i32::try_from(frac_part.len()).map_err(|_| ParseDecimalError)?;
        let exp = match exponent {
            Some(e) => parse_exponent(e)?,
            None => 0,
        };
        let scale = frac_len.checked_sub(exp).ok_or(ParseDecimalError)?;

        Ok(Self {
            negative: negative && unscaled != "0",
            digits: unscaled,
            scale,
        })
    }
}

fn parse_exponent(raw: &str) -> Result<i32, ParseDecimalError> {
    let body = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseDecimalError);
    }
    raw.parse().map_err(|_| ParseDecimalError)
}

/// Plain notation while the scale is non-negative and the leading digit is
/// no smaller than `10^-6`; scientific (`1.5E+3`, `1E-7`) otherwise.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        let digits = self.digits.as_str();
        let adjusted = self.adjusted_exponent();

        if self.scale >= 0 && adjusted >= -6 {
            let scale = self.scale as usize;
            if scale == 0 {
                return write!(f, "{sign}{digits}");
            }
            if digits.len() > scale {
                let (int, frac) = digits.split_at(digits.len() - scale);
                return write!(f, "{sign}{int}.{frac}");
            }
            // At most five zeros here, given the bound on `adjusted`.
            return write!(f, "{sign}0.{}{digits}", "0".repeat(scale - digits.len()));
        }

        let (lead, rest) = digits.split_at(1);
        write!(f, "{sign}{lead}")?;
        if !rest.is_empty() {
            write!(f, ".{rest}")?;
        }
        match adjusted {
            0 => Ok(()),
            n if n > 0 => write!(f, "E+{n}"),
            n => write!(f, "E{n}"),
        }
    }
}

/// Serialized as its textual form, so no precision is lost.
impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Coerce for Decimal {
    fn coerce(raw: &str, _: &Delimiters) -> Option<Self> {
        raw.trim().parse().ok()
    }
}
