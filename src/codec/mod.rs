//! Coercion rules from raw property strings to typed values.
//!
//! Every rule shares one contract: absent input yields the caller's default,
//! malformed input yields the caller's default, and only well-formed input
//! yields a parsed value. Nothing in here returns an error to the caller.
//!
//! Separators are regular expressions, matched with [`regex_lite`]. Splitting
//! drops trailing empty pieces, and input without any separator match is
//! returned whole, so an empty value splits into a single empty piece.

mod collections;
mod decimal;
mod enums;
mod scalar;
mod typed;

pub use collections::{
    ServiceAddress, parse_address, parse_int_array, parse_list, parse_map,
};
pub use decimal::Decimal;
pub use enums::{NamedVariant, parse_enum_key_map, parse_enum_list, parse_enum_map, resolve_variant};
pub use scalar::{FALSE_VALUES, TRUE_VALUES, parse_bool};
pub use typed::{PrimitiveKind, TypedValue, parse_typed_map};

use regex_lite::Regex;
use std::sync::LazyLock;

/// Default record separator.
pub const RECORD_SEPARATOR: &str = ",";
/// Default field separator.
pub const FIELD_SEPARATOR: &str = ":";
/// Default sub-field separator (an escaped pipe).
pub const SUBFIELD_SEPARATOR: &str = r"\|";

static STANDARD: LazyLock<Delimiters> = LazyLock::new(|| Delimiters {
    record: Regex::new(RECORD_SEPARATOR).expect("record separator is valid"),
    field: Regex::new(FIELD_SEPARATOR).expect("field separator is valid"),
    subfield: Regex::new(SUBFIELD_SEPARATOR).expect("subfield separator is valid"),
});

/// The three separators used by list and map grammars.
///
/// ```text
/// key=k1:(Integer)5,k2:(List)a|b|c
///       ^          ^       ^ ^
///       field      record  subfield
/// ```
#[derive(Debug, Clone)]
pub struct Delimiters {
    record: Regex,
    field: Regex,
    subfield: Regex,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::standard().clone()
    }
}

impl Delimiters {
    /// `,` / `:` / `\|`.
    pub fn standard() -> &'static Delimiters {
        &STANDARD
    }

    /// Replace the record separator pattern.
    pub fn with_record(mut self, pattern: &str) -> Result<Self, regex_lite::Error> {
        self.record = Regex::new(pattern)?;
        Ok(self)
    }

    /// Replace the field separator pattern.
    pub fn with_field(mut self, pattern: &str) -> Result<Self, regex_lite::Error> {
        self.field = Regex::new(pattern)?;
        Ok(self)
    }

    /// Replace the sub-field separator pattern.
    pub fn with_subfield(mut self, pattern: &str) -> Result<Self, regex_lite::Error> {
        self.subfield = Regex::new(pattern)?;
        Ok(self)
    }

    /// Use `separator` literally as the record separator.
    pub fn with_literal_record(mut self, separator: &str) -> Self {
        self.record = literal(separator);
        self
    }

    /// Use `separator` literally as the field separator.
    pub fn with_literal_field(mut self, separator: &str) -> Self {
        self.field = literal(separator);
        self
    }

    /// Use `separator` literally as the sub-field separator.
    pub fn with_literal_subfield(mut self, separator: &str) -> Self {
        self.subfield = literal(separator);
        self
    }

    pub fn record(&self) -> &Regex {
        &self.record
    }

    pub fn field(&self) -> &Regex {
        &self.field
    }

    pub fn subfield(&self) -> &Regex {
        &self.subfield
    }
}

fn literal(separator: &str) -> Regex {
    Regex::new(&regex_lite::escape(separator)).expect("escaped literal is a valid pattern")
}

/// Split `input` on `separator`.
///
/// - no match: the whole input is the only piece;
/// - an empty leading piece is kept for a non-empty match at position 0;
/// - trailing empty pieces are dropped.
pub fn split_fields<'a>(input: &'a str, separator: &Regex) -> Vec<&'a str> {
    let Some(first) = separator.find(input) else {
        return vec![input];
    };

    let mut pieces: Vec<&str> = separator.split(input).collect();
    if first.start() == 0 && first.end() == 0 && pieces.first() == Some(&"") {
        pieces.remove(0);
    }
    while pieces.last().is_some_and(|p| p.is_empty()) {
        pieces.pop();
    }
    pieces
}

/// A type that can be parsed out of one raw property value.
///
/// Returning `None` means "use the caller's default". Scalar kinds ignore the
/// delimiters; list, map and address kinds use them.
pub trait Coerce: Sized {
    fn coerce(raw: &str, delimiters: &Delimiters) -> Option<Self>;
}

/// Coerce an optional raw value, falling back to `default`.
pub fn coerce_or<T: Coerce>(raw: Option<&str>, default: T, delimiters: &Delimiters) -> T {
    raw.and_then(|value| T::coerce(value, delimiters))
        .unwrap_or(default)
}
