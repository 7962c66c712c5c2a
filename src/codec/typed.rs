//! Maps whose values carry a `(TypeName)` tag.
//!
//! ```text
//! k1:(Integer)5,k2:(List)a|b|c,k3:plain
//! ```
//!
//! A tag naming a [`PrimitiveKind`] converts the remainder with that kind's
//! standard conversion, `(List)` splits the remainder on the sub-field
//! separator, and anything else is stored as the raw trimmed text.

use super::collections::key_value_records;
use super::scalar::parse_float;
use super::{Delimiters, split_fields};
use regex_lite::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::trace;

static TYPE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(([A-Za-z]+)\)(.+)$").expect("type tag pattern is valid"));

/// Tag that selects the list conversion.
const LIST_TAG: &str = "List";

/// Primitive type names accepted inside a `(TypeName)` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Character,
    Short,
    Integer,
    Long,
    Float,
    Double,
    String,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Character,
        PrimitiveKind::Short,
        PrimitiveKind::Integer,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::String,
    ];

    /// Look up a tag name. Case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Boolean" => Some(PrimitiveKind::Boolean),
            "Byte" => Some(PrimitiveKind::Byte),
            "Character" => Some(PrimitiveKind::Character),
            "Short" => Some(PrimitiveKind::Short),
            "Integer" => Some(PrimitiveKind::Integer),
            "Long" => Some(PrimitiveKind::Long),
            "Float" => Some(PrimitiveKind::Float),
            "Double" => Some(PrimitiveKind::Double),
            "String" => Some(PrimitiveKind::String),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Character => "Character",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Integer => "Integer",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::String => "String",
        }
    }

    /// Standard string conversion for this kind.
    ///
    /// Integer kinds take base 10 with an optional sign and no surrounding
    /// whitespace. Floats are trimmed. `Boolean` never fails: only `true`
    /// (any case) is true. `Character` needs exactly one character.
    pub fn convert(self, raw: &str) -> Option<TypedValue> {
        match self {
            PrimitiveKind::Boolean => Some(TypedValue::Boolean(raw.eq_ignore_ascii_case("true"))),
            PrimitiveKind::Byte => raw.parse().ok().map(TypedValue::Byte),
            PrimitiveKind::Character => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(TypedValue::Character(c)),
                    _ => None,
                }
            }
            PrimitiveKind::Short => raw.parse().ok().map(TypedValue::Short),
            PrimitiveKind::Integer => raw.parse().ok().map(TypedValue::Integer),
            PrimitiveKind::Long => raw.parse().ok().map(TypedValue::Long),
            PrimitiveKind::Float => parse_float(raw).map(TypedValue::Float),
            PrimitiveKind::Double => parse_float(raw).map(TypedValue::Double),
            PrimitiveKind::String => Some(TypedValue::String(raw.to_string())),
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One value of a typed map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    Boolean(bool),
    Byte(i8),
    Character(char),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<String>),
    /// Untagged, or tagged with an unknown type name.
    Untyped(String),
}

impl TypedValue {
    /// The primitive kind this value was converted with, if any.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            TypedValue::Boolean(_) => Some(PrimitiveKind::Boolean),
            TypedValue::Byte(_) => Some(PrimitiveKind::Byte),
            TypedValue::Character(_) => Some(PrimitiveKind::Character),
            TypedValue::Short(_) => Some(PrimitiveKind::Short),
            TypedValue::Integer(_) => Some(PrimitiveKind::Integer),
            TypedValue::Long(_) => Some(PrimitiveKind::Long),
            TypedValue::Float(_) => Some(PrimitiveKind::Float),
            TypedValue::Double(_) => Some(PrimitiveKind::Double),
            TypedValue::String(_) => Some(PrimitiveKind::String),
            TypedValue::List(_) | TypedValue::Untyped(_) => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, TypedValue::List(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) | TypedValue::Untyped(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            TypedValue::Byte(v) => Some(i64::from(v)),
            TypedValue::Short(v) => Some(i64::from(v)),
            TypedValue::Integer(v) => Some(i64::from(v)),
            TypedValue::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            TypedValue::Float(v) => Some(f64::from(v)),
            TypedValue::Double(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            TypedValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            TypedValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Interpret one trimmed value token. `None` means the entry is dropped.
fn parse_typed_value(token: &str, delimiters: &Delimiters) -> Option<TypedValue> {
    let Some(caps) = TYPE_TAG.captures(token) else {
        return Some(TypedValue::Untyped(token.to_string()));
    };
    let tag = &caps[1];
    let body = &caps[2];

    if let Some(kind) = PrimitiveKind::from_tag(tag) {
        let converted = kind.convert(body);
        if converted.is_none() {
            trace!(tag, body, "Typed map entry failed conversion, dropping");
        }
        converted
    } else if tag == LIST_TAG {
        let items = split_fields(body, delimiters.subfield())
            .into_iter()
            .map(str::to_string)
            .collect();
        Some(TypedValue::List(items))
    } else {
        Some(TypedValue::Untyped(token.to_string()))
    }
}

/// Parse a typed map. Entries whose conversion fails are omitted.
pub fn parse_typed_map(raw: &str, delimiters: &Delimiters) -> HashMap<String, TypedValue> {
    key_value_records(raw, delimiters)
        .filter_map(|(key, token)| {
            parse_typed_value(token, delimiters).map(|value| (key.to_string(), value))
        })
        .collect()
}

impl super::Coerce for HashMap<String, TypedValue> {
    fn coerce(raw: &str, delimiters: &Delimiters) -> Option<Self> {
        Some(parse_typed_map(raw, delimiters))
    }
}
