//! Resolving configuration text to enum variants.

use super::collections::key_value_records;
use super::{Delimiters, split_fields};
use std::collections::HashMap;
use std::hash::Hash;

/// An enumeration that can be named in configuration.
///
/// `VARIANTS` lists every variant with the exact text that selects it, in
/// declaration order. Resolution is a case-sensitive lookup in that table.
///
/// ```
/// use hotprops::codec::NamedVariant;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Mode { Fast, Safe }
///
/// impl NamedVariant for Mode {
///     const VARIANTS: &'static [(&'static str, Self)] = &[("FAST", Mode::Fast), ("SAFE", Mode::Safe)];
/// }
///
/// assert_eq!(Mode::resolve("SAFE"), Some(Mode::Safe));
/// assert_eq!(Mode::resolve("safe"), None);
/// ```
pub trait NamedVariant: Sized + Copy + 'static {
    const VARIANTS: &'static [(&'static str, Self)];

    fn resolve(name: &str) -> Option<Self> {
        resolve_variant(name)
    }

    /// The configuration name of this variant.
    fn variant_name(&self) -> Option<&'static str>
    where
        Self: PartialEq,
    {
        Self::VARIANTS
            .iter()
            .find(|(_, v)| v == self)
            .map(|(name, _)| *name)
    }
}

/// First variant whose name equals `name` exactly.
pub fn resolve_variant<E: NamedVariant>(name: &str) -> Option<E> {
    E::VARIANTS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, variant)| *variant)
}

/// Records resolved to variants; unknown names are skipped.
pub fn parse_enum_list<E: NamedVariant>(raw: &str, delimiters: &Delimiters) -> Vec<E> {
    split_fields(raw, delimiters.record())
        .into_iter()
        .filter_map(|token| resolve_variant(token.trim()))
        .collect()
}

/// `name:VARIANT` records. Unknown variants stay in the map as `None`.
pub fn parse_enum_map<E: NamedVariant>(
    raw: &str,
    delimiters: &Delimiters,
) -> HashMap<String, Option<E>> {
    key_value_records(raw, delimiters)
        .map(|(key, value)| (key.to_string(), resolve_variant(value)))
        .collect()
}

/// `VARIANT:text` records. Records whose key does not resolve are skipped.
pub fn parse_enum_key_map<E>(raw: &str, delimiters: &Delimiters) -> HashMap<E, String>
where
    E: NamedVariant + Eq + Hash,
{
    key_value_records(raw, delimiters)
        .filter_map(|(key, value)| resolve_variant(key).map(|variant| (variant, value.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Level {
        Low,
        High,
    }

    impl NamedVariant for Level {
        const VARIANTS: &'static [(&'static str, Self)] = &[("LOW", Level::Low), ("HIGH", Level::High)];
    }

    fn delims() -> &'static Delimiters {
        Delimiters::standard()
    }

    #[test]
    fn test_exact_match_only() {
        assert_eq!(Level::resolve("LOW"), Some(Level::Low));
        assert_eq!(Level::resolve("low"), None);
        assert_eq!(Level::resolve("Low"), None);
        assert_eq!(Level::resolve(" LOW"), None);
    }

    #[test]
    fn test_variant_name() {
        assert_eq!(Level::High.variant_name(), Some("HIGH"));
    }

    #[test]
    fn test_list_skips_unknown() {
        let list: Vec<Level> = parse_enum_list("HIGH, bogus ,LOW,high", delims());
        assert_eq!(list, vec![Level::High, Level::Low]);
    }

    #[test]
    fn test_map_keeps_unknown_as_none() {
        let map: HashMap<String, Option<Level>> = parse_enum_map("a:HIGH,b:medium,broken", delims());
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], Some(Level::High));
        assert_eq!(map["b"], None);
    }

    #[test]
    fn test_key_map_skips_unknown_keys() {
        let map: HashMap<Level, String> = parse_enum_key_map("LOW:cheap, HIGH : fast ,MID:x", delims());
        assert_eq!(map.len(), 2);
        assert_eq!(map[&Level::Low], "cheap");
        assert_eq!(map[&Level::High], "fast");
    }
}
