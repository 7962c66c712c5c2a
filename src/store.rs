//! The current property snapshot and its typed accessors.
//!
//! The store holds one `Arc<PropertyMapping>` behind an [`ArcSwapOption`].
//! Every accessor loads the pointer once and performs its lookup and
//! coercion against that snapshot, so a concurrent install is seen either
//! entirely or not at all. Installing swaps the pointer; readers in flight
//! keep the mapping they loaded alive until they finish.

use crate::codec::{
    Coerce, Delimiters, NamedVariant, coerce_or, parse_enum_key_map, parse_enum_list,
    parse_enum_map, resolve_variant,
};
use crate::props::PropertyMapping;
use arc_swap::ArcSwapOption;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Typed view over the most recently installed [`PropertyMapping`].
#[derive(Debug, Default)]
pub struct TypedStore {
    current: ArcSwapOption<PropertyMapping>,
}

impl TypedStore {
    /// A store with nothing installed; every accessor returns its default.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mapping: PropertyMapping) -> Self {
        let store = Self::new();
        store.install(mapping);
        store
    }

    /// Atomically replace the current mapping, returning the previous one.
    pub fn install(&self, mapping: PropertyMapping) -> Option<Arc<PropertyMapping>> {
        self.current.swap(Some(Arc::new(mapping)))
    }

    /// Drop the current mapping.
    pub fn clear(&self) -> Option<Arc<PropertyMapping>> {
        self.current.swap(None)
    }

    /// The current mapping, if one has been installed.
    pub fn snapshot(&self) -> Option<Arc<PropertyMapping>> {
        self.current.load_full()
    }

    pub fn is_installed(&self) -> bool {
        self.current.load().is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.current
            .load()
            .as_ref()
            .is_some_and(|mapping| mapping.contains_key(key))
    }

    /// Number of entries in the current mapping, zero when none installed.
    pub fn len(&self) -> usize {
        self.current.load().as_ref().map_or(0, |mapping| mapping.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` on the raw value of `key` within a single snapshot.
    fn with_raw<R>(&self, key: &str, f: impl FnOnce(Option<&str>) -> R) -> R {
        let guard = self.current.load();
        f(guard.as_ref().and_then(|mapping| mapping.get(key)))
    }

    /// Raw string value, untouched.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.with_raw(key, |raw| raw.map(str::to_string))
    }

    /// Coerce `key` with the standard delimiters.
    ///
    /// ```
    /// use hotprops::store::TypedStore;
    ///
    /// let store = TypedStore::with_mapping([("port", "0x1F90")].into_iter().collect());
    /// assert_eq!(store.get("port", 80i32), 8080);
    /// assert_eq!(store.get("missing", 80i32), 80);
    /// ```
    pub fn get<T: Coerce>(&self, key: &str, default: T) -> T {
        self.get_with(key, default, Delimiters::standard())
    }

    /// Coerce `key` with caller-supplied delimiters.
    pub fn get_with<T: Coerce>(&self, key: &str, default: T, delimiters: &Delimiters) -> T {
        self.with_raw(key, |raw| coerce_or(raw, default, delimiters))
    }

    /// String value with a borrowed default.
    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.with_raw(key, |raw| raw.unwrap_or(default).to_string())
    }

    /// Resolve a single enum variant by exact name.
    pub fn get_enum<E: NamedVariant>(&self, key: &str) -> Option<E> {
        self.with_raw(key, |raw| raw.and_then(resolve_variant))
    }

    /// Resolve a single enum variant, falling back to `default`.
    pub fn get_enum_or<E: NamedVariant>(&self, key: &str, default: E) -> E {
        self.get_enum(key).unwrap_or(default)
    }

    /// List of enum variants; unknown names are skipped.
    pub fn get_enum_list<E: NamedVariant>(&self, key: &str, default: Vec<E>) -> Vec<E> {
        self.get_enum_list_with(key, default, Delimiters::standard())
    }

    pub fn get_enum_list_with<E: NamedVariant>(
        &self,
        key: &str,
        default: Vec<E>,
        delimiters: &Delimiters,
    ) -> Vec<E> {
        self.with_raw(key, |raw| match raw {
            Some(value) => parse_enum_list(value, delimiters),
            None => default,
        })
    }

    /// `name:VARIANT` map; unknown variants are kept as `None`.
    pub fn get_enum_map<E: NamedVariant>(
        &self,
        key: &str,
        default: HashMap<String, Option<E>>,
    ) -> HashMap<String, Option<E>> {
        self.get_enum_map_with(key, default, Delimiters::standard())
    }

    pub fn get_enum_map_with<E: NamedVariant>(
        &self,
        key: &str,
        default: HashMap<String, Option<E>>,
        delimiters: &Delimiters,
    ) -> HashMap<String, Option<E>> {
        self.with_raw(key, |raw| match raw {
            Some(value) => parse_enum_map(value, delimiters),
            None => default,
        })
    }

    /// `VARIANT:text` map; records with unknown keys are skipped.
    pub fn get_enum_key_map<E>(&self, key: &str, default: HashMap<E, String>) -> HashMap<E, String>
    where
        E: NamedVariant + Eq + Hash,
    {
        self.get_enum_key_map_with(key, default, Delimiters::standard())
    }

    pub fn get_enum_key_map_with<E>(
        &self,
        key: &str,
        default: HashMap<E, String>,
        delimiters: &Delimiters,
    ) -> HashMap<E, String>
    where
        E: NamedVariant + Eq + Hash,
    {
        self.with_raw(key, |raw| match raw {
            Some(value) => parse_enum_key_map(value, delimiters),
            None => default,
        })
    }
}
