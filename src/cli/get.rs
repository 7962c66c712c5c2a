//! Get subcommand: print one value coerced to a chosen kind.

use crate::codec::{Coerce, Decimal, Delimiters, ServiceAddress, TypedValue};
use crate::store::TypedStore;
use anyhow::{Context, Result, anyhow};
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Target kind for the get subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ValueKind {
    /// Raw text, untouched
    #[default]
    String,
    Bool,
    Int,
    Long,
    Byte,
    Double,
    Decimal,
    /// Record-separated strings
    List,
    /// Record-separated base-10 integers
    IntArray,
    /// key:value records
    Map,
    /// key:(Type)value records
    TypedMap,
    /// host:port
    Address,
}

/// Arguments for the get subcommand
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Property key
    pub key: String,

    /// Kind to coerce the value to
    #[arg(short, long, value_enum, default_value_t = ValueKind::String)]
    pub kind: ValueKind,

    /// Value used when the key is absent or malformed, parsed as the same kind
    #[arg(short, long)]
    pub default: Option<String>,

    /// Record separator pattern (default ",")
    #[arg(long, value_name = "REGEX")]
    pub record_separator: Option<String>,

    /// Field separator pattern (default ":")
    #[arg(long, value_name = "REGEX")]
    pub field_separator: Option<String>,

    /// Sub-field separator pattern (default "\|")
    #[arg(long, value_name = "REGEX")]
    pub subfield_separator: Option<String>,
}

impl GetArgs {
    /// Standard delimiters with any overrides applied.
    pub fn delimiters(&self) -> Result<Delimiters> {
        let mut delimiters = Delimiters::default();
        if let Some(ref pattern) = self.record_separator {
            delimiters = delimiters
                .with_record(pattern)
                .context("invalid record separator")?;
        }
        if let Some(ref pattern) = self.field_separator {
            delimiters = delimiters
                .with_field(pattern)
                .context("invalid field separator")?;
        }
        if let Some(ref pattern) = self.subfield_separator {
            delimiters = delimiters
                .with_subfield(pattern)
                .context("invalid sub-field separator")?;
        }
        Ok(delimiters)
    }
}

/// Coerce `key` as `T`. `Null` when absent or malformed and no default given.
fn coerce_value<T: Coerce + Serialize>(
    store: &TypedStore,
    args: &GetArgs,
    delimiters: &Delimiters,
) -> Result<Value> {
    let value = match args.default {
        Some(ref raw) => {
            let default = T::coerce(raw, delimiters)
                .ok_or_else(|| anyhow!("default {:?} is not a valid {:?} value", raw, args.kind))?;
            Some(store.get_with(&args.key, default, delimiters))
        }
        None => store
            .get_raw(&args.key)
            .and_then(|raw| T::coerce(&raw, delimiters)),
    };
    Ok(serde_json::to_value(value)?)
}

/// Look up `args.key` in `store` and coerce it to the requested kind.
///
/// A separator that is not a valid pattern yields the default (or `Null`),
/// as any other unreadable value does.
pub fn lookup(store: &TypedStore, args: &GetArgs) -> Result<Value> {
    match args.delimiters() {
        Ok(delimiters) => lookup_with(store, args, &delimiters),
        Err(e) if args.kind == ValueKind::String => {
            debug!(error = %format!("{e:#}"), "Separator ignored for raw strings");
            lookup_with(store, args, Delimiters::standard())
        }
        Err(e) => {
            warn!(key = %args.key, error = %format!("{e:#}"), "Invalid separator, using default");
            lookup_with(&TypedStore::new(), args, Delimiters::standard())
        }
    }
}

fn lookup_with(store: &TypedStore, args: &GetArgs, delimiters: &Delimiters) -> Result<Value> {
    match args.kind {
        ValueKind::String => Ok(match args.default {
            Some(ref default) => Value::String(store.get_str(&args.key, default)),
            None => store.get_raw(&args.key).map_or(Value::Null, Value::String),
        }),
        ValueKind::Bool => coerce_value::<bool>(store, args, delimiters),
        ValueKind::Int => coerce_value::<i32>(store, args, delimiters),
        ValueKind::Long => coerce_value::<i64>(store, args, delimiters),
        ValueKind::Byte => coerce_value::<i8>(store, args, delimiters),
        ValueKind::Double => coerce_value::<f64>(store, args, delimiters),
        ValueKind::Decimal => coerce_value::<Decimal>(store, args, delimiters),
        ValueKind::List => coerce_value::<Vec<String>>(store, args, delimiters),
        ValueKind::IntArray => coerce_value::<Vec<i32>>(store, args, delimiters),
        ValueKind::Map => coerce_value::<HashMap<String, String>>(store, args, delimiters),
        ValueKind::TypedMap => {
            coerce_value::<HashMap<String, TypedValue>>(store, args, delimiters)
        }
        ValueKind::Address => coerce_value::<ServiceAddress>(store, args, delimiters),
    }
}

/// Plain text for strings, compact JSON for everything else.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
