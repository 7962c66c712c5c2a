//! Locating the property file.
//!
//! A raw directory may contain `${name}` placeholders. They are looked up in
//! an explicit [`ResolutionContext`] rather than in process globals, so path
//! resolution stays a pure function of its inputs.

use regex_lite::{Captures, Regex};
use std::collections::HashMap;
use std::path::{MAIN_SEPARATOR, PathBuf};
use std::sync::LazyLock;

/// Raw directory used when none is configured.
pub const DEFAULT_CONFIG_PATH: &str = "${configfile.path}";

/// Value substituted for placeholders with no binding.
const UNRESOLVED: &str = "null";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z0-9_.]+)\}").expect("placeholder pattern is valid")
});

/// Named values available to `${name}` placeholders.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    properties: HashMap<String, String>,
}

impl ResolutionContext {
    /// Empty context: every placeholder resolves to `null`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context seeded from the running process.
    ///
    /// Contains every environment variable plus `user.home`, `user.dir` and
    /// `file.separator`.
    pub fn from_process() -> Self {
        let mut ctx = Self::new();
        for (key, value) in std::env::vars() {
            ctx.properties.insert(key, value);
        }
        if let Some(home) = dirs::home_dir() {
            ctx.properties
                .insert("user.home".into(), home.to_string_lossy().into_owned());
        }
        if let Ok(cwd) = std::env::current_dir() {
            ctx.properties
                .insert("user.dir".into(), cwd.to_string_lossy().into_owned());
        }
        ctx.properties
            .insert("file.separator".into(), MAIN_SEPARATOR.to_string());
        ctx
    }

    /// Bind `name` to `value`, replacing any previous binding.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

/// Replace `${name}` references with their bound values.
///
/// Unbound names become the literal `null`. Substituted text is not scanned
/// again.
pub fn expand_placeholders(input: &str, ctx: &ResolutionContext) -> String {
    PLACEHOLDER
        .replace_all(input, |caps: &Captures<'_>| {
            ctx.get(&caps[1]).unwrap_or(UNRESOLVED).to_string()
        })
        .into_owned()
}

/// Convert separators to the host convention and ensure a trailing one.
pub fn normalize_dir(path: &str) -> String {
    let foreign = if MAIN_SEPARATOR == '/' { '\\' } else { '/' };
    let mut normalized = path.replace(foreign, &MAIN_SEPARATOR.to_string());
    if !normalized.is_empty() && !normalized.ends_with(MAIN_SEPARATOR) {
        normalized.push(MAIN_SEPARATOR);
    }
    normalized
}

/// Build the full path of the property file.
///
/// An empty raw path yields the bare file name.
pub fn resolve_file_path(raw_path: &str, file_name: &str, ctx: &ResolutionContext) -> PathBuf {
    let expanded = expand_placeholders(raw_path, ctx);
    let mut full = normalize_dir(&expanded);
    full.push_str(file_name);
    PathBuf::from(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_known_and_unknown() {
        let ctx = ResolutionContext::new().with_property("configfile.path", "/etc/app");
        assert_eq!(expand_placeholders("${configfile.path}/conf", &ctx), "/etc/app/conf");
        assert_eq!(expand_placeholders("${missing}/conf", &ctx), "null/conf");
    }

    #[test]
    fn test_expand_multiple_and_no_rescan() {
        let ctx = ResolutionContext::new()
            .with_property("a", "${b}")
            .with_property("b", "never");
        assert_eq!(expand_placeholders("${a}-${a}", &ctx), "${b}-${b}");
    }

    #[test]
    fn test_invalid_placeholder_names_left_alone() {
        let ctx = ResolutionContext::new();
        assert_eq!(expand_placeholders("${bad-name}", &ctx), "${bad-name}");
        assert_eq!(expand_placeholders("${}", &ctx), "${}");
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_dir_unix() {
        assert_eq!(normalize_dir("conf\\app"), "conf/app/");
        assert_eq!(normalize_dir("/etc/app/"), "/etc/app/");
        assert_eq!(normalize_dir(""), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_file_path() {
        let ctx = ResolutionContext::new().with_property("configfile.path", "/srv/conf");
        assert_eq!(
            resolve_file_path(DEFAULT_CONFIG_PATH, "app.properties", &ctx),
            PathBuf::from("/srv/conf/app.properties")
        );
        assert_eq!(
            resolve_file_path(DEFAULT_CONFIG_PATH, "app.properties", &ResolutionContext::new()),
            PathBuf::from("null/app.properties")
        );
        assert_eq!(
            resolve_file_path("", "app.properties", &ctx),
            PathBuf::from("app.properties")
        );
    }

    #[test]
    fn test_from_process_has_separator() {
        let ctx = ResolutionContext::from_process();
        assert_eq!(ctx.get("file.separator"), Some(MAIN_SEPARATOR.to_string().as_str()));
    }
}
