//! Reading property files from disk.

use super::{PropertyMapping, parse_properties};
use crate::error::LoadError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::trace;

/// Produces a fresh [`PropertyMapping`] from a source path.
///
/// The reload scheduler calls this on every fire. Implementations must not
/// keep resources open between calls.
pub trait PropertyLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<PropertyMapping, LoadError>;
}

/// Loads `.properties` files with [`load_properties`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl PropertyLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<PropertyMapping, LoadError> {
        load_properties(path)
    }
}

impl<F> PropertyLoader for F
where
    F: Fn(&Path) -> Result<PropertyMapping, LoadError> + Send + Sync,
{
    fn load(&self, path: &Path) -> Result<PropertyMapping, LoadError> {
        self(path)
    }
}

/// Read and parse a property file.
///
/// The file handle lives only for the duration of this call.
pub fn load_properties(path: &Path) -> Result<PropertyMapping, LoadError> {
    if !path.exists() {
        return Err(LoadError::not_found(path));
    }

    let mut content = String::new();
    {
        let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
        BufReader::new(file)
            .read_to_string(&mut content)
            .map_err(|e| LoadError::io(path, e))?;
    }

    let mapping = parse_properties(&content).map_err(|e| LoadError::parse(path, e))?;
    trace!(path = %path.display(), entries = mapping.len(), "Property file parsed");
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.properties");
        std::fs::write(&path, "name = demo\nreaderRefreshIntertime=5000\n").unwrap();

        let mapping = load_properties(&path).unwrap();
        assert_eq!(mapping.get("name"), Some("demo"));
        assert_eq!(mapping.get("readerRefreshIntertime"), Some("5000"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = load_properties(&temp.path().join("absent.properties")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_directory_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = load_properties(temp.path()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_parse_error_is_attributed_to_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.properties");
        std::fs::write(&path, "k=\\uZZZZ\n").unwrap();

        match load_properties(&path).unwrap_err() {
            LoadError::Parse { path: p, line, .. } => {
                assert_eq!(p, path);
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_closure_loader() {
        let loader = |_: &Path| -> Result<PropertyMapping, LoadError> {
            Ok([("k", "v")].into_iter().collect())
        };
        let mapping = loader.load(Path::new("ignored")).unwrap();
        assert_eq!(mapping.get("k"), Some("v"));
    }
}
