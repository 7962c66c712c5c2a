//! Flat property sources.
//!
//! ## Data Flow
//! ```text
//! raw path + file name
//!     → resolve.rs (${name} placeholders, host separators)
//!     → loader.rs (read file, scoped handle)
//!     → parser.rs (.properties grammar)
//!     → PropertyMapping (immutable, replaced wholesale on reload)
//! ```

mod loader;
mod mapping;
mod parser;
mod resolve;

pub use loader::{FileLoader, PropertyLoader, load_properties};
pub use mapping::PropertyMapping;
pub use parser::parse_properties;
pub use resolve::{
    DEFAULT_CONFIG_PATH, ResolutionContext, expand_placeholders, normalize_dir,
    resolve_file_path,
};
