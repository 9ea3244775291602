//! Optional TOML configuration for parse options and diagnostics.

pub mod loader;
pub mod schema;

pub use loader::{discover, load_from_path, load_from_str, ConfigError, CONFIG_FILE_NAME};
pub use schema::{Config, DebugOptions, ParseOptions, ValidationError, ValidationIssue};
