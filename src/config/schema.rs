use serde::Deserialize;
use std::fmt;

/// Contents of a `godecl.toml` file.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub parse: ParseOptions,
    #[serde(default)]
    pub debug: DebugOptions,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if !crate::is_supported_encoding(&self.parse.encoding) {
            issues.push(ValidationIssue::UnsupportedEncoding {
                encoding: self.parse.encoding.clone(),
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Apply process-wide settings (the block printing switch).
    pub fn apply_debug(&self) {
        if self.debug.print_blocks {
            crate::debug::enable();
        }
    }
}

/// Options that affect how a file is turned into a tree.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ParseOptions {
    /// Encoding name used when the caller does not give one.
    pub encoding: String,
    /// Attribute content after the last top-level block to
    /// `File::footer_span` instead of leaving it absent.
    pub trailing_footer: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            encoding: crate::UTF8.to_string(),
            trailing_footer: false,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DebugOptions {
    pub print_blocks: bool,
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    UnsupportedEncoding { encoding: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnsupportedEncoding { encoding } => {
                write!(f, "parse.encoding '{encoding}' is not supported (only UTF-8)")
            }
        }
    }
}
