//! Entry point: Go source in, declaration tree out.

use crate::boundary::{fix_block_boundaries, BoundaryError};
use crate::config::ParseOptions;
use crate::pool::with_parser;
use crate::tree::File;
use crate::ts::diagnostic::utf8_error;
use crate::ts::{first_syntax_error, LineTable, TreeSitterError};
use crate::walker::walk;
use std::io::{self, Read};
use thiserror::Error;
use tracing::debug;

/// Failures of the parse call itself. Syntax errors in the input are not
/// among them: they come back inside the returned [`File`].
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unsupported encoding '{0}': only UTF-8 is accepted")]
    UnsupportedEncoding(String),

    #[error("failed to read source: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    TreeSitter(#[from] TreeSitterError),

    #[error("failed to resolve block boundaries: {0}")]
    Boundary(#[from] BoundaryError),
}

/// Parse Go source read from `reader`, declared to be in `encoding`.
///
/// The encoding name is matched case-insensitively and must be `UTF-8`; it
/// is checked before anything is read.
///
/// ```no_run
/// # fn main() -> Result<(), godecl::ParseError> {
/// let file = godecl::parse("package main\n".as_bytes(), "utf-8")?;
/// assert_eq!(file.package().map(|p| p.name.as_str()), Some("main"));
/// # Ok(())
/// # }
/// ```
pub fn parse(reader: impl Read, encoding: &str) -> Result<File, ParseError> {
    parse_with_options(reader, encoding, &ParseOptions::default())
}

/// [`parse`] for source that is already in memory.
pub fn parse_str(source: &str) -> Result<File, ParseError> {
    parse_source(source, &ParseOptions::default())
}

pub fn parse_with_options(
    mut reader: impl Read,
    encoding: &str,
    options: &ParseOptions,
) -> Result<File, ParseError> {
    if !crate::is_supported_encoding(encoding) {
        return Err(ParseError::UnsupportedEncoding(encoding.to_string()));
    }

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    match std::str::from_utf8(&bytes) {
        Ok(source) => parse_source(source, options),
        Err(err) => {
            let error = utf8_error(&bytes, &err);
            debug!(offset = error.offset, "source is not valid UTF-8");
            Ok(File::unparsed(error.into()))
        }
    }
}

fn parse_source(source: &str, options: &ParseOptions) -> Result<File, ParseError> {
    with_parser(|parser| -> Result<File, ParseError> {
        let parsed = parser.parse_with_source(source)?;
        let lines = LineTable::new(source);

        if let Some(error) = first_syntax_error(&parsed, &lines) {
            debug!(location = %error.location, message = %error.message, "syntax error");
            return Ok(File::unparsed(error.into()));
        }

        let walked = walk(&parsed);
        debug!(
            bytes = source.len(),
            blocks = walked.blocks.len(),
            "walked declarations"
        );
        Ok(fix_block_boundaries(walked, source, &lines, options)?)
    })?
}
