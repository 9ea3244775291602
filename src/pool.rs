//! Thread-local parser pooling.
//!
//! Creating a tree-sitter parser and loading the Go grammar is done once
//! per thread; later parses on the same thread reuse it.

use crate::ts::{GoParser, TreeSitterError};
use std::cell::RefCell;

thread_local! {
    static GO_PARSER: RefCell<Option<GoParser>> = const { RefCell::new(None) };
}

/// Execute `f` with the pooled parser of the current thread.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use godecl::pool::with_parser;
///
/// let has_errors = with_parser(|parser| {
///     parser.parse_with_source("package main\n").map(|p| p.has_errors())
/// })??;
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut GoParser) -> R,
{
    GO_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let mut parser = match slot.take() {
            Some(parser) => parser,
            None => GoParser::new()?,
        };
        let result = f(&mut parser);
        *slot = Some(parser);
        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pooled_parser_is_reused() {
        let first = with_parser(|parser| parser.parse("package a\n").is_ok()).unwrap();
        let second = with_parser(|parser| parser.parse("package b\n").is_ok()).unwrap();
        assert!(first && second);
    }
}
