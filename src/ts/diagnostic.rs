//! Turns tree-sitter's error recovery into a single hard syntax error.
//!
//! Tree-sitter always produces a tree; ERROR and MISSING nodes mark the
//! places it recovered. The Go grammar is also more permissive than the
//! language at the top level (statements and a missing package clause are
//! accepted), so those cases are checked here as well.

use crate::tree::{Location, ParsingError};
use crate::ts::lines::LineTable;
use crate::ts::parser::ParsedSource;
use std::str::Utf8Error;
use tree_sitter::Node;

/// Longest token excerpt shown in a message.
const TOKEN_EXCERPT_LIMIT: usize = 32;

/// Literal kinds whose delimiters are separate leaves in the grammar.
const STRING_LITERALS: [&str; 3] = [
    "interpreted_string_literal",
    "raw_string_literal",
    "rune_literal",
];

/// The first syntax error of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte offset of the error.
    pub offset: usize,
    pub location: Location,
    /// Diagnostic text prefixed with the 1-based `line:column`.
    pub message: String,
}

impl SyntaxError {
    fn new(lines: &LineTable, offset: usize, text: impl AsRef<str>) -> Self {
        let (line, byte_column) = lines.line_and_byte_column(offset);
        let message = format!("{}:{}: {}", line, byte_column + 1, text.as_ref());
        let location = lines.location(offset);
        Self {
            offset,
            location,
            message,
        }
    }
}

impl From<SyntaxError> for ParsingError {
    fn from(error: SyntaxError) -> Self {
        ParsingError {
            location: error.location,
            message: error.message,
        }
    }
}

/// Error for input bytes that are not valid UTF-8.
pub fn utf8_error(bytes: &[u8], error: &Utf8Error) -> SyntaxError {
    let lines = LineTable::new(bytes);
    SyntaxError::new(&lines, error.valid_up_to(), "illegal UTF-8 encoding")
}

/// Find the first syntax error in a parsed Go file, if any.
pub fn first_syntax_error(parsed: &ParsedSource<'_>, lines: &LineTable) -> Option<SyntaxError> {
    let root = parsed.root_node();
    let mut saw_package = false;
    let mut saw_declaration = false;

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.is_error() || child.is_missing() {
            return Some(error_node(parsed, lines, child));
        }
        if !child.is_named() || child.kind() == "comment" {
            continue;
        }

        let found = first_token(parsed, child);
        if !saw_package {
            if child.kind() != "package_clause" {
                return Some(SyntaxError::new(
                    lines,
                    child.start_byte(),
                    format!("expected 'package', found {found}"),
                ));
            }
            saw_package = true;
        } else {
            match child.kind() {
                "import_declaration" if saw_declaration => {
                    return Some(SyntaxError::new(
                        lines,
                        child.start_byte(),
                        "imports must appear before other declarations",
                    ));
                }
                "import_declaration" => {}
                "const_declaration" | "var_declaration" | "type_declaration"
                | "function_declaration" | "method_declaration" => saw_declaration = true,
                _ => {
                    return Some(SyntaxError::new(
                        lines,
                        child.start_byte(),
                        format!("expected declaration, found {found}"),
                    ));
                }
            }
        }

        if child.has_error() {
            if let Some(node) = first_error_in(child) {
                return Some(error_node(parsed, lines, node));
            }
        }
    }

    if !saw_package {
        return Some(SyntaxError::new(
            lines,
            parsed.source.len(),
            "expected 'package', found 'EOF'",
        ));
    }

    parsed
        .first_error_node()
        .map(|node| error_node(parsed, lines, node))
}

fn error_node(parsed: &ParsedSource<'_>, lines: &LineTable, node: Node<'_>) -> SyntaxError {
    if node.is_missing() {
        return SyntaxError::new(
            lines,
            node.start_byte(),
            format!("syntax error: missing '{}'", node.kind()),
        );
    }
    let found = first_token(parsed, node);
    SyntaxError::new(
        lines,
        node.start_byte(),
        format!("syntax error: unexpected {found}"),
    )
}

fn first_error_in(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error_in);
    found
}

/// The first token under `node`, cut to one line and rendered the way
/// `go/parser` does: keywords and operators quoted, identifiers and
/// literals bare.
fn first_token(parsed: &ParsedSource<'_>, node: Node<'_>) -> String {
    let mut leaf = node;
    while !STRING_LITERALS.contains(&leaf.kind()) {
        match leaf.child(0) {
            Some(child) => leaf = child,
            None => break,
        }
    }
    let text = parsed.node_text(leaf).lines().next().unwrap_or("");
    if text.is_empty() {
        return "'EOF'".to_string();
    }
    let excerpt: String = text.chars().take(TOKEN_EXCERPT_LIMIT).collect();
    if leaf.is_named() {
        excerpt
    } else {
        format!("'{excerpt}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::parser::GoParser;

    fn check(source: &str) -> Option<SyntaxError> {
        let mut parser = GoParser::new().unwrap();
        let parsed = parser.parse_with_source(source).unwrap();
        first_syntax_error(&parsed, &LineTable::new(source))
    }

    #[test]
    fn valid_file_has_no_error() {
        assert_eq!(check("package main\n\nfunc main() {}\n"), None);
    }

    #[test]
    fn empty_file_expects_package() {
        let error = check("").unwrap();
        assert_eq!(error.location, Location::new(1, 0));
        assert_eq!(error.message, "1:1: expected 'package', found 'EOF'");
    }

    #[test]
    fn comment_only_file_reports_eof_position() {
        let error = check("// just a comment\n").unwrap();
        assert_eq!(error.location, Location::new(2, 0));
        assert_eq!(error.message, "2:1: expected 'package', found 'EOF'");
    }

    #[test]
    fn declaration_before_package() {
        let error = check("func main() {}\n").unwrap();
        assert_eq!(error.message, "1:1: expected 'package', found 'func'");
    }

    #[test]
    fn second_package_clause() {
        let error = check("package a\npackage b\n").unwrap();
        assert_eq!(error.message, "2:1: expected declaration, found 'package'");
    }

    #[test]
    fn import_after_declaration() {
        let error = check("package a\n\nconst N = 1\n\nimport \"fmt\"\n").unwrap();
        assert_eq!(error.location, Location::new(5, 0));
        assert_eq!(
            error.message,
            "5:1: imports must appear before other declarations"
        );
    }

    #[test]
    fn broken_function_reports_inner_error() {
        let error = check("package a\n\nfunc main( {\n}\n").unwrap();
        assert!(error.location.line >= 3, "{error:?}");
        assert!(error.message.starts_with(&format!("{}:", error.location.line)));
    }

    #[test]
    fn top_level_statement_is_rejected() {
        let error = check("package a\n\nx := 1\n").unwrap();
        assert_eq!(error.location, Location::new(3, 0));
        assert_eq!(error.message, "3:1: expected declaration, found x");
    }

    #[test]
    fn literals_are_reported_bare() {
        let error = check("package a\n\n\"fmt\"\n").unwrap();
        assert_eq!(error.location, Location::new(3, 0));
        assert_eq!(error.message, "3:1: expected declaration, found \"fmt\"");
    }

    #[test]
    fn invalid_utf8_position() {
        let bytes = b"package a\n\xff";
        let error = std::str::from_utf8(bytes).unwrap_err();
        let syntax = utf8_error(bytes, &error);
        assert_eq!(syntax.offset, 10);
        assert_eq!(syntax.message, "2:1: illegal UTF-8 encoding");
    }

    #[test]
    fn converts_into_parsing_error() {
        let error = check("").unwrap();
        let parsing: ParsingError = error.into();
        assert_eq!(parsing.location, Location::new(1, 0));
    }
}
