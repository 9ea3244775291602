//! godecl: structural declaration trees for Go source
//!
//! Turns a Go file into a tree of addressable blocks (declarations and
//! composite containers) with exact character offsets, for structural
//! diff and merge tools that align and re-render regions of two file
//! versions.
//!
//! # Architecture
//!
//! Parsing is done by tree-sitter with the Go grammar bundled in
//! ast-grep-language. The tree is then built in two passes:
//!
//! 1. [`walker`] extracts declarations and containers with byte positions,
//!    as a flat, parent-linked sequence in document order.
//! 2. [`boundary`] extends every block over its leading comments, finds the
//!    braces of each container, translates bytes into rune offsets and
//!    checks that siblings are ordered and nested blocks are contained.
//!
//! Syntax errors are not failures: the returned [`File`] carries a single
//! [`ParsingError`] and no declarations.
//!
//! # Example
//!
//! ```no_run
//! use godecl::{parse, BlockRef};
//!
//! let source = "package shapes\n\ntype Point struct {\n\tX, Y int\n}\n";
//! let file = parse(source.as_bytes(), "UTF-8").unwrap();
//!
//! for block in file.blocks() {
//!     match block {
//!         BlockRef::Node(node) => println!("{} {}", node.kind.as_str(), node.name),
//!         BlockRef::Container(c) => println!("{} {} {}", c.kind.as_str(), c.name, c.header_span),
//!     }
//! }
//! ```

pub mod boundary;
pub mod config;
pub mod debug;
pub mod offsets;
pub mod parse;
pub mod pool;
pub mod scan;
pub mod tree;
pub mod ts;
pub mod walker;

pub use boundary::BoundaryError;
pub use config::{Config, ConfigError, ParseOptions};
pub use offsets::{OffsetError, RuneCursor};
pub use parse::{parse, parse_str, parse_with_options, ParseError};
pub use tree::{
    BlockRef, Container, ContainerType, File, Location, LocationSpan, Node, NodeType,
    ParsingError, RuneSpan,
};
pub use ts::TreeSitterError;

/// The only encoding accepted by [`parse`].
pub const UTF8: &str = "UTF-8";

/// Whether `encoding` names UTF-8 (ASCII case-insensitive).
pub fn is_supported_encoding(encoding: &str) -> bool {
    encoding.eq_ignore_ascii_case(UTF8)
}
