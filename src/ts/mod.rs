//! Tree-sitter integration: the native Go parser and what the rest of the
//! crate needs from it (syntax error detection, line lookup).

pub mod diagnostic;
pub mod errors;
pub mod lines;
pub mod parser;

pub use diagnostic::{first_syntax_error, SyntaxError};
pub use errors::TreeSitterError;
pub use lines::LineTable;
pub use parser::{GoParser, ParsedSource};
