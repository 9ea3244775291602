use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeSitterError {
    #[error("failed to set Go language for parser: {message}")]
    LanguageSet { message: String },

    #[error("tree-sitter returned no tree for {len} bytes of source")]
    ParseFailed { len: usize },
}
