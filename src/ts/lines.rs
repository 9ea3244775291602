use crate::tree::Location;

/// Byte offset to line/column lookup, built once per source buffer.
///
/// Columns follow the Go tokenizer: 1-based, counted in bytes. An offset
/// sitting at the very start of a line is reported with column 0, the
/// marker for line-start positions such as the leading edge of a block.
#[derive(Debug, Clone)]
pub struct LineTable {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineTable {
    pub fn new(source: impl AsRef<[u8]>) -> Self {
        let source = source.as_ref();
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .iter()
                    .copied()
                    .enumerate()
                    .filter(|&(_, b)| b == b'\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Location of `offset`. Offsets past the end clamp to the end of input.
    pub fn location(&self, offset: usize) -> Location {
        let (line, column) = self.line_and_byte_column(offset);
        Location::new(line, tokenizer_column(column))
    }

    /// 1-based line and 0-based byte column of `offset`, without the
    /// line-start convention.
    pub fn line_and_byte_column(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        (line + 1, offset - self.line_starts[line])
    }
}

/// Convert a tree-sitter point to a [`Location`].
pub fn point_location(point: tree_sitter::Point) -> Location {
    Location::new(point.row + 1, tokenizer_column(point.column))
}

fn tokenizer_column(byte_column: usize) -> usize {
    match byte_column {
        0 => 0,
        column => column + 1,
    }
}
