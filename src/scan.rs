//! Depth-aware delimiter discovery over raw Go source.
//!
//! The parser reports where a declaration starts and ends, but not where
//! the braces of a composite body sit relative to the blocks around them.
//! These scans recover them from the text. Comments, interpreted strings,
//! raw strings and rune literals are skipped, so a `}` inside a struct tag
//! or a comment never counts.
//!
//! Scans must start on a token boundary (never inside a literal or comment).

/// An opening/closing delimiter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub open: u8,
    pub close: u8,
}

pub const BRACES: Delimiters = Delimiters {
    open: b'{',
    close: b'}',
};

/// Byte offset of the first `open` delimiter at or after `from`.
pub fn find_open(text: &[u8], from: usize, delimiters: Delimiters) -> Option<usize> {
    Significant::new(text, from)
        .find(|&(_, byte)| byte == delimiters.open)
        .map(|(pos, _)| pos)
}

/// Byte offset of the `close` delimiter that ends the enclosing pair,
/// scanning from `from` at depth zero. Nested pairs are skipped.
pub fn find_close(text: &[u8], from: usize, delimiters: Delimiters) -> Option<usize> {
    let mut depth = 0usize;
    for (pos, byte) in Significant::new(text, from) {
        if byte == delimiters.open {
            depth += 1;
        } else if byte == delimiters.close {
            if depth == 0 {
                return Some(pos);
            }
            depth -= 1;
        }
    }
    None
}

/// Offset just past the first newline in `text[from..to]`, or `to` when the
/// range holds no newline.
pub fn after_first_newline(text: &[u8], from: usize, to: usize) -> usize {
    text[from..to]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(to, |i| from + i + 1)
}

/// Bytes outside comments and literals, with their offsets.
struct Significant<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> Significant<'a> {
    fn new(text: &'a [u8], from: usize) -> Self {
        Self { text, pos: from }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.text.get(self.pos + offset).copied()
    }

    /// Skip past the closing `quote`, honoring backslash escapes. Stops at
    /// a newline for unterminated literals.
    fn skip_quoted(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(byte) = self.peek(0) {
            match byte {
                b'\\' => self.pos += 2,
                b'\n' => return,
                _ if byte == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn skip_until(&mut self, terminator: &[u8]) {
        match self.text[self.pos..]
            .windows(terminator.len())
            .position(|w| w == terminator)
        {
            Some(i) => self.pos += i + terminator.len(),
            None => self.pos = self.text.len(),
        }
    }
}

impl Iterator for Significant<'_> {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(byte) = self.peek(0) {
            match (byte, self.peek(1)) {
                (b'/', Some(b'/')) => {
                    self.pos += 2;
                    // the newline itself is not part of the comment
                    match self.text[self.pos..].iter().position(|&b| b == b'\n') {
                        Some(i) => self.pos += i,
                        None => self.pos = self.text.len(),
                    }
                }
                (b'/', Some(b'*')) => {
                    self.pos += 2;
                    self.skip_until(b"*/");
                }
                (b'"', _) | (b'\'', _) => self.skip_quoted(byte),
                (b'`', _) => {
                    self.pos += 1;
                    self.skip_until(b"`");
                }
                _ => {
                    self.pos += 1;
                    return Some((self.pos - 1, byte));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_open_after_keyword() {
        let text = b"type Person struct {\n";
        assert_eq!(find_open(text, 18, BRACES), Some(19));
    }

    #[test]
    fn open_skips_comments() {
        let text = b"struct /* { */ // {\n{";
        assert_eq!(find_open(text, 6, BRACES), Some(20));
    }

    #[test]
    fn close_at_depth_zero() {
        let text = b"\tName string\n}\n";
        assert_eq!(find_close(text, 12, BRACES), Some(13));
    }

    #[test]
    fn close_skips_nested_pairs() {
        let text = b" Inner struct { X int } \n}";
        assert_eq!(find_close(text, 0, BRACES), Some(25));
    }

    #[test]
    fn close_ignores_literals() {
        let text = b" `json:\"}\"` \"}\\\"}\" '}' // }\n /* } */ }";
        let expected = text.len() - 1;
        assert_eq!(find_close(text, 0, BRACES), Some(expected));
    }

    #[test]
    fn unterminated_close_is_none() {
        assert_eq!(find_close(b"{ x", 0, BRACES), None);
        assert_eq!(find_open(b"struct", 0, BRACES), None);
    }

    #[test]
    fn newline_search() {
        let text = b"a {\n\tb";
        assert_eq!(after_first_newline(text, 3, 5), 4);
        assert_eq!(after_first_newline(text, 1, 2), 2);
        assert_eq!(after_first_newline(b"x\n\n\ny", 1, 4), 2);
    }
}
