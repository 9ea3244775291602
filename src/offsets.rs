//! Byte offset to rune offset translation.
//!
//! The translator is a forward-only cursor: spans are resolved in document
//! order, so each request continues counting from where the previous one
//! stopped and the whole buffer is decoded at most once.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OffsetError {
    #[error("byte offset {offset} is past the end of the source ({len} bytes)")]
    OutOfRange { offset: usize, len: usize },

    #[error("byte offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },

    #[error("byte offset {offset} requested after offset {cursor} was already resolved")]
    Backwards { offset: usize, cursor: usize },
}

/// Forward cursor over a UTF-8 buffer counting decoded characters.
#[derive(Debug, Clone)]
pub struct RuneCursor<'a> {
    source: &'a str,
    byte: usize,
    rune: usize,
}

impl<'a> RuneCursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            byte: 0,
            rune: 0,
        }
    }

    /// Translate `offset` (bytes) into a rune offset.
    ///
    /// Offsets must be requested in non-decreasing order.
    pub fn rune_offset(&mut self, offset: usize) -> Result<usize, OffsetError> {
        if offset > self.source.len() {
            return Err(OffsetError::OutOfRange {
                offset,
                len: self.source.len(),
            });
        }
        if !self.source.is_char_boundary(offset) {
            return Err(OffsetError::NotCharBoundary { offset });
        }
        if offset < self.byte {
            return Err(OffsetError::Backwards {
                offset,
                cursor: self.byte,
            });
        }

        self.rune += self.source[self.byte..offset].chars().count();
        self.byte = offset;
        Ok(self.rune)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_identity() {
        let mut cursor = RuneCursor::new("package main\n");
        assert_eq!(cursor.rune_offset(0), Ok(0));
        assert_eq!(cursor.rune_offset(7), Ok(7));
        assert_eq!(cursor.rune_offset(13), Ok(13));
    }

    #[test]
    fn multibyte_characters_count_once() {
        // 'é' is 2 bytes, '世' is 3 bytes
        let source = "é世x";
        let mut cursor = RuneCursor::new(source);
        assert_eq!(cursor.rune_offset(2), Ok(1));
        assert_eq!(cursor.rune_offset(5), Ok(2));
        assert_eq!(cursor.rune_offset(6), Ok(3));
    }

    #[test]
    fn repeated_offset_is_stable() {
        let mut cursor = RuneCursor::new("ñandú");
        assert_eq!(cursor.rune_offset(2), Ok(1));
        assert_eq!(cursor.rune_offset(2), Ok(1));
    }

    #[test]
    fn rejects_mid_character_offset() {
        let mut cursor = RuneCursor::new("世");
        assert_eq!(
            cursor.rune_offset(1),
            Err(OffsetError::NotCharBoundary { offset: 1 })
        );
    }

    #[test]
    fn rejects_out_of_range() {
        let mut cursor = RuneCursor::new("ab");
        assert_eq!(
            cursor.rune_offset(3),
            Err(OffsetError::OutOfRange { offset: 3, len: 2 })
        );
    }

    #[test]
    fn rejects_backwards_request() {
        let mut cursor = RuneCursor::new("abcdef");
        cursor.rune_offset(4).unwrap();
        assert_eq!(
            cursor.rune_offset(2),
            Err(OffsetError::Backwards {
                offset: 2,
                cursor: 4
            })
        );
    }
}
