// Type-safe position wrappers to prevent byte/char confusion when tokens
// are addressed both by slicing (bytes) and by display offsets (chars).

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// 0-based byte position in source text
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize)]
pub struct BytePos(pub usize);

/// 0-based character position in source text
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize)]
pub struct CharPos(pub usize);

impl From<BytePos> for usize {
    fn from(pos: BytePos) -> Self {
        pos.0
    }
}

impl From<CharPos> for usize {
    fn from(pos: CharPos) -> Self {
        pos.0
    }
}

impl BytePos {
    pub fn new(pos: usize) -> Self {
        BytePos(pos)
    }

    pub fn advance(&self, offset: usize) -> Self {
        BytePos(self.0 + offset)
    }
}

impl CharPos {
    pub fn new(pos: usize) -> Self {
        CharPos(pos)
    }

    pub fn advance(&self, offset: usize) -> Self {
        CharPos(self.0 + offset)
    }
}

/// Half-open region of the source text, tracked in both bytes and characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: BytePos,
    pub end: BytePos,
    pub char_start: CharPos,
    pub char_end: CharPos,
}

impl TextSpan {
    pub fn new(start: BytePos, end: BytePos, char_start: CharPos, char_end: CharPos) -> Self {
        debug_assert!(start <= end && char_start <= char_end);
        Self {
            start,
            end,
            char_start,
            char_end,
        }
    }

    /// Span covering `text` when it starts at the given byte/char offsets
    pub fn covering(text: &str, start: BytePos, char_start: CharPos) -> Self {
        Self::new(
            start,
            start.advance(text.len()),
            char_start,
            char_start.advance(text.chars().count()),
        )
    }

    pub fn bytes(&self) -> Range<usize> {
        self.start.0..self.end.0
    }

    pub fn chars(&self) -> Range<usize> {
        self.char_start.0..self.char_end.0
    }

    pub fn byte_len(&self) -> usize {
        self.end.0 - self.start.0
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice this span out of the source it was produced from
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.bytes()]
    }
}
