use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

/// Half-open byte span `[begin, end)` over a text buffer
///
/// A `ByteRange` carries no reference to the buffer it indexes; it is only
/// meaningful together with the text it was produced from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteRange {
    /// Offset of the first byte (inclusive)
    pub begin: usize,
    /// Offset one past the last byte (exclusive)
    pub end: usize,
}

impl ByteRange {
    /// Create a range from trusted offsets
    pub fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end, "ByteRange begin {} > end {}", begin, end);
        Self { begin, end }
    }

    /// Create a range, rejecting `begin > end`
    pub fn try_new(begin: usize, end: usize) -> BridgeResult<Self> {
        if begin > end {
            return Err(BridgeError::InvalidRange { begin, end });
        }
        Ok(Self { begin, end })
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Whether `other` lies entirely inside this range
    pub fn contains(&self, other: &ByteRange) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// Borrow the bytes this range covers in `text`
    ///
    /// Returns `None` when the range runs past the buffer or splits a UTF-8
    /// character.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.begin..self.end)
    }
}

impl From<std::ops::Range<usize>> for ByteRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        ByteRange::new(range.start, range.end)
    }
}
