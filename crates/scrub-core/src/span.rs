//! Byte ranges into a document source.

use std::ops::Range;

/// A half-open byte range `start..end` into a document source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a span from a byte range.
    ///
    /// # Panics
    ///
    /// Panics if `range.start > range.end`.
    pub fn new(range: Range<usize>) -> Self {
        assert!(range.start <= range.end, "span start must not exceed end");
        Self {
            start: range.start,
            end: range.end,
        }
    }

    /// Returns the start offset.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the span as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}
