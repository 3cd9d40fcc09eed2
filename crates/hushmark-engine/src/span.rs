/// A byte range `[start, end)` into the document.
///
/// Syntax nodes, marker candidates, decorations and focus windows are all
/// expressed as spans; the text itself is never copied into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Builds a span, swapping the bounds if they arrive reversed.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True when `offset` lies in `[start, end]`, both ends included.
    #[must_use]
    pub fn touches(self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// True when `offset` lies strictly between the two ends.
    #[must_use]
    pub fn strictly_contains(self, offset: usize) -> bool {
        self.start < offset && offset < self.end
    }

    /// Open-interval overlap: shared interior, touching ends do not count.
    #[must_use]
    pub fn overlaps(self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Closed-interval intersection: touching ends count.
    #[must_use]
    pub fn intersects(self, other: Span) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Clamps both ends to `len`.
    #[must_use]
    pub fn clamp_to(self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}
