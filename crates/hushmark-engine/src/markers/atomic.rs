//! Hidden markers still exist in the text; caret motion and deletion must
//! treat each hidden span as one indivisible unit.

use crate::span::Span;
use crate::text::TextSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Sorted, non-overlapping spans that the caret may not enter.
///
/// Touching spans are merged, so `**` hidden as two one-byte delimiters is
/// skipped in a single step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtomicRanges {
    spans: Vec<Span>,
}

impl AtomicRanges {
    pub fn new(spans: impl IntoIterator<Item = Span>) -> Self {
        let mut sorted: Vec<Span> = spans.into_iter().filter(|s| !s.is_empty()).collect();
        sorted.sort();

        let mut spans: Vec<Span> = Vec::with_capacity(sorted.len());
        for span in sorted {
            match spans.last_mut() {
                Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
                _ => spans.push(span),
            }
        }
        Self { spans }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The span whose interior holds `offset`.
    pub fn containing(&self, offset: usize) -> Option<Span> {
        let idx = self.spans.partition_point(|s| s.end <= offset);
        self.spans
            .get(idx)
            .copied()
            .filter(|s| s.strictly_contains(offset))
    }

    fn ending_at(&self, offset: usize) -> Option<Span> {
        let idx = self.spans.partition_point(|s| s.end < offset);
        self.spans.get(idx).copied().filter(|s| s.end == offset)
    }

    fn starting_at(&self, offset: usize) -> Option<Span> {
        let idx = self.spans.partition_point(|s| s.start < offset);
        self.spans.get(idx).copied().filter(|s| s.start == offset)
    }

    /// Moves an offset out of any hidden interior, towards `direction`.
    pub fn snap(&self, offset: usize, direction: Direction) -> usize {
        match (self.containing(offset), direction) {
            (Some(span), Direction::Backward) => span.start,
            (Some(span), Direction::Forward) => span.end,
            (None, _) => offset,
        }
    }

    /// One caret step from `offset`: a whole hidden span when one is
    /// adjacent, otherwise one code point.
    pub fn move_caret(&self, text: &dyn TextSource, offset: usize, direction: Direction) -> usize {
        let offset = self.snap(offset.min(text.len()), direction);
        match direction {
            Direction::Forward => {
                if let Some(span) = self.starting_at(offset) {
                    return span.end;
                }
                let next = text.next_char_boundary(offset).unwrap_or(offset);
                self.snap(next, Direction::Forward)
            }
            Direction::Backward => {
                if let Some(span) = self.ending_at(offset) {
                    return span.start;
                }
                let prev = text.prev_char_boundary(offset).unwrap_or(offset);
                self.snap(prev, Direction::Backward)
            }
        }
    }

    /// Range removed by backspace (`Backward`) or delete (`Forward`) at a
    /// collapsed caret. Empty at the document edges.
    pub fn deletion(&self, text: &dyn TextSource, offset: usize, direction: Direction) -> Span {
        let offset = self.snap(offset.min(text.len()), direction);
        let target = self.move_caret(text, offset, direction);
        Span::new(offset, target)
    }
}
