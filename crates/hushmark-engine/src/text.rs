use std::borrow::Cow;

use xi_rope::Rope;

use crate::span::Span;

/// Read access to document text, as needed by the decoration engine.
///
/// Implemented by [`Rope`] (and [`crate::Document`] through it) and by `&str`
/// for tests and for callers that already hold the whole text.
pub trait TextSource {
    /// Length in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text of `span`, clamped to the document.
    fn slice(&self, span: Span) -> Cow<'_, str>;

    /// The line containing `offset`, without its line terminator.
    fn line_at(&self, offset: usize) -> Span;

    /// Start of the code point before `offset`, if any.
    fn prev_char_boundary(&self, offset: usize) -> Option<usize>;

    /// End of the code point starting at `offset`, if any.
    fn next_char_boundary(&self, offset: usize) -> Option<usize>;
}

impl TextSource for &str {
    fn len(&self) -> usize {
        str::len(self)
    }

    fn slice(&self, span: Span) -> Cow<'_, str> {
        let span = span.clamp_to(str::len(self));
        // Silently clamp invalid ranges; offsets can trail an edit by one update.
        Cow::Borrowed(self.get(span.start..span.end).unwrap_or(""))
    }

    fn line_at(&self, offset: usize) -> Span {
        let bytes = self.as_bytes();
        let offset = offset.min(bytes.len());
        let start = bytes[..offset]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let mut end = bytes[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(bytes.len(), |i| offset + i);
        if end > start && bytes[end - 1] == b'\r' {
            end -= 1;
        }
        Span::new(start, end)
    }

    fn prev_char_boundary(&self, offset: usize) -> Option<usize> {
        let offset = offset.min(str::len(self));
        (0..offset).rev().find(|&i| self.is_char_boundary(i))
    }

    fn next_char_boundary(&self, offset: usize) -> Option<usize> {
        let len = str::len(self);
        if offset >= len {
            return None;
        }
        (offset + 1..=len).find(|&i| self.is_char_boundary(i))
    }
}

impl TextSource for Rope {
    fn len(&self) -> usize {
        Rope::len(self)
    }

    fn slice(&self, span: Span) -> Cow<'_, str> {
        // Clamp range to document bounds to prevent xi-rope panic
        let span = span.clamp_to(Rope::len(self));
        self.slice_to_cow(span.start..span.end)
    }

    fn line_at(&self, offset: usize) -> Span {
        let len = Rope::len(self);
        let offset = offset.min(len);
        let start = self.offset_of_line(self.line_of_offset(offset));
        let raw = self.lines_raw(start..len).next().unwrap_or_default();
        let line = raw.strip_suffix('\n').unwrap_or(&raw);
        let line = line.strip_suffix('\r').unwrap_or(line);
        Span::new(start, start + line.len())
    }

    fn prev_char_boundary(&self, offset: usize) -> Option<usize> {
        self.prev_codepoint_offset(offset.min(Rope::len(self)))
    }

    fn next_char_boundary(&self, offset: usize) -> Option<usize> {
        if offset >= Rope::len(self) {
            return None;
        }
        self.next_codepoint_offset(offset)
    }
}

/// A reference to a single line with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef<'a> {
    /// Byte span of this line (excludes the newline).
    pub span: Span,
    pub text: &'a str,
}

/// Returns an iterator over lines with their byte spans.
///
/// A trailing newline yields a final empty line, so a caret placed after it
/// still has a line to live on.
pub fn lines_with_spans(text: &str) -> impl Iterator<Item = LineRef<'_>> + '_ {
    let mut offset = 0usize;
    text.split('\n').map(move |line| {
        let start = offset;
        offset += line.len() + 1;
        LineRef {
            span: Span::new(start, start + line.len()),
            text: line,
        }
    })
}
