use std::sync::LazyLock;

use regex::Regex;

use crate::view::Selection;

/// `.`, `!` or `?` followed by one whitespace character or the end of the
/// text, or a blank line.
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[!.?](?:\s|$)|\n[ \t]*\n").expect("sentence pattern is valid"));

/// A blank line.
static PARAGRAPH_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("paragraph pattern is valid"));

/// What the focus window follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FocusUnit {
    #[default]
    Sentence,
    Paragraph,
}

impl FocusUnit {
    fn pattern(self) -> &'static Regex {
        match self {
            FocusUnit::Sentence => &SENTENCE_END,
            FocusUnit::Paragraph => &PARAGRAPH_END,
        }
    }
}

/// A `[start, end)` window with `0 <= start <= end <= len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SentenceBoundary {
    pub start: usize,
    pub end: usize,
}

fn skip_whitespace(text: &str, from: usize, limit: usize) -> usize {
    let limit = limit.min(text.len());
    let mut offset = from;
    for ch in text[from.min(limit)..limit].chars() {
        if !ch.is_whitespace() {
            break;
        }
        offset += ch.len_utf8();
    }
    offset.min(limit.max(from))
}

/// The sentence (or paragraph) window around `position`.
///
/// The window starts after the last boundary token ending at or before
/// `position`, past any whitespace following it, and ends at the end of the
/// first token ending after `position`, or at the end of the text.
pub fn boundary_at(text: &str, position: usize, unit: FocusUnit) -> SentenceBoundary {
    let mut position = position.min(text.len());
    while !text.is_char_boundary(position) {
        position -= 1;
    }

    let mut start = 0;
    let mut end = text.len();
    let mut last_end = 0;

    for token in unit.pattern().find_iter(text) {
        if token.end() <= position {
            last_end = token.end();
            start = skip_whitespace(text, last_end, text.len());
        } else {
            end = token.end();
            break;
        }
    }

    // Inside the whitespace run after a boundary: the window starts at the
    // caret rather than past it.
    if position < start {
        start = skip_whitespace(text, last_end, position);
    }

    SentenceBoundary { start, end }
}

/// The focus window for a selection: the union of the windows at both ends.
pub fn focus_window(text: &str, selection: Selection, unit: FocusUnit) -> SentenceBoundary {
    if selection.is_collapsed() {
        return boundary_at(text, selection.from, unit);
    }
    SentenceBoundary {
        start: boundary_at(text, selection.from, unit).start,
        end: boundary_at(text, selection.to, unit).end,
    }
}
