//! Projects document text through the hidden and dimmed decorations into
//! what the terminal shows. Pure, so it is tested without a terminal.

use hushmark_engine::decoration::{DecorationKind, DecorationSet};
use hushmark_engine::text::lines_with_spans;
use hushmark_engine::{Span, TextSource};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;

/// A run of displayed text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub dim: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectedLine {
    pub segments: Vec<Segment>,
}

impl ProjectedLine {
    /// The displayed text without styling.
    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn width(&self) -> usize {
        self.segments.iter().map(|s| s.text.chars().count()).sum()
    }

    pub fn to_line(&self) -> Line<'static> {
        Line::from(
            self.segments
                .iter()
                .map(|s| {
                    let style = if s.dim {
                        Style::default().add_modifier(Modifier::DIM)
                    } else {
                        Style::default()
                    };
                    ratatui::text::Span::styled(s.text.clone(), style)
                })
                .collect::<Vec<_>>(),
        )
    }
}

fn push_segment(line: &mut ProjectedLine, text: &str, dim: bool) {
    if text.is_empty() {
        return;
    }
    match line.segments.last_mut() {
        Some(last) if last.dim == dim => last.text.push_str(text),
        _ => line.segments.push(Segment {
            text: text.to_string(),
            dim,
        }),
    }
}

fn is_dimmed(dimmed: &DecorationSet, offset: usize) -> bool {
    dimmed.iter().any(|d| {
        matches!(d.kind, DecorationKind::Mark { .. })
            && d.span.start <= offset
            && offset < d.span.end
    })
}

/// Visible text of `[from, to)`, split where dimming starts or stops.
fn push_visible(
    line: &mut ProjectedLine,
    text: &str,
    from: usize,
    to: usize,
    dimmed: &DecorationSet,
) {
    let mut cuts: Vec<usize> = dimmed
        .spans()
        .flat_map(|s| [s.start, s.end])
        .filter(|&cut| from < cut && cut < to)
        .collect();
    cuts.push(to);
    cuts.sort_unstable();

    let mut start = from;
    for cut in cuts {
        if cut <= start {
            continue;
        }
        let piece = text.slice(Span::new(start, cut));
        push_segment(line, piece.as_ref(), is_dimmed(dimmed, start));
        start = cut;
    }
}

/// Displays `[span.start, span.end)` of one line: replaced markers draw their
/// widget text, everything else shows through, dimmed where marked.
pub fn project_span(
    text: &str,
    span: Span,
    hidden: &DecorationSet,
    dimmed: &DecorationSet,
) -> ProjectedLine {
    let mut line = ProjectedLine::default();
    let mut pos = span.start;

    for decoration in hidden.iter() {
        let DecorationKind::Replace(widget) = decoration.kind else {
            continue;
        };
        let covered = decoration.span;
        if covered.end <= pos || covered.start >= span.end {
            continue;
        }
        let start = covered.start.max(pos);
        push_visible(&mut line, text, pos, start, dimmed);
        if covered.start >= span.start {
            push_segment(&mut line, widget.as_text(), is_dimmed(dimmed, covered.start));
        }
        pos = covered.end.min(span.end);
    }
    push_visible(&mut line, text, pos, span.end, dimmed);
    line
}

/// The `height` lines starting at `first_line`, as displayed.
pub fn project(
    text: &str,
    hidden: &DecorationSet,
    dimmed: &DecorationSet,
    first_line: usize,
    height: usize,
) -> Vec<ProjectedLine> {
    lines_with_spans(text)
        .skip(first_line)
        .take(height)
        .map(|line| project_span(text, line.span, hidden, dimmed))
        .collect()
}

/// Display column of `offset` within its line.
pub fn caret_column(text: &str, offset: usize, hidden: &DecorationSet) -> usize {
    let line = (&text).line_at(offset);
    let before = Span::new(line.start, offset.min(line.end));
    project_span(text, before, hidden, &DecorationSet::empty()).width()
}
