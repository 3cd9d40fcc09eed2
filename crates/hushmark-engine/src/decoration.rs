use crate::span::Span;

/// What a hidden marker is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    /// Literal replacement text; empty removes the marker visually.
    Text(&'static str),
    /// A vertical bar in the gutter of a block quote line.
    QuoteBar,
    /// A full-width horizontal separator.
    Separator,
}

impl Widget {
    /// Plain-text rendering, for surfaces without richer drawing.
    pub fn as_text(self) -> &'static str {
        match self {
            Widget::Text(text) => text,
            Widget::QuoteBar => "│ ",
            Widget::Separator => "────────",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    /// Draw `Widget` instead of the covered text.
    Replace(Widget),
    /// Keep the text, style it with a class (e.g. dimmed).
    Mark { class: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decoration {
    pub span: Span,
    pub kind: DecorationKind,
}

impl Decoration {
    pub fn replace(span: Span, widget: Widget) -> Self {
        Self {
            span,
            kind: DecorationKind::Replace(widget),
        }
    }

    pub fn mark(span: Span, class: &'static str) -> Self {
        Self {
            span,
            kind: DecorationKind::Mark { class },
        }
    }
}

/// Decorations from one builder pass, ordered by start offset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    pub fn new(mut decorations: Vec<Decoration>) -> Self {
        decorations.sort_by_key(|d| (d.span.start, d.span.end));
        Self { decorations }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Decoration> {
        self.decorations.iter()
    }

    pub fn spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.decorations.iter().map(|d| d.span)
    }

    /// A new set holding the decorations `keep` accepts; order is preserved.
    #[must_use]
    pub fn filter(&self, mut keep: impl FnMut(&Decoration) -> bool) -> Self {
        Self {
            decorations: self.decorations.iter().copied().filter(|d| keep(d)).collect(),
        }
    }

    /// Decorations touching `offset`.
    pub fn at(&self, offset: usize) -> impl Iterator<Item = &Decoration> + '_ {
        self.decorations
            .iter()
            .filter(move |d| d.span.touches(offset))
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.decorations.iter()
    }
}
