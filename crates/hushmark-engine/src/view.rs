use crate::span::Span;
use crate::syntax::SyntaxTree;
use crate::text::TextSource;

/// The main selection, normalized so that `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub from: usize,
    pub to: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self {
            from: anchor.min(head),
            to: anchor.max(head),
        }
    }

    pub fn cursor(at: usize) -> Self {
        Self { from: at, to: at }
    }

    pub fn is_collapsed(self) -> bool {
        self.from == self.to
    }

    pub fn span(self) -> Span {
        Span::new(self.from, self.to)
    }

    /// Cursor: inside `span` with both ends included.
    /// Range: open-interval overlap with `span`.
    pub fn engages(self, span: Span) -> bool {
        if self.is_collapsed() {
            span.touches(self.from)
        } else {
            self.from < span.end && self.to > span.start
        }
    }
}

impl From<std::ops::Range<usize>> for Selection {
    fn from(range: std::ops::Range<usize>) -> Self {
        Selection::new(range.start, range.end)
    }
}

/// Which parts of the view changed since the previous notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateFlags {
    pub doc_changed: bool,
    pub selection_set: bool,
    pub viewport_changed: bool,
}

impl UpdateFlags {
    /// Everything changed; used for the first update of a provider.
    pub const ALL: UpdateFlags = UpdateFlags {
        doc_changed: true,
        selection_set: true,
        viewport_changed: true,
    };

    pub fn any(self) -> bool {
        self.doc_changed || self.selection_set || self.viewport_changed
    }
}

/// A view-update notification: the new state plus what changed.
#[derive(Clone, Copy)]
pub struct ViewUpdate<'a> {
    pub text: &'a dyn TextSource,
    pub tree: &'a dyn SyntaxTree,
    pub selection: Selection,
    /// Visible byte ranges, ascending. Empty means the whole document.
    pub visible_ranges: &'a [Span],
    /// Document revision; bumped on every edit.
    pub revision: u64,
    pub flags: UpdateFlags,
}

impl std::fmt::Debug for ViewUpdate<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewUpdate")
            .field("len", &self.text.len())
            .field("selection", &self.selection)
            .field("visible_ranges", &self.visible_ranges)
            .field("revision", &self.revision)
            .field("flags", &self.flags)
            .finish()
    }
}
