use xi_rope::delta::{Builder, Transformer};
use xi_rope::{Delta, Rope, RopeInfo};

use crate::span::Span;
use crate::view::Selection;

/// A text change, in offsets of the document before the change.
///
/// Offsets are clamped to the document; callers keep them on code-point
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert { at: usize, text: String },
    Delete { range: Span },
    Replace { range: Span, text: String },
}

impl Edit {
    /// The replaced range, clamped to a document of `len` bytes.
    pub fn range(&self, len: usize) -> Span {
        match self {
            Edit::Insert { at, .. } => Span::new(*at, *at).clamp_to(len),
            Edit::Delete { range } | Edit::Replace { range, .. } => range.clamp_to(len),
        }
    }

    pub fn inserted(&self) -> &str {
        match self {
            Edit::Insert { text, .. } | Edit::Replace { text, .. } => text,
            Edit::Delete { .. } => "",
        }
    }
}

/// Result of applying an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Ranges of the new document written by the edit; empty for pure deletions.
    pub changed: Vec<Span>,
    pub new_selection: Selection,
    pub version: u64,
}

/// Compiles an edit into a delta over a document of `len` bytes.
pub(crate) fn compile(edit: &Edit, len: usize) -> Delta<RopeInfo> {
    let range = edit.range(len);
    let mut builder = Builder::new(len);
    match edit {
        Edit::Delete { .. } => builder.delete(range.start..range.end),
        Edit::Insert { text, .. } | Edit::Replace { text, .. } => {
            builder.replace(range.start..range.end, Rope::from(text.as_str()))
        }
    }
    builder.build()
}

/// Where the selection lands after `delta`. Insertions at a selection edge
/// push that edge forward, so a caret follows typed text.
pub(crate) fn transform_selection(delta: &Delta<RopeInfo>, selection: Selection) -> Selection {
    let mut transformer = Transformer::new(delta);
    let from = transformer.transform(selection.from, true);
    let to = transformer.transform(selection.to, true);
    Selection::new(from, to)
}
