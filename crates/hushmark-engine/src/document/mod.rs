//! The editing surface the decoration providers read from.

mod edit;
mod tree;

use std::borrow::Cow;

use tree_sitter::{InputEdit, Parser, Point};
use tree_sitter_md::{INLINE_LANGUAGE, LANGUAGE};
use xi_rope::Rope;

pub use edit::{Edit, Patch};
pub use tree::MarkdownTree;

use crate::span::Span;
use crate::text::TextSource;
use crate::view::{Selection, UpdateFlags, ViewUpdate};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("failed to load markdown grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}

/// A markdown buffer, its selection and its syntax tree.
///
/// The rope is the single source of truth. Every [`Edit`] is compiled to a
/// delta; the block tree is told about the edit (in old-text coordinates)
/// before the delta is applied, then reparsed incrementally. The version
/// doubles as the revision that decoration providers memoize on.
///
/// ```
/// use hushmark_engine::{Document, Edit, Selection, UpdateFlags};
///
/// let mut doc = Document::from_bytes(b"# Hello").unwrap();
/// let patch = doc.apply(Edit::Insert { at: 7, text: " world".to_string() });
/// assert_eq!(doc.text(), "# Hello world");
/// assert_eq!(patch.new_selection, Selection::cursor(13));
///
/// let update = doc.view_update(&[], UpdateFlags::ALL);
/// assert_eq!(update.revision, 1);
/// ```
pub struct Document {
    buffer: Rope,
    selection: Selection,
    version: u64,
    parser: Parser,
    inline_parser: Parser,
    syntax: MarkdownTree,
}

impl Document {
    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)?;
        let buffer = Rope::from(text);
        let len = buffer.len();

        let mut parser = Parser::new();
        parser.set_language(&LANGUAGE.into())?;
        let mut inline_parser = Parser::new();
        inline_parser.set_language(&INLINE_LANGUAGE.into())?;

        let syntax = MarkdownTree::parse(&mut parser, &mut inline_parser, buffer.clone(), None);

        Ok(Self {
            buffer,
            selection: Selection::cursor(len), // Start with cursor at end
            version: 0,
            parser,
            inline_parser,
            syntax,
        })
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Clamped to the document; does not bump the version.
    pub fn set_selection(&mut self, selection: Selection) {
        let len = self.len();
        self.selection = Selection::new(selection.from.min(len), selection.to.min(len));
    }

    pub fn syntax(&self) -> &MarkdownTree {
        &self.syntax
    }

    /// Apply an edit: buffer, syntax tree, selection and version move together.
    pub fn apply(&mut self, edit: Edit) -> Patch {
        let old_len = self.len();
        let range = edit.range(old_len);
        let delta = edit::compile(&edit, old_len);

        let old_tree = self.syntax.take_block().map(|mut tree| {
            // Coordinates come from the OLD buffer, so this happens before the delta is applied
            tree.edit(&self.input_edit(range, edit.inserted()));
            tree
        });
        self.buffer = delta.apply(&self.buffer);
        self.syntax = MarkdownTree::parse(
            &mut self.parser,
            &mut self.inline_parser,
            self.buffer.clone(),
            old_tree.as_ref(),
        );

        self.selection = edit::transform_selection(&delta, self.selection);
        self.version += 1;

        let inserted = edit.inserted().len();
        let changed = if inserted > 0 {
            vec![Span::new(range.start, range.start + inserted)]
        } else {
            Vec::new()
        };
        log::debug!(
            "applied edit at {}..{} (+{inserted} bytes), version {}",
            range.start,
            range.end,
            self.version
        );

        Patch {
            changed,
            new_selection: self.selection,
            version: self.version,
        }
    }

    /// The state the decoration providers see, as of now.
    pub fn view_update<'a>(
        &'a self,
        visible_ranges: &'a [Span],
        flags: UpdateFlags,
    ) -> ViewUpdate<'a> {
        ViewUpdate {
            text: self,
            tree: &self.syntax,
            selection: self.selection,
            visible_ranges,
            revision: self.version,
            flags,
        }
    }

    /// tree-sitter's description of replacing `range` with `inserted`.
    ///
    /// Must be called BEFORE the delta is applied to the buffer.
    fn input_edit(&self, range: Span, inserted: &str) -> InputEdit {
        let start_position = self.point_at(range.start);
        let old_end_position = self.point_at(range.end);
        let new_end_position = match inserted.rfind('\n') {
            Some(last_newline) => Point {
                row: start_position.row + inserted.matches('\n').count(),
                column: inserted.len() - last_newline - 1,
            },
            None => Point {
                row: start_position.row,
                column: start_position.column + inserted.len(),
            },
        };
        InputEdit {
            start_byte: range.start,
            old_end_byte: range.end,
            new_end_byte: range.start + inserted.len(),
            start_position,
            old_end_position,
            new_end_position,
        }
    }

    fn point_at(&self, offset: usize) -> Point {
        let offset = offset.min(self.len());
        let row = self.buffer.line_of_offset(offset);
        Point {
            row,
            column: offset - self.buffer.offset_of_line(row),
        }
    }

    /// Slice the buffer to a cow string
    pub(crate) fn slice_to_cow(&self, span: Span) -> Cow<'_, str> {
        TextSource::slice(&self.buffer, span)
    }
}

impl TextSource for Document {
    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn slice(&self, span: Span) -> Cow<'_, str> {
        self.slice_to_cow(span)
    }

    fn line_at(&self, offset: usize) -> Span {
        self.buffer.line_at(offset)
    }

    fn prev_char_boundary(&self, offset: usize) -> Option<usize> {
        self.buffer.prev_char_boundary(offset)
    }

    fn next_char_boundary(&self, offset: usize) -> Option<usize> {
        self.buffer.next_char_boundary(offset)
    }
}

impl Clone for Document {
    fn clone(&self) -> Self {
        // Parser doesn't implement Clone; the trees are shared
        let mut parser = Parser::new();
        let _ = parser.set_language(&LANGUAGE.into());
        let mut inline_parser = Parser::new();
        let _ = inline_parser.set_language(&INLINE_LANGUAGE.into());

        Self {
            buffer: self.buffer.clone(),
            selection: self.selection,
            version: self.version,
            parser,
            inline_parser,
            syntax: self.syntax.clone(),
        }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.len())
            .field("selection", &self.selection)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
