//! Decorations for a markdown editor that hides its own syntax.
//!
//! Two providers read a [`ViewUpdate`] and publish a [`DecorationSet`]:
//! [`LiveMarkers`] replaces delimiters such as `#`, `**` or `` ` `` unless the
//! selection is on them, and [`FocusOverlay`] dims everything outside the
//! sentence being written. [`Document`] is an in-process editing surface that
//! produces those updates from a rope and a tree-sitter-md parse.

pub mod decoration;
pub mod document;
pub mod focus;
pub mod markers;
pub mod span;
pub mod syntax;
pub mod text;
pub mod view;

// Re-export key types for easier usage
pub use decoration::{Decoration, DecorationKind, DecorationSet, Widget};
pub use document::{Document, DocumentError, Edit, MarkdownTree, Patch};
pub use focus::{FocusOverlay, FocusUnit, SentenceBoundary, boundary_at};
pub use markers::{
    AtomicRanges, CATALOG, Direction, HiddenMarkers, LiveMarkers, MarkerHider, MarkerSpec,
};
pub use span::Span;
pub use syntax::{NodeTree, SyntaxNodeRef, SyntaxTree};
pub use text::TextSource;
pub use view::{Selection, UpdateFlags, ViewUpdate};
