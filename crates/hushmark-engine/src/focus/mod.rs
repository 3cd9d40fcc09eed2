//! Focus mode: dim the text outside the sentence or paragraph being written.
//!
//! ```text
//! text + selection --boundary_at--> window --decorations--> [0,start) [end,len)
//! ```

pub mod boundary;
pub mod overlay;

pub use boundary::{FocusUnit, SentenceBoundary, boundary_at, focus_window};
pub use overlay::{FocusOverlay, PARAGRAPH_DIMMED, SENTENCE_DIMMED};
