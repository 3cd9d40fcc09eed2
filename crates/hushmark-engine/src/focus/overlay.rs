use std::sync::Arc;

use crate::decoration::{Decoration, DecorationSet};
use crate::focus::boundary::{FocusUnit, focus_window};
use crate::span::Span;
use crate::view::{Selection, ViewUpdate};

pub const SENTENCE_DIMMED: &str = "hm-sentence-dimmed";
pub const PARAGRAPH_DIMMED: &str = "hm-paragraph-dimmed";

/// Dims everything outside the sentence (or paragraph) holding the caret.
///
/// Viewport changes never move the window, so only document and selection
/// changes trigger a recompute.
#[derive(Debug)]
pub struct FocusOverlay {
    unit: FocusUnit,
    class: &'static str,
    cache: Option<((u64, Selection), Arc<DecorationSet>)>,
}

impl FocusOverlay {
    pub fn new(unit: FocusUnit, class: &'static str) -> Self {
        Self {
            unit,
            class,
            cache: None,
        }
    }

    pub fn sentence() -> Self {
        Self::new(FocusUnit::Sentence, SENTENCE_DIMMED)
    }

    pub fn paragraph() -> Self {
        Self::new(FocusUnit::Paragraph, PARAGRAPH_DIMMED)
    }

    pub fn unit(&self) -> FocusUnit {
        self.unit
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    pub fn update(&mut self, update: &ViewUpdate<'_>) -> Arc<DecorationSet> {
        let key = (update.revision, update.selection);
        if let Some((cached_key, set)) = &self.cache {
            let relevant = update.flags.doc_changed || update.flags.selection_set;
            if !relevant || *cached_key == key {
                return Arc::clone(set);
            }
        }

        let text = update.text.slice(Span::new(0, update.text.len()));
        let set = Arc::new(decorations(&text, update.selection, self.unit, self.class));
        log::debug!(
            "focus: revision {} selection {}..{} dims {} ranges",
            update.revision,
            update.selection.from,
            update.selection.to,
            set.len()
        );
        self.cache = Some((key, Arc::clone(&set)));
        set
    }
}

/// `Mark` decorations covering `[0, start)` and `[end, len)` of the focus
/// window; empty pieces are omitted.
pub fn decorations(
    text: &str,
    selection: Selection,
    unit: FocusUnit,
    class: &'static str,
) -> DecorationSet {
    let window = focus_window(text, selection, unit);
    let mut dimmed = Vec::with_capacity(2);
    if window.start > 0 {
        dimmed.push(Decoration::mark(Span::new(0, window.start), class));
    }
    if window.end < text.len() {
        dimmed.push(Decoration::mark(Span::new(window.end, text.len()), class));
    }
    DecorationSet::new(dimmed)
}
