//! Composes the builder and the filter into render-ready decoration sets.

use std::sync::Arc;

use crate::decoration::DecorationSet;
use crate::markers::atomic::AtomicRanges;
use crate::markers::builder::build;
use crate::markers::catalog::{CATALOG, MarkerSpec};
use crate::markers::filter::{MarkerContext, should_hide};
use crate::span::Span;
use crate::view::{Selection, ViewUpdate};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    revision: u64,
    selection: Selection,
    visible_ranges: Vec<Span>,
}

impl CacheKey {
    fn of(update: &ViewUpdate<'_>) -> Self {
        Self {
            revision: update.revision,
            selection: update.selection,
            visible_ranges: update.visible_ranges.to_vec(),
        }
    }
}

/// Hides one catalog entry's markers wherever the selection is elsewhere.
///
/// Each update rebuilds the candidate set from the syntax tree and keeps the
/// candidates the filter hides. The published set is shared through an
/// `Arc` and replaced, never mutated; an update with the same revision,
/// selection and viewport returns the previous set.
#[derive(Debug)]
pub struct MarkerHider {
    spec: MarkerSpec,
    cache: Option<(CacheKey, Arc<DecorationSet>)>,
}

impl MarkerHider {
    pub fn new(spec: MarkerSpec) -> Self {
        Self { spec, cache: None }
    }

    pub fn spec(&self) -> &MarkerSpec {
        &self.spec
    }

    /// The most recently published set; empty before the first update.
    pub fn decorations(&self) -> Arc<DecorationSet> {
        self.cache
            .as_ref()
            .map(|(_, set)| Arc::clone(set))
            .unwrap_or_default()
    }

    pub fn update(&mut self, update: &ViewUpdate<'_>) -> Arc<DecorationSet> {
        let key = CacheKey::of(update);
        if let Some((cached_key, set)) = &self.cache
            && *cached_key == key
        {
            log::debug!("{}: revision {} unchanged, reusing", self.spec.name, key.revision);
            return Arc::clone(set);
        }

        let set = Arc::new(compute(&self.spec, update));
        log::debug!(
            "{}: revision {} hid {} markers",
            self.spec.name,
            key.revision,
            set.len()
        );
        self.cache = Some((key, Arc::clone(&set)));
        set
    }
}

/// The hidden markers of `spec` for one view state.
pub fn compute(spec: &MarkerSpec, update: &ViewUpdate<'_>) -> DecorationSet {
    let candidates = build(update.text, update.tree, spec, update.visible_ranges);
    candidates.filter(|decoration| {
        let ctx = MarkerContext {
            text: update.text,
            tree: update.tree,
            selection: update.selection,
            marker: decoration.span,
        };
        should_hide(&ctx, spec)
    })
}

/// The published output of every live hider.
#[derive(Debug, Clone, Default)]
pub struct HiddenMarkers {
    pub sets: Vec<(&'static str, Arc<DecorationSet>)>,
    pub atomic: AtomicRanges,
}

impl HiddenMarkers {
    pub fn get(&self, name: &str) -> Option<&DecorationSet> {
        self.sets
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, set)| set.as_ref())
    }

    /// Every hidden decoration, ordered by start offset.
    pub fn merged(&self) -> DecorationSet {
        DecorationSet::new(
            self.sets
                .iter()
                .flat_map(|(_, set)| set.iter().copied())
                .collect(),
        )
    }
}

/// One hider per enabled catalog entry, updated together.
#[derive(Debug)]
pub struct LiveMarkers {
    hiders: Vec<MarkerHider>,
}

impl Default for LiveMarkers {
    fn default() -> Self {
        Self::new(CATALOG.iter().copied())
    }
}

impl LiveMarkers {
    pub fn new(specs: impl IntoIterator<Item = MarkerSpec>) -> Self {
        Self {
            hiders: specs.into_iter().map(MarkerHider::new).collect(),
        }
    }

    /// Every catalog entry except those named in `disabled`.
    pub fn without(disabled: &[impl AsRef<str>]) -> Self {
        Self::new(
            CATALOG
                .iter()
                .filter(|spec| !disabled.iter().any(|d| d.as_ref() == spec.name))
                .copied(),
        )
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.hiders.iter().map(|h| h.spec().name)
    }

    pub fn update(&mut self, update: &ViewUpdate<'_>) -> HiddenMarkers {
        let sets: Vec<_> = self
            .hiders
            .iter_mut()
            .map(|hider| (hider.spec().name, hider.update(update)))
            .collect();
        let atomic = AtomicRanges::new(sets.iter().flat_map(|(_, set)| set.spans()));
        HiddenMarkers { sets, atomic }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::atomic::Direction;
    use crate::markers::catalog::{EMPHASIS, HEADING};
    use crate::syntax::NodeTree;
    use crate::view::UpdateFlags;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "# Title\n\nSome **bold** text";

    fn tree() -> NodeTree {
        NodeTree::new(Span::new(0, 27))
            .with_child(
                NodeTree::node("atx_heading", Span::new(0, 7))
                    .with_child(NodeTree::node("atx_h1_marker", Span::new(0, 1))),
            )
            .with_child(
                NodeTree::node("paragraph", Span::new(9, 27)).with_child(
                    NodeTree::node("strong_emphasis", Span::new(14, 22))
                        .with_child(NodeTree::node("emphasis_delimiter", Span::new(14, 16)))
                        .with_child(NodeTree::node("emphasis_delimiter", Span::new(20, 22))),
                ),
            )
    }

    fn update<'a>(text: &'a &'a str, tree: &'a NodeTree, cursor: usize) -> ViewUpdate<'a> {
        ViewUpdate {
            text,
            tree,
            selection: Selection::cursor(cursor),
            visible_ranges: &[],
            revision: 1,
            flags: UpdateFlags::ALL,
        }
    }

    fn spans(set: &DecorationSet) -> Vec<(usize, usize)> {
        set.spans().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn cursor_in_heading_reveals_heading_only() {
        let tree = tree();
        let mut hider = MarkerHider::new(HEADING);
        assert!(hider.update(&update(&TEXT, &tree, 3)).is_empty());

        let mut hider = MarkerHider::new(EMPHASIS);
        assert_eq!(spans(&hider.update(&update(&TEXT, &tree, 3))), vec![(14, 16), (20, 22)]);
    }

    #[test]
    fn cursor_in_bold_reveals_both_delimiters() {
        let tree = tree();
        let mut markers = LiveMarkers::default();
        let hidden = markers.update(&update(&TEXT, &tree, 17));
        assert_eq!(spans(hidden.get("emphasis").unwrap()), Vec::<(usize, usize)>::new());
        assert_eq!(spans(hidden.get("heading").unwrap()), vec![(0, 2)]);
        assert_eq!(hidden.atomic.spans(), &[Span::new(0, 2)]);
    }

    #[test]
    fn recompute_with_unchanged_update_is_identical() {
        let tree = tree();
        let mut hider = MarkerHider::new(EMPHASIS);
        let first = hider.update(&update(&TEXT, &tree, 0));
        let second = hider.update(&update(&TEXT, &tree, 0));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(compute(&EMPHASIS, &update(&TEXT, &tree, 0)), *first);
    }

    #[test]
    fn new_selection_publishes_a_new_set() {
        let tree = tree();
        let mut hider = MarkerHider::new(EMPHASIS);
        let before = hider.update(&update(&TEXT, &tree, 0));
        let after = hider.update(&update(&TEXT, &tree, 15));
        assert_eq!(before.len(), 2);
        assert!(after.is_empty());
        assert_eq!(before.len(), 2, "published set must not change after publication");
    }

    #[test]
    fn disabled_entries_are_not_registered() {
        let markers = LiveMarkers::without(&["horizontal_rule", "quote"]);
        let names: Vec<_> = markers.names().collect();
        assert_eq!(names, vec!["heading", "emphasis", "strikethrough", "code"]);
    }

    #[test]
    fn caret_skips_hidden_delimiters() {
        let tree = tree();
        let mut markers = LiveMarkers::default();
        let hidden = markers.update(&update(&TEXT, &tree, 0));
        // Interior of the hidden closing `**` resolves to an edge.
        let landed = hidden.atomic.snap(21, Direction::Forward);
        assert_eq!(landed, 22);
        assert_eq!(hidden.atomic.move_caret(&TEXT, 14, Direction::Forward), 16);
        assert_eq!(spans(&hidden.merged()), vec![(14, 16), (20, 22)]);
    }
}
