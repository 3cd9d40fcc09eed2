//! Decides, per candidate marker, whether it stays hidden for the current
//! selection. Every path that cannot make a decision resolves to "hide".

use std::ops::ControlFlow;

use crate::markers::catalog::{FilterMode, MarkerLength, MarkerSpec};
use crate::span::Span;
use crate::syntax::SyntaxTree;
use crate::text::TextSource;
use crate::view::Selection;

/// Everything a filter needs to judge one marker.
#[derive(Clone, Copy)]
pub struct MarkerContext<'a> {
    pub text: &'a dyn TextSource,
    pub tree: &'a dyn SyntaxTree,
    pub selection: Selection,
    pub marker: Span,
}

/// True when the marker should be hidden.
pub fn should_hide(ctx: &MarkerContext<'_>, spec: &MarkerSpec) -> bool {
    match spec.filter {
        FilterMode::Line => line_filter(ctx),
        FilterMode::Selection => selection_filter(ctx),
        FilterMode::Paired { marker_length } => paired_filter(ctx, spec, marker_length),
    }
}

/// Shown while the selection's lines touch the marker.
pub fn line_filter(ctx: &MarkerContext<'_>) -> bool {
    let selection_start = ctx.text.line_at(ctx.selection.from).start;
    let selection_end = ctx.text.line_at(ctx.selection.to).end;

    let is_selected = selection_end >= ctx.marker.start && selection_start <= ctx.marker.end;
    !is_selected
}

/// Shown while the cursor sits on the marker (ends included) or a range
/// selection overlaps it.
pub fn selection_filter(ctx: &MarkerContext<'_>) -> bool {
    !ctx.selection.engages(ctx.marker)
}

/// Shown while the selection engages the whole pair the marker delimits,
/// so the opening and closing delimiters appear and disappear together.
pub fn paired_filter(
    ctx: &MarkerContext<'_>,
    spec: &MarkerSpec,
    marker_length: MarkerLength,
) -> bool {
    match find_pair(ctx, spec, marker_length) {
        Some(pair) => !ctx.selection.engages(pair),
        None => {
            log::debug!(
                "{}: no pair for marker at {}..{}, hiding",
                spec.name,
                ctx.marker.start,
                ctx.marker.end
            );
            true
        }
    }
}

/// The nearest pair node, searching forward from the marker, whose opening
/// or closing delimiter window contains the marker's start.
pub fn find_pair(
    ctx: &MarkerContext<'_>,
    spec: &MarkerSpec,
    marker_length: MarkerLength,
) -> Option<Span> {
    let marker_from = ctx.marker.start;
    let mut result = None;

    let _ = ctx
        .tree
        .visit(Span::new(marker_from, ctx.text.len()), &mut |node| {
            if !spec.is_pair(node.name) {
                return ControlFlow::Continue(());
            }
            let pair = node.span;
            let len = marker_length(node.name, &ctx.text.slice(pair));

            let opening = Span::new(pair.start, pair.start.saturating_add(len).min(pair.end));
            let closing = Span::new(pair.end.saturating_sub(len).max(pair.start), pair.end);
            let in_opening = opening.start <= marker_from && marker_from < opening.end;
            let in_closing = closing.start <= marker_from && marker_from < closing.end;

            if in_opening || in_closing {
                result = Some(pair);
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        });

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::catalog::{CODE, EMPHASIS, HEADING};
    use crate::syntax::NodeTree;
    use rstest::rstest;

    const BOLD: &str = "**bold** x";

    fn bold_tree() -> NodeTree {
        NodeTree::new(Span::new(0, 10)).with_child(
            NodeTree::node("paragraph", Span::new(0, 10)).with_child(
                NodeTree::node("strong_emphasis", Span::new(0, 8))
                    .with_child(NodeTree::node("emphasis_delimiter", Span::new(0, 2)))
                    .with_child(NodeTree::node("emphasis_delimiter", Span::new(6, 8))),
            ),
        )
    }

    fn hidden(
        text: &str,
        tree: &NodeTree,
        spec: &MarkerSpec,
        selection: Selection,
        marker: Span,
    ) -> bool {
        let ctx = MarkerContext {
            text: &text,
            tree,
            selection,
            marker,
        };
        should_hide(&ctx, spec)
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(4)]
    #[case(7)]
    #[case(8)]
    fn cursor_inside_pair_shows_both_delimiters(#[case] cursor: usize) {
        let tree = bold_tree();
        let selection = Selection::cursor(cursor);
        assert!(!hidden(BOLD, &tree, &EMPHASIS, selection, Span::new(0, 2)));
        assert!(!hidden(BOLD, &tree, &EMPHASIS, selection, Span::new(6, 8)));
    }

    #[test]
    fn cursor_outside_pair_hides_both_delimiters() {
        let tree = bold_tree();
        let selection = Selection::cursor(9);
        assert!(hidden(BOLD, &tree, &EMPHASIS, selection, Span::new(0, 2)));
        assert!(hidden(BOLD, &tree, &EMPHASIS, selection, Span::new(6, 8)));
    }

    #[test]
    fn range_selection_uses_open_overlap_with_pair() {
        let tree = bold_tree();
        assert!(!hidden(BOLD, &tree, &EMPHASIS, Selection::new(7, 10), Span::new(0, 2)));
        assert!(hidden(BOLD, &tree, &EMPHASIS, Selection::new(8, 10), Span::new(0, 2)));
    }

    #[test]
    fn orphan_marker_is_hidden() {
        let text = "**x";
        let tree = NodeTree::new(Span::new(0, 3))
            .with_child(NodeTree::node("emphasis_delimiter", Span::new(0, 2)));
        assert!(hidden(text, &tree, &EMPHASIS, Selection::cursor(1), Span::new(0, 2)));
    }

    #[test]
    fn pair_lying_before_marker_is_never_matched() {
        // A lone delimiter after a finished pair must not borrow that pair.
        let text = "`a` `";
        let tree = NodeTree::new(Span::new(0, 5))
            .with_child(
                NodeTree::node("code_span", Span::new(0, 3))
                    .with_child(NodeTree::node("code_span_delimiter", Span::new(0, 1)))
                    .with_child(NodeTree::node("code_span_delimiter", Span::new(2, 3))),
            )
            .with_child(NodeTree::node("code_span_delimiter", Span::new(4, 5)));
        assert!(hidden(text, &tree, &CODE, Selection::cursor(2), Span::new(4, 5)));
        assert!(!hidden(text, &tree, &CODE, Selection::cursor(2), Span::new(2, 3)));
    }

    #[test]
    fn nested_pairs_resolve_to_the_innermost_owner() {
        // "**a *b* c**"
        let text = "**a *b* c**";
        let tree = NodeTree::new(Span::new(0, 11)).with_child(
            NodeTree::node("strong_emphasis", Span::new(0, 11))
                .with_child(NodeTree::node("emphasis_delimiter", Span::new(0, 2)))
                .with_child(
                    NodeTree::node("emphasis", Span::new(4, 7))
                        .with_child(NodeTree::node("emphasis_delimiter", Span::new(4, 5)))
                        .with_child(NodeTree::node("emphasis_delimiter", Span::new(6, 7))),
                )
                .with_child(NodeTree::node("emphasis_delimiter", Span::new(9, 11))),
        );
        let ctx = MarkerContext {
            text: &text,
            tree: &tree,
            selection: Selection::cursor(0),
            marker: Span::new(4, 5),
        };
        let MarkerSpec { filter: FilterMode::Paired { marker_length }, .. } = EMPHASIS else {
            unreachable!("emphasis is paired");
        };
        assert_eq!(find_pair(&ctx, &EMPHASIS, marker_length), Some(Span::new(4, 7)));
        // Cursor at 2 is inside the strong pair but outside the inner emphasis.
        assert!(hidden(text, &tree, &EMPHASIS, Selection::cursor(2), Span::new(4, 5)));
        assert!(!hidden(text, &tree, &EMPHASIS, Selection::cursor(2), Span::new(9, 11)));
    }

    #[test]
    fn adjacent_pairs_each_claim_their_own_delimiters() {
        // "**a****b**": two strong pairs with no gap between them.
        let text = "**a****b**";
        let tree = NodeTree::new(Span::new(0, 10))
            .with_child(
                NodeTree::node("strong_emphasis", Span::new(0, 5))
                    .with_child(NodeTree::node("emphasis_delimiter", Span::new(0, 2)))
                    .with_child(NodeTree::node("emphasis_delimiter", Span::new(3, 5))),
            )
            .with_child(
                NodeTree::node("strong_emphasis", Span::new(5, 10))
                    .with_child(NodeTree::node("emphasis_delimiter", Span::new(5, 7)))
                    .with_child(NodeTree::node("emphasis_delimiter", Span::new(8, 10))),
            );
        let cursor = Selection::cursor(9);
        assert!(hidden(text, &tree, &EMPHASIS, cursor, Span::new(0, 2)));
        assert!(hidden(text, &tree, &EMPHASIS, cursor, Span::new(3, 5)));
        assert!(!hidden(text, &tree, &EMPHASIS, cursor, Span::new(5, 7)));
        assert!(!hidden(text, &tree, &EMPHASIS, cursor, Span::new(8, 10)));
    }

    #[test]
    fn line_marker_follows_cursor_line() {
        let text = "# Title\nbody";
        let tree = NodeTree::new(Span::new(0, 12));
        let marker = Span::new(0, 2);
        assert!(!hidden(text, &tree, &HEADING, Selection::cursor(5), marker));
        assert!(!hidden(text, &tree, &HEADING, Selection::cursor(7), marker));
        assert!(hidden(text, &tree, &HEADING, Selection::cursor(10), marker));
    }

    #[test]
    fn line_marker_shown_when_selection_spans_its_line() {
        let text = "a\n# Title\nb";
        let tree = NodeTree::new(Span::new(0, 11));
        let marker = Span::new(2, 4);
        assert!(!hidden(text, &tree, &HEADING, Selection::new(0, 11), marker));
        assert!(hidden(text, &tree, &HEADING, Selection::new(10, 11), marker));
    }

    #[test]
    fn selection_mode_is_inclusive_at_boundary() {
        let text = "abcdefghij";
        let tree = NodeTree::new(Span::new(0, 10));
        let spec = MarkerSpec {
            filter: FilterMode::Selection,
            ..EMPHASIS
        };
        assert!(!hidden(text, &tree, &spec, Selection::cursor(5), Span::new(5, 5)));
        assert!(hidden(text, &tree, &spec, Selection::cursor(6), Span::new(5, 5)));
    }
}
