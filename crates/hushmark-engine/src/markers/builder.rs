//! Turns syntax-tree marker nodes into candidate `replace` decorations.

use std::ops::ControlFlow;

use crate::decoration::{Decoration, DecorationSet};
use crate::markers::catalog::MarkerSpec;
use crate::span::Span;
use crate::syntax::SyntaxTree;
use crate::text::TextSource;

/// Collects one candidate decoration per marker node of `spec`.
///
/// Only nodes touching `visible_ranges` are visited; an empty slice means the
/// whole document. Zero-length nodes are skipped, and a candidate that would
/// overlap an earlier accepted one is dropped (first match wins).
pub fn build(
    text: &dyn TextSource,
    tree: &dyn SyntaxTree,
    spec: &MarkerSpec,
    visible_ranges: &[Span],
) -> DecorationSet {
    let len = text.len();
    let whole = [Span::new(0, len)];
    let ranges = if visible_ranges.is_empty() {
        &whole[..]
    } else {
        visible_ranges
    };

    let mut decorations: Vec<Decoration> = Vec::new();
    let mut accepted_end = 0usize;

    for range in ranges {
        let _ = tree.visit(range.clamp_to(len), &mut |node| {
            if !spec.is_mark(node.name) || node.span.is_empty() {
                return ControlFlow::Continue(());
            }
            let raw = node.span.clamp_to(len);
            let span = match spec.adjust_span {
                Some(adjust) => bound_extension(tree, raw, adjust(text, raw).clamp_to(len)),
                None => raw,
            };
            if span.is_empty() {
                return ControlFlow::Continue(());
            }
            if !decorations.is_empty() && span.start < accepted_end {
                log::trace!(
                    "{}: dropping overlapping {} at {}..{}",
                    spec.name,
                    node.name,
                    span.start,
                    span.end
                );
                return ControlFlow::Continue(());
            }
            log::trace!(
                "{}: found {} at {}..{} {:?}",
                spec.name,
                node.name,
                span.start,
                span.end,
                text.slice(span)
            );
            accepted_end = span.end;
            decorations.push(Decoration::replace(span, spec.widget));
            ControlFlow::Continue(())
        });
    }

    DecorationSet::new(decorations)
}

/// Cuts an adjusted span back to where the next node starts, so growing a
/// marker never eats into what follows it.
fn bound_extension(tree: &dyn SyntaxTree, raw: Span, adjusted: Span) -> Span {
    if adjusted.end <= raw.end {
        return adjusted;
    }
    let mut end = adjusted.end;
    let _ = tree.visit(Span::new(raw.end, adjusted.end), &mut |node| {
        if node.span.is_empty() || node.span.start < raw.end || node.span.start >= end {
            return ControlFlow::Continue(());
        }
        end = node.span.start;
        ControlFlow::Break(())
    });
    Span::new(adjusted.start, end)
}
