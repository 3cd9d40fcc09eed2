//! The syntax-tree seam between the engine and whichever parser produced the tree.
//!
//! The engine only ever reads nodes as `(name, span)` pairs during a
//! depth-first walk. [`NodeTree`] is a plain in-memory implementation;
//! [`crate::document::MarkdownTree`] adapts tree-sitter-md.

use std::ops::ControlFlow;

use crate::span::Span;

/// A node as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxNodeRef<'a> {
    pub name: &'a str,
    pub span: Span,
}

/// Read-only, depth-first traversable syntax tree.
pub trait SyntaxTree {
    /// Visits, in pre-order, every node whose span touches `range`
    /// (`node.start <= range.end && node.end >= range.start`).
    ///
    /// Returns `Break` as soon as the visitor does.
    fn visit(
        &self,
        range: Span,
        visitor: &mut dyn FnMut(SyntaxNodeRef<'_>) -> ControlFlow<()>,
    ) -> ControlFlow<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OwnedNode {
    name: String,
    span: Span,
    children: Vec<OwnedNode>,
}

/// An in-memory syntax tree, built by nesting nodes explicitly.
///
/// ```
/// use hushmark_engine::{NodeTree, Span};
///
/// let tree = NodeTree::new(Span::new(0, 8)).with_child(
///     NodeTree::node("strong_emphasis", Span::new(0, 8))
///         .with_child(NodeTree::node("emphasis_delimiter", Span::new(0, 2)))
///         .with_child(NodeTree::node("emphasis_delimiter", Span::new(6, 8))),
/// );
/// assert_eq!(
///     tree.names(),
///     vec!["document", "strong_emphasis", "emphasis_delimiter", "emphasis_delimiter"]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTree {
    root: OwnedNode,
}

impl NodeTree {
    /// A tree whose root is a `document` node spanning `span`.
    pub fn new(span: Span) -> Self {
        Self::node("document", span)
    }

    pub fn node(name: impl Into<String>, span: Span) -> Self {
        Self {
            root: OwnedNode {
                name: name.into(),
                span,
                children: Vec::new(),
            },
        }
    }

    /// Appends `child` (and its subtree) as the last child of the root.
    #[must_use]
    pub fn with_child(mut self, child: NodeTree) -> Self {
        self.root.children.push(child.root);
        self
    }

    /// All node names in pre-order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_names(&self.root, &mut names);
        names
    }
}

fn collect_names<'a>(node: &'a OwnedNode, out: &mut Vec<&'a str>) {
    out.push(&node.name);
    for child in &node.children {
        collect_names(child, out);
    }
}

fn visit_owned(
    node: &OwnedNode,
    range: Span,
    visitor: &mut dyn FnMut(SyntaxNodeRef<'_>) -> ControlFlow<()>,
) -> ControlFlow<()> {
    if !node.span.intersects(range) {
        return ControlFlow::Continue(());
    }
    visitor(SyntaxNodeRef {
        name: &node.name,
        span: node.span,
    })?;
    for child in &node.children {
        visit_owned(child, range, visitor)?;
    }
    ControlFlow::Continue(())
}

impl SyntaxTree for NodeTree {
    fn visit(
        &self,
        range: Span,
        visitor: &mut dyn FnMut(SyntaxNodeRef<'_>) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        visit_owned(&self.root, range, visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> NodeTree {
        NodeTree::new(Span::new(0, 20))
            .with_child(
                NodeTree::node("paragraph", Span::new(0, 9))
                    .with_child(NodeTree::node("emphasis", Span::new(2, 5))),
            )
            .with_child(NodeTree::node("paragraph", Span::new(11, 20)))
    }

    #[test]
    fn visit_walks_pre_order() {
        let mut seen = Vec::new();
        let _ = sample().visit(Span::new(0, 20), &mut |node| {
            seen.push((node.name.to_string(), node.span.start));
            ControlFlow::Continue(())
        });
        assert_eq!(
            seen,
            vec![
                ("document".to_string(), 0),
                ("paragraph".to_string(), 0),
                ("emphasis".to_string(), 2),
                ("paragraph".to_string(), 11),
            ]
        );
    }

    #[test]
    fn visit_skips_subtrees_outside_range() {
        let mut seen = Vec::new();
        let _ = sample().visit(Span::new(12, 20), &mut |node| {
            seen.push(node.name.to_string());
            ControlFlow::Continue(())
        });
        assert_eq!(seen, vec!["document", "paragraph"]);
    }

    #[test]
    fn visit_stops_on_break() {
        let mut count = 0;
        let flow = sample().visit(Span::new(0, 20), &mut |node| {
            count += 1;
            if node.name == "emphasis" {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(count, 3);
    }
}
