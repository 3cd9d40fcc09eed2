//! tree-sitter-md behind the [`SyntaxTree`] seam.
//!
//! tree-sitter-md parses in two passes: the block grammar yields the document
//! structure with opaque `inline` leaves, and each `inline` leaf is parsed
//! again with the inline grammar. The adapter stitches both into one walk.

use std::ops::ControlFlow;

use tree_sitter::{Node, Parser, Tree};
use xi_rope::Rope;

use crate::span::Span;
use crate::syntax::{SyntaxNodeRef, SyntaxTree};
use crate::text::TextSource;

const INLINE: &str = "inline";
const BLOCK_CONTINUATION: &str = "block_continuation";
const BLOCK_QUOTE: &str = "block_quote";
/// A `block_continuation` that repeats a quote's `>` on a continued line.
const QUOTE_CONTINUATION: &str = "block_quote_continuation";

/// The inline parse of one block `inline` node.
#[derive(Debug, Clone)]
pub(crate) struct InlineTree {
    span: Span,
    tree: Tree,
}

/// A parsed document: block tree, inline trees and the text they cover.
#[derive(Debug, Clone, Default)]
pub struct MarkdownTree {
    text: Rope,
    block: Option<Tree>,
    inline: Vec<InlineTree>,
}

impl MarkdownTree {
    /// Parses `text`, reusing `old` (already edited) for the block pass.
    pub(crate) fn parse(
        block_parser: &mut Parser,
        inline_parser: &mut Parser,
        text: Rope,
        old: Option<&Tree>,
    ) -> Self {
        let source = text.to_string();
        let block = block_parser.parse(&source, old);
        let inline = match &block {
            Some(block) => parse_inline(inline_parser, block, &source),
            None => {
                log::warn!("block parse returned no tree");
                Vec::new()
            }
        };
        Self {
            text,
            block,
            inline,
        }
    }

    pub fn block_tree(&self) -> Option<&Tree> {
        self.block.as_ref()
    }

    pub(crate) fn take_block(&mut self) -> Option<Tree> {
        self.block.take()
    }

    /// Number of inline trees; one per non-empty `inline` block node.
    pub fn inline_count(&self) -> usize {
        self.inline.len()
    }

    /// Block spans lose one trailing line terminator, so a block ends where
    /// its last visible character does.
    fn block_span(&self, node: Node<'_>) -> Span {
        let mut span = Span::new(node.start_byte(), node.end_byte());
        for terminator in ["\n", "\r"] {
            let last = Span::new(span.end.saturating_sub(1), span.end);
            if !span.is_empty() && TextSource::slice(&self.text, last) == terminator {
                span.end -= 1;
            }
        }
        span
    }

    fn inline_at(&self, start: usize) -> Option<&InlineTree> {
        self.inline
            .binary_search_by_key(&start, |inline| inline.span.start)
            .ok()
            .map(|idx| &self.inline[idx])
    }

    fn visit_block(
        &self,
        node: Node<'_>,
        in_quote: bool,
        range: Span,
        visitor: &mut dyn FnMut(SyntaxNodeRef<'_>) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let span = self.block_span(node);
        if !range.intersects(span) {
            return ControlFlow::Continue(());
        }
        // Continued quote lines carry their `>` in a `block_continuation`.
        let name = match node.kind() {
            BLOCK_CONTINUATION
                if in_quote && TextSource::slice(&self.text, span).contains('>') =>
            {
                QUOTE_CONTINUATION
            }
            kind => kind,
        };
        visitor(SyntaxNodeRef { name, span })?;

        if node.kind() == INLINE
            && let Some(inline) = self.inline_at(node.start_byte())
        {
            let root = inline.tree.root_node();
            let mut cursor = root.walk();
            for child in root.children(&mut cursor) {
                visit_inline(child, root.kind(), range, visitor)?;
            }
        }

        let in_quote = in_quote || node.kind() == BLOCK_QUOTE;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit_block(child, in_quote, range, visitor)?;
        }
        ControlFlow::Continue(())
    }
}

fn visit_inline(
    node: Node<'_>,
    parent: &str,
    range: Span,
    visitor: &mut dyn FnMut(SyntaxNodeRef<'_>) -> ControlFlow<()>,
) -> ControlFlow<()> {
    let span = Span::new(node.start_byte(), node.end_byte());
    if !range.intersects(span) {
        return ControlFlow::Continue(());
    }
    // `~~` is aliased to `emphasis_delimiter` by the grammar.
    let name = match (node.kind(), parent) {
        ("emphasis_delimiter", "strikethrough") => "strikethrough_delimiter",
        (kind, _) => kind,
    };
    visitor(SyntaxNodeRef { name, span })?;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_inline(child, node.kind(), range, visitor)?;
    }
    ControlFlow::Continue(())
}

impl SyntaxTree for MarkdownTree {
    fn visit(
        &self,
        range: Span,
        visitor: &mut dyn FnMut(SyntaxNodeRef<'_>) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        match &self.block {
            Some(block) => self.visit_block(block.root_node(), false, range, visitor),
            None => ControlFlow::Continue(()),
        }
    }
}

/// Source ranges of an `inline` node minus its `block_continuation`
/// children (the `> ` prefixes of continued quote lines, for instance).
fn included_ranges(node: Node<'_>) -> Vec<tree_sitter::Range> {
    let mut ranges = Vec::new();
    let mut current = node.range();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != BLOCK_CONTINUATION {
            continue;
        }
        let mut piece = current;
        piece.end_byte = child.start_byte();
        piece.end_point = child.start_position();
        if piece.start_byte < piece.end_byte {
            ranges.push(piece);
        }
        current.start_byte = child.end_byte();
        current.start_point = child.end_position();
    }
    if current.start_byte < current.end_byte {
        ranges.push(current);
    }
    ranges
}

fn collect_inline_nodes<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if node.kind() == INLINE {
        out.push(node);
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_inline_nodes(child, out);
    }
}

fn parse_inline(parser: &mut Parser, block: &Tree, source: &str) -> Vec<InlineTree> {
    let mut nodes = Vec::new();
    collect_inline_nodes(block.root_node(), &mut nodes);

    let mut trees = Vec::with_capacity(nodes.len());
    for node in nodes {
        let ranges = included_ranges(node);
        if ranges.is_empty() {
            continue;
        }
        if let Err(e) = parser.set_included_ranges(&ranges) {
            log::warn!("skipping inline node at {}: {e}", node.start_byte());
            continue;
        }
        match parser.parse(source, None) {
            Some(tree) => trees.push(InlineTree {
                span: Span::new(node.start_byte(), node.end_byte()),
                tree,
            }),
            None => log::warn!("inline parse at {} returned no tree", node.start_byte()),
        }
    }
    trees.sort_by_key(|inline| inline.span.start);
    log::trace!("parsed {} inline trees", trees.len());
    trees
}
