//! The marker catalog: one declarative entry per markdown construct whose
//! delimiters can be hidden. Adding a construct means adding an entry here;
//! the builder and the filter never special-case a construct.

use crate::decoration::Widget;
use crate::span::Span;
use crate::text::TextSource;

/// Computes the delimiter length of a pair from its node name and text.
pub type MarkerLength = fn(node_name: &str, node_text: &str) -> usize;

/// Post-processes a candidate span before it becomes a decoration.
pub type AdjustSpan = fn(text: &dyn TextSource, span: Span) -> Span;

/// How the visibility of a marker follows the selection.
#[derive(Debug, Clone, Copy)]
pub enum FilterMode {
    /// Shown while the selection touches the marker's line.
    Line,
    /// Shown while the selection touches the marker itself.
    Selection,
    /// Shown while the selection touches the whole pair the marker delimits.
    Paired { marker_length: MarkerLength },
}

#[derive(Debug, Clone, Copy)]
pub struct MarkerSpec {
    /// Catalog key, used by configuration to disable an entry.
    pub name: &'static str,
    /// Node names that are the marker itself.
    pub mark_names: &'static [&'static str],
    /// Node names of the construct that carries the marker; for paired
    /// markers these are the pair nodes.
    pub node_names: &'static [&'static str],
    pub widget: Widget,
    pub adjust_span: Option<AdjustSpan>,
    pub filter: FilterMode,
}

impl MarkerSpec {
    pub fn is_mark(&self, node_name: &str) -> bool {
        self.mark_names.contains(&node_name)
    }

    pub fn is_pair(&self, node_name: &str) -> bool {
        self.node_names.contains(&node_name)
    }
}

/// Extends a span over one following space.
pub fn swallow_trailing_space(text: &dyn TextSource, span: Span) -> Span {
    let next = Span::new(span.end, span.end + 1);
    if text.next_char_boundary(span.end) == Some(next.end) && text.slice(next) == " " {
        Span::new(span.start, span.end + 1)
    } else {
        span
    }
}

fn emphasis_length(node_name: &str, node_text: &str) -> usize {
    if node_name == "strong_emphasis"
        && (node_text.starts_with("**") || node_text.starts_with("__"))
    {
        2
    } else {
        1
    }
}

fn strikethrough_length(_node_name: &str, _node_text: &str) -> usize {
    2
}

fn code_length(node_name: &str, _node_text: &str) -> usize {
    if node_name == "fenced_code_block" { 3 } else { 1 }
}

pub const HEADING: MarkerSpec = MarkerSpec {
    name: "heading",
    mark_names: &[
        "atx_h1_marker",
        "atx_h2_marker",
        "atx_h3_marker",
        "atx_h4_marker",
        "atx_h5_marker",
        "atx_h6_marker",
    ],
    node_names: &["atx_heading"],
    widget: Widget::Text(""),
    adjust_span: Some(swallow_trailing_space),
    filter: FilterMode::Line,
};

pub const QUOTE: MarkerSpec = MarkerSpec {
    name: "quote",
    mark_names: &["block_quote_marker", "block_quote_continuation"],
    node_names: &["block_quote"],
    widget: Widget::QuoteBar,
    adjust_span: None,
    filter: FilterMode::Line,
};

pub const EMPHASIS: MarkerSpec = MarkerSpec {
    name: "emphasis",
    mark_names: &["emphasis_delimiter"],
    node_names: &["strong_emphasis", "emphasis"],
    widget: Widget::Text(""),
    adjust_span: None,
    filter: FilterMode::Paired {
        marker_length: emphasis_length,
    },
};

pub const STRIKETHROUGH: MarkerSpec = MarkerSpec {
    name: "strikethrough",
    mark_names: &["strikethrough_delimiter"],
    node_names: &["strikethrough"],
    widget: Widget::Text(""),
    adjust_span: None,
    filter: FilterMode::Paired {
        marker_length: strikethrough_length,
    },
};

pub const CODE: MarkerSpec = MarkerSpec {
    name: "code",
    mark_names: &["code_span_delimiter", "fenced_code_block_delimiter"],
    node_names: &["code_span", "fenced_code_block"],
    widget: Widget::Text(""),
    adjust_span: None,
    filter: FilterMode::Paired {
        marker_length: code_length,
    },
};

pub const HORIZONTAL_RULE: MarkerSpec = MarkerSpec {
    name: "horizontal_rule",
    mark_names: &["thematic_break"],
    node_names: &["thematic_break"],
    widget: Widget::Separator,
    adjust_span: None,
    filter: FilterMode::Line,
};

/// Every marker the editor hides, in registration order.
pub const CATALOG: &[MarkerSpec] = &[
    HEADING,
    QUOTE,
    EMPHASIS,
    STRIKETHROUGH,
    CODE,
    HORIZONTAL_RULE,
];

/// Looks a catalog entry up by name.
pub fn by_name(name: &str) -> Option<&'static MarkerSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}
