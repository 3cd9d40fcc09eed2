//! Marker hiding and focus dimming against real tree-sitter-md parses.

use hushmark_engine::decoration::{DecorationKind, Widget};
use hushmark_engine::{
    Direction, Document, Edit, FocusOverlay, HiddenMarkers, LiveMarkers, Selection, Span,
    UpdateFlags,
};
use pretty_assertions::assert_eq;

const NOTE: &str = "# Title\n\nSome **bold** text\n";

fn doc(text: &str, cursor: usize) -> Document {
    let mut doc = Document::from_bytes(text.as_bytes()).expect("valid markdown");
    doc.set_selection(Selection::cursor(cursor));
    doc
}

fn hide(doc: &Document) -> HiddenMarkers {
    LiveMarkers::default().update(&doc.view_update(&[], UpdateFlags::ALL))
}

fn spans(hidden: &HiddenMarkers, name: &str) -> Vec<Span> {
    hidden
        .get(name)
        .map(|set| set.spans().collect())
        .unwrap_or_default()
}

#[test]
fn markers_away_from_the_cursor_are_hidden() {
    let hidden = hide(&doc(NOTE, 26));
    assert_eq!(spans(&hidden, "heading"), vec![Span::new(0, 2)]);
    assert_eq!(
        hidden.atomic.spans(),
        &[Span::new(0, 2), Span::new(14, 16), Span::new(20, 22)]
    );
}

#[test]
fn heading_marker_reappears_on_its_line() {
    let hidden = hide(&doc(NOTE, 3));
    assert!(spans(&hidden, "heading").is_empty());
    assert!(!spans(&hidden, "emphasis").is_empty());
}

#[test]
fn bold_delimiters_reappear_together() {
    for cursor in [14, 17, 22] {
        let hidden = hide(&doc(NOTE, cursor));
        assert!(spans(&hidden, "emphasis").is_empty(), "cursor {cursor}");
        assert_eq!(spans(&hidden, "heading"), vec![Span::new(0, 2)]);
    }
}

#[test]
fn fence_delimiters_follow_the_block() {
    let text = "```\ncode\n```\n\nafter\n";
    let hidden = hide(&doc(text, 16));
    let code = spans(&hidden, "code");
    assert!(code.contains(&Span::new(0, 3)), "{code:?}");
    assert!(code.contains(&Span::new(9, 12)), "{code:?}");

    let hidden = hide(&doc(text, 5));
    assert!(spans(&hidden, "code").is_empty());
}

#[test]
fn quote_marker_becomes_a_bar() {
    let text = "> quoted\n\nplain\n";
    let hidden = hide(&doc(text, 12));
    let quote = hidden.get("quote").expect("quote hider registered");
    let first = quote.iter().next().expect("quote marker hidden");
    assert_eq!(first.span.start, 0);
    assert_eq!(first.kind, DecorationKind::Replace(Widget::QuoteBar));

    let hidden = hide(&doc(text, 4));
    assert!(spans(&hidden, "quote").is_empty());
}

#[test]
fn thematic_break_becomes_a_separator() {
    let text = "above\n\n---\n\nbelow\n";
    let hidden = hide(&doc(text, 2));
    let rule = hidden.get("horizontal_rule").expect("rule hider registered");
    let kinds: Vec<_> = rule.iter().map(|d| (d.span, d.kind)).collect();
    assert_eq!(
        kinds,
        vec![(Span::new(7, 10), DecorationKind::Replace(Widget::Separator))]
    );
}

#[test]
fn every_quote_line_hides_its_marker() {
    let text = "> one\n> two\n\nplain\n";
    let hidden = hide(&doc(text, 16));
    assert_eq!(spans(&hidden, "quote"), vec![Span::new(0, 2), Span::new(6, 8)]);
    assert_eq!(
        hidden.atomic.move_caret(&doc(text, 6), 6, Direction::Forward),
        8,
        "caret steps over the hidden `> `"
    );

    // Line mode: only the marker on the cursor's own line shows.
    let hidden = hide(&doc(text, 9));
    assert_eq!(spans(&hidden, "quote"), vec![Span::new(0, 2)]);
    let hidden = hide(&doc(text, 3));
    assert_eq!(spans(&hidden, "quote"), vec![Span::new(6, 8)]);
}

#[test]
fn strikethrough_delimiters_are_not_emphasis() {
    let hidden = hide(&doc("~~gone~~ kept\n", 12));
    assert!(spans(&hidden, "emphasis").is_empty());
}

#[test]
fn strikethrough_delimiters_hide_and_show_together() {
    let text = "~~gone~~ kept\n";
    let hidden = hide(&doc(text, 12));
    assert_eq!(
        spans(&hidden, "strikethrough"),
        vec![Span::new(0, 1), Span::new(1, 2), Span::new(6, 7), Span::new(7, 8)]
    );
    assert_eq!(hidden.atomic.spans(), &[Span::new(0, 2), Span::new(6, 8)]);

    let hidden = hide(&doc(text, 3));
    assert!(spans(&hidden, "strikethrough").is_empty());
}

#[test]
fn viewport_limits_hidden_markers() {
    let text = "# One\n\nbody\n\n## Two\n";
    let doc = doc(text, 8);
    let visible = [Span::new(13, 20)];
    let hidden = LiveMarkers::default().update(&doc.view_update(&visible, UpdateFlags::ALL));
    assert_eq!(spans(&hidden, "heading"), vec![Span::new(13, 16)]);
}

#[test]
fn editing_moves_markers_with_the_text() {
    let mut doc = doc(NOTE, 26);
    let mut markers = LiveMarkers::default();
    let before = markers.update(&doc.view_update(&[], UpdateFlags::ALL));
    assert_eq!(
        before.atomic.move_caret(&doc, 14, Direction::Forward),
        16,
        "caret steps over hidden `**`"
    );

    doc.apply(Edit::Insert {
        at: 9,
        text: "Now ".to_string(),
    });
    let flags = UpdateFlags {
        doc_changed: true,
        ..UpdateFlags::default()
    };
    let after = markers.update(&doc.view_update(&[], flags));
    assert_eq!(
        after.atomic.spans(),
        &[Span::new(0, 2), Span::new(18, 20), Span::new(24, 26)]
    );
    assert_eq!(
        after.atomic.deletion(&doc, 26, Direction::Backward),
        Span::new(24, 26)
    );
}

#[test]
fn focus_dims_other_sentences() {
    let text = "First one. Second one.\n";
    let doc = doc(text, 15);
    let mut overlay = FocusOverlay::sentence();
    let dimmed = overlay.update(&doc.view_update(&[], UpdateFlags::ALL));
    let spans: Vec<_> = dimmed.spans().collect();
    assert_eq!(spans, vec![Span::new(0, 11)]);
    assert!(dimmed.iter().all(|d| matches!(d.kind, DecorationKind::Mark { .. })));
}
