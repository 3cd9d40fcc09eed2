// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_note(sections: usize) -> String {
    let base = concat!(
        "# Heading\n\n",
        "A sentence with **bold** and *italic* text. ",
        "Another one with `code` and ~~struck~~ words!\n\n",
        "> A quoted line\n> continues here.\n\n",
        "```rust\nfn main() {}\n```\n\n",
        "---\n\n",
    );
    base.repeat(sections)
}

/// Byte span of lines `first..first + count`, like a scrolled viewport.
#[allow(dead_code)]
pub fn line_window(text: &str, first: usize, count: usize) -> (usize, usize) {
    let starts: Vec<usize> = std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect();
    let start = starts.get(first).copied().unwrap_or(text.len());
    let end = starts.get(first + count).copied().unwrap_or(text.len());
    (start, end)
}
