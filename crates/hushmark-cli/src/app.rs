use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hushmark_config::{Config, FocusUnit as ConfiguredUnit};
use hushmark_engine::text::lines_with_spans;
use hushmark_engine::{
    AtomicRanges, DecorationSet, Direction, Document, Edit, FocusOverlay, HiddenMarkers,
    LiveMarkers, Selection, Span, TextSource, UpdateFlags,
};

use crate::render::{self, ProjectedLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

pub struct App {
    pub path: PathBuf,
    pub doc: Document,
    markers: Option<LiveMarkers>,
    focus: FocusOverlay,
    pub focus_on: bool,
    hidden: HiddenMarkers,
    dimmed: Arc<DecorationSet>,
    /// First displayed line.
    pub scroll: usize,
    pub dirty: bool,
    pub status: String,
    last_seen: Option<(u64, Selection, Span)>,
}

impl App {
    pub fn new(path: PathBuf, config: &Config) -> Result<Self> {
        let bytes = if path.exists() {
            std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?
        } else {
            Vec::new()
        };
        let mut doc = Document::from_bytes(&bytes)?;
        doc.set_selection(Selection::cursor(0));

        let markers = config.markers.enabled.then(|| {
            let markers = LiveMarkers::without(config.markers.disabled.as_slice());
            for name in &config.markers.disabled {
                if !hushmark_engine::CATALOG.iter().any(|spec| spec.name == name.as_str()) {
                    log::warn!("unknown marker entry {name:?} in config, ignoring");
                }
            }
            markers
        });
        let focus = match config.focus.unit {
            ConfiguredUnit::Sentence => FocusOverlay::sentence(),
            ConfiguredUnit::Paragraph => FocusOverlay::paragraph(),
        };

        Ok(Self {
            path,
            doc,
            markers,
            focus,
            focus_on: config.focus.enabled,
            hidden: HiddenMarkers::default(),
            dimmed: Arc::new(DecorationSet::empty()),
            scroll: 0,
            dirty: false,
            status: String::new(),
            last_seen: None,
        })
    }

    fn atomic(&self) -> &AtomicRanges {
        &self.hidden.atomic
    }

    fn caret(&self) -> usize {
        self.doc.selection().to
    }

    fn caret_line(&self) -> usize {
        let caret = self.caret();
        lines_with_spans(&self.doc.text())
            .take_while(|line| line.span.start <= caret)
            .count()
            .saturating_sub(1)
    }

    /// Scrolls the caret into view and re-runs the providers for whatever
    /// changed since the last call.
    pub fn refresh(&mut self, height: usize) {
        let height = height.max(1);
        let caret_line = self.caret_line();
        if caret_line < self.scroll {
            self.scroll = caret_line;
        } else if caret_line >= self.scroll + height {
            self.scroll = caret_line + 1 - height;
        }

        let text = self.doc.text();
        let mut window = lines_with_spans(&text).skip(self.scroll).take(height);
        let visible = match window.next() {
            Some(first) => {
                let end = window.last().map_or(first.span.end, |line| line.span.end);
                Span::new(first.span.start, end)
            }
            None => Span::new(text.len(), text.len()),
        };

        let seen = (self.doc.version(), self.doc.selection(), visible);
        let flags = match self.last_seen {
            None => UpdateFlags::ALL,
            Some((version, selection, window)) => UpdateFlags {
                doc_changed: version != seen.0,
                selection_set: selection != seen.1,
                viewport_changed: window != seen.2,
            },
        };
        if !flags.any() {
            return;
        }
        self.last_seen = Some(seen);

        let visible = [visible];
        let update = self.doc.view_update(&visible, flags);
        if let Some(markers) = &mut self.markers {
            self.hidden = markers.update(&update);
        }
        self.dimmed = if self.focus_on {
            self.focus.update(&update)
        } else {
            Arc::new(DecorationSet::empty())
        };
    }

    pub fn lines(&self, height: usize) -> Vec<ProjectedLine> {
        let text = self.doc.text();
        render::project(&text, &self.hidden.merged(), &self.dimmed, self.scroll, height)
    }

    /// Caret position relative to the first displayed line.
    pub fn caret_cell(&self) -> (usize, usize) {
        let text = self.doc.text();
        let column = render::caret_column(&text, self.caret(), &self.hidden.merged());
        (self.caret_line().saturating_sub(self.scroll), column)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if ctrl => return Ok(Action::Quit),
            KeyCode::Esc => return Ok(Action::Quit),
            KeyCode::Char('s') if ctrl => self.save()?,
            KeyCode::Char('f') if ctrl => self.toggle_focus(),
            KeyCode::Left => self.step(Direction::Backward),
            KeyCode::Right => self.step(Direction::Forward),
            KeyCode::Up => self.move_line(-1),
            KeyCode::Down => self.move_line(1),
            KeyCode::Home => self.move_to_line_edge(Direction::Backward),
            KeyCode::End => self.move_to_line_edge(Direction::Forward),
            KeyCode::Backspace => self.delete(Direction::Backward),
            KeyCode::Delete => self.delete(Direction::Forward),
            KeyCode::Enter => self.insert("\n"),
            KeyCode::Tab => self.insert("\t"),
            KeyCode::Char(c) if !ctrl => self.insert(c.encode_utf8(&mut [0; 4])),
            _ => {}
        }
        Ok(Action::Continue)
    }

    fn step(&mut self, direction: Direction) {
        let caret = self.atomic().move_caret(&self.doc, self.caret(), direction);
        self.doc.set_selection(Selection::cursor(caret));
    }

    fn move_to_line_edge(&mut self, direction: Direction) {
        let line = self.doc.line_at(self.caret());
        let target = match direction {
            Direction::Backward => line.start,
            Direction::Forward => line.end,
        };
        let caret = self.atomic().snap(target, direction);
        self.doc.set_selection(Selection::cursor(caret));
    }

    /// Keeps the caret's code-point column on the target line where it fits.
    fn move_line(&mut self, delta: isize) {
        let text = self.doc.text();
        let caret = self.caret();
        let lines: Vec<Span> = lines_with_spans(&text).map(|line| line.span).collect();
        let current = self.caret_line();
        let Some(target) = current.checked_add_signed(delta).and_then(|i| lines.get(i)) else {
            return;
        };
        let column = text[lines[current].start..caret].chars().count();
        let offset = text[target.start..target.end]
            .char_indices()
            .nth(column)
            .map_or(target.end, |(i, _)| target.start + i);
        let direction = if delta < 0 {
            Direction::Backward
        } else {
            Direction::Forward
        };
        let caret = self.atomic().snap(offset, direction);
        self.doc.set_selection(Selection::cursor(caret));
    }

    fn insert(&mut self, text: &str) {
        let at = self.atomic().snap(self.caret(), Direction::Forward);
        self.doc.apply(Edit::Insert {
            at,
            text: text.to_string(),
        });
        self.dirty = true;
    }

    fn delete(&mut self, direction: Direction) {
        let range = self.atomic().deletion(&self.doc, self.caret(), direction);
        if range.is_empty() {
            return;
        }
        self.doc.apply(Edit::Delete { range });
        self.dirty = true;
    }

    pub fn toggle_focus(&mut self) {
        self.focus_on = !self.focus_on;
        // Force the overlay to run on the next refresh.
        self.last_seen = None;
        self.status = format!("focus {}", if self.focus_on { "on" } else { "off" });
    }

    pub fn save(&mut self) -> Result<()> {
        std::fs::write(&self.path, self.doc.to_bytes())
            .with_context(|| format!("writing {}", self.path.display()))?;
        self.dirty = false;
        self.status = format!("saved {}", self.path.display());
        log::info!("saved {} ({} bytes)", self.path.display(), self.doc.len());
        Ok(())
    }
}
