mod app;
mod render;

use anyhow::{Context, Result};
use app::{Action, App};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use hushmark_config::Config;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

/// Borders plus the status line.
const CHROME_HEIGHT: u16 = 3;

/// stdout belongs to the editor, so logs go to a file or nowhere.
fn init_logging(config: &Config) -> Result<()> {
    let log_file = match (&config.log_file, env::var_os("RUST_LOG")) {
        (Some(path), _) => path.clone(),
        (None, Some(_)) => Config::default_log_file(),
        (None, None) => return Ok(()),
    };
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("opening log file {}", log_file.display()))?;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <file.md>", args[0]);
        process::exit(1);
    }
    let path = PathBuf::from(&args[1]);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    init_logging(&config)?;
    log::info!("opening {}", path.display());

    let mut app = App::new(path, &config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        eprintln!("{err:?}");
        process::exit(1);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.refresh(size.height.saturating_sub(CHROME_HEIGHT) as usize);
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match app.handle_key(key) {
                Ok(Action::Quit) => return Ok(()),
                Ok(Action::Continue) => {}
                Err(e) => {
                    log::warn!("{e:#}");
                    app.status = format!("error: {e:#}");
                }
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let height = chunks[0].height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app.lines(height).iter().map(|line| line.to_line()).collect();

    let title = format!(
        "{}{}",
        app.path.display(),
        if app.dirty { " [+]" } else { "" }
    );
    let editor = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(editor, chunks[0]);

    let (row, column) = app.caret_cell();
    f.set_cursor_position(Position::new(
        chunks[0].x + 1 + column as u16,
        chunks[0].y + 1 + row as u16,
    ));

    let help = Line::from(vec![
        Span::styled(app.status.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  Ctrl-S: Save | Ctrl-F: Focus | Ctrl-Q/Esc: Quit"),
    ]);
    f.render_widget(Paragraph::new(help), chunks[1]);
}
