use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use json_edit::search::SearchOptions;
use json_edit::session::{EditorSession, ValidationStatus};
use json_edit::sync::TextRange;
use json_edit::ui::{flatten_forest, status_style, styled_json_line, TreeRow, Viewport};
use json_edit::EditorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Text,
    Tree,
}

enum InputMode {
    Normal,
    Insert,
    EditValue { buf: String },
    Search { buf: String },
}

struct App {
    should_quit: bool,
    session: EditorSession,
    text_viewport: Viewport,
    tree_viewport: Viewport,
    focus: Focus,
    mode: InputMode,
    cursor: usize, // char offset into the document
    tree_cursor: usize,
    selection: Option<TextRange>,
    message: String,
}

impl App {
    fn new(session: EditorSession) -> Self {
        Self {
            should_quit: false,
            session,
            text_viewport: Viewport::new(0, 40),
            tree_viewport: Viewport::new(0, 40),
            focus: Focus::Text,
            mode: InputMode::Normal,
            cursor: 0,
            tree_cursor: 0,
            selection: None,
            message: String::from("Ready"),
        }
    }

    fn tree_rows(&self) -> Vec<TreeRow> {
        flatten_forest(self.session.forest())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            match self.mode {
                InputMode::Normal => self.handle_normal_key(key),
                InputMode::Insert => self.handle_insert_key(key),
                InputMode::EditValue { .. } | InputMode::Search { .. } => {
                    self.handle_prompt_key(key)
                }
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Text => Focus::Tree,
                    Focus::Tree => Focus::Text,
                };
            }
            KeyCode::Char('j') | KeyCode::Down => match self.focus {
                Focus::Text => self
                    .text_viewport
                    .scroll_down(self.session.buffer().line_count()),
                Focus::Tree => self.move_tree_cursor(1),
            },
            KeyCode::Char('k') | KeyCode::Up => match self.focus {
                Focus::Text => self.text_viewport.scroll_up(),
                Focus::Tree => self.move_tree_cursor(-1),
            },
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.text_viewport
                    .scroll_down_page(self.session.buffer().line_count());
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.text_viewport.scroll_up_page();
            }
            KeyCode::Char('h') | KeyCode::Left if self.focus == Focus::Text => {
                self.cursor = self.cursor.saturating_sub(1);
                self.scroll_cursor_into_view();
            }
            KeyCode::Char('l') | KeyCode::Right if self.focus == Focus::Text => {
                self.cursor = (self.cursor + 1).min(self.session.buffer().len_chars());
                self.scroll_cursor_into_view();
            }
            KeyCode::Char('i') if self.focus == Focus::Text => {
                self.mode = InputMode::Insert;
                self.message = String::from("-- INSERT -- (Esc to leave)");
            }
            KeyCode::Enter if self.focus == Focus::Tree => self.select_tree_row(),
            KeyCode::Char('e') if self.focus == Focus::Tree => {
                let rows = self.tree_rows();
                match rows.get(self.tree_cursor) {
                    Some(row) if row.is_leaf => {
                        self.mode = InputMode::EditValue { buf: String::new() };
                        self.message = format!("New value for {}: ", row.path);
                    }
                    _ => self.message = String::from("Select a leaf value to edit"),
                }
            }
            KeyCode::Char('/') => {
                self.mode = InputMode::Search { buf: String::new() };
                self.message = String::from("Find: ");
            }
            KeyCode::Char('f') => match self.session.format() {
                Ok(()) => {
                    self.selection = None;
                    self.message = String::from("Formatted");
                }
                Err(err) => self.message = format!("Cannot format: {}", err),
            },
            KeyCode::Char('m') => match self.session.minify() {
                Ok(()) => {
                    self.selection = None;
                    self.message = String::from("Minified");
                }
                Err(err) => self.message = format!("Cannot minify: {}", err),
            },
            KeyCode::Char('v') => {
                self.session.validate_now();
                self.message = self.session.status().to_string();
            }
            KeyCode::Char('s') => match self.session.save() {
                Ok(path) => self.message = format!("Saved: {}", path.display()),
                Err(err) => self.message = format!("Save failed: {}", err),
            },
            KeyCode::Char('x') => self.export("xml"),
            KeyCode::Char('y') => self.export("yaml"),
            _ => {}
        }
    }

    fn handle_insert_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.message = self.session.title();
            }
            KeyCode::Char(ch) => {
                self.session.insert_text(self.cursor, &ch.to_string(), now);
                self.cursor += 1;
                self.selection = None;
            }
            KeyCode::Enter => {
                self.session.insert_text(self.cursor, "\n", now);
                self.cursor += 1;
                self.selection = None;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.session.delete_range(self.cursor - 1, self.cursor, now);
                    self.cursor -= 1;
                    self.selection = None;
                }
            }
            _ => {}
        }
        self.scroll_cursor_into_view();
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.message = String::from("Cancelled");
            }
            KeyCode::Char(ch) => {
                if let InputMode::EditValue { buf } | InputMode::Search { buf } = &mut self.mode {
                    buf.push(ch);
                }
            }
            KeyCode::Backspace => {
                if let InputMode::EditValue { buf } | InputMode::Search { buf } = &mut self.mode {
                    buf.pop();
                }
            }
            KeyCode::Enter => {
                let mode = std::mem::replace(&mut self.mode, InputMode::Normal);
                match mode {
                    InputMode::EditValue { buf } => self.commit_edit(&buf),
                    InputMode::Search { buf } => self.run_search(&buf),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn commit_edit(&mut self, new_literal: &str) {
        let rows = self.tree_rows();
        let Some(row) = rows.get(self.tree_cursor) else {
            self.message = String::from("No tree row selected");
            return;
        };
        match self.session.apply_node_edit(&row.path, new_literal) {
            Ok(()) => {
                self.selection = None;
                self.message = format!("Value updated: {}", row.path);
            }
            Err(err) => self.message = format!("Update failed: {}", err),
        }
    }

    fn run_search(&mut self, needle: &str) {
        if needle.is_empty() {
            self.message = String::from("Nothing to find");
            return;
        }
        let opts = SearchOptions::default();
        let from = self.selection.map(|r| r.end).unwrap_or(0);
        match self.session.find_next_wrapping(needle, from, &opts) {
            Some(range) => {
                let total = self.session.count_occurrences(needle, &opts);
                self.select_range(range);
                self.message = format!("Found `{}` ({} total)", needle, total);
            }
            None => {
                self.selection = None;
                self.message = format!("`{}` not found", needle);
            }
        }
    }

    fn select_tree_row(&mut self) {
        let rows = self.tree_rows();
        let Some(row) = rows.get(self.tree_cursor) else {
            return;
        };
        match self.session.resolve_selection(&row.path) {
            Ok(range) => {
                self.select_range(range);
                self.message = format!("Selected: {}", row.path);
            }
            Err(_) => {
                self.selection = None;
                self.message = format!("Selected: {} (not located in text)", row.path);
            }
        }
    }

    fn select_range(&mut self, range: TextRange) {
        self.selection = Some(range);
        self.cursor = range.start;
        let line = self.session.buffer().char_to_line(range.start);
        self.text_viewport.ensure_visible(line);
    }

    fn move_tree_cursor(&mut self, delta: isize) {
        let rows = self.tree_rows();
        if rows.is_empty() {
            self.tree_cursor = 0;
            return;
        }
        let max = rows.len() - 1;
        self.tree_cursor = if delta < 0 {
            self.tree_cursor.saturating_sub(delta.unsigned_abs())
        } else {
            (self.tree_cursor + delta as usize).min(max)
        };
        self.tree_viewport.ensure_visible(self.tree_cursor);
    }

    fn scroll_cursor_into_view(&mut self) {
        let line = self.session.buffer().char_to_line(self.cursor);
        self.text_viewport.ensure_visible(line);
    }

    fn export(&mut self, format: &str) {
        let converted = match format {
            "xml" => self.session.export_xml(),
            _ => self.session.export_yaml(),
        };
        match converted {
            Ok(output) => {
                let target = self
                    .session
                    .current_file()
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from("export"))
                    .with_extension(format);
                match std::fs::write(&target, output) {
                    Ok(()) => self.message = format!("Exported: {}", target.display()),
                    Err(err) => self.message = format!("Export failed: {}", err),
                }
            }
            Err(err) => self.message = format!("Cannot export invalid JSON: {}", err),
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    terminal.show_cursor()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Char-column range of `selection` within the line starting at `line_start`
/// and spanning `line_len` chars, if they overlap.
fn selection_on_line(
    selection: Option<TextRange>,
    line_start: usize,
    line_len: usize,
) -> Option<(usize, usize)> {
    let range = selection?;
    let line_end = line_start + line_len;
    if range.end <= line_start || range.start >= line_end {
        return None;
    }
    let start = range.start.saturating_sub(line_start);
    let end = (range.end - line_start).min(line_len);
    Some((start, end))
}

fn render_ui(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|frame| {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(size);

        // Text pane | tree pane, the original's 700/300 splitter ratio.
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[0]);

        let text_block = Block::default()
            .borders(Borders::ALL)
            .title(app.session.title())
            .border_style(if app.focus == Focus::Text {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            });
        let text_area = text_block.inner(panes[0]);
        frame.render_widget(text_block, panes[0]);
        app.text_viewport.height = text_area.height as usize;

        let buffer = app.session.buffer();
        let lines: Vec<Line> = buffer
            .visible_lines(app.text_viewport.start_line, app.text_viewport.height)
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let line_idx = app.text_viewport.start_line + i;
                let line_start = buffer.line_to_char(line_idx);
                let local =
                    selection_on_line(app.selection, line_start, line.chars().count());
                styled_json_line(line, local)
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), text_area);

        let tree_block = Block::default()
            .borders(Borders::ALL)
            .title("JSON Structure")
            .border_style(if app.focus == Focus::Tree {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            });
        let tree_area = tree_block.inner(panes[1]);
        frame.render_widget(tree_block, panes[1]);
        app.tree_viewport.height = tree_area.height as usize;

        let rows = app.tree_rows();
        let tree_lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(app.tree_viewport.start_line)
            .take(app.tree_viewport.height)
            .map(|(i, row)| {
                let text = format!("{}{}", "  ".repeat(row.depth), row.text);
                if i == app.tree_cursor && app.focus == Focus::Tree {
                    Line::styled(text, Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    Line::from(text)
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(tree_lines), tree_area);

        let prompt = match &app.mode {
            InputMode::EditValue { buf } | InputMode::Search { buf } => {
                format!("{}{}", app.message, buf)
            }
            _ => format!(
                "{} | Tab: pane  Enter: select  e: edit  /: find  f/m/v  s: save  x/y: export  q: quit",
                app.message
            ),
        };
        let status = Line::from(vec![
            Span::styled(
                format!(" {} ", app.session.status()),
                status_style(app.session.status()),
            ),
            Span::raw(prompt),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[1]);
    })?;
    Ok(())
}

fn run(app: &mut App, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    loop {
        // The 16ms event poll doubles as the debounce tick.
        if app.session.poll(Instant::now()) {
            app.tree_cursor = app.tree_cursor.min(app.tree_rows().len().saturating_sub(1));
        }

        render_ui(terminal, app)?;

        if app.should_quit {
            break;
        }
        if event::poll(Duration::from_millis(16))? {
            let event = event::read()?;
            app.handle_event(event);
        }
    }
    Ok(())
}

fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("JOT_CONFIG") {
        return PathBuf::from(path);
    }
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".config/jot/config.json"),
        None => std::env::temp_dir().join("jot-config.json"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config_file = config_path();
    let config = EditorConfig::load(&config_file).unwrap_or_else(|err| {
        tracing::warn!(%err, "falling back to default config");
        EditorConfig::default()
    });

    let mut session = EditorSession::new(config);
    session.on_validated(|status| tracing::debug!(%status, "validated"));
    session.on_projected(|forest| tracing::debug!(nodes = forest.len(), "projected"));

    let args: Vec<String> = std::env::args().collect();
    if let Some(path) = args.get(1) {
        session.open_file(std::path::Path::new(path))?;
    }

    let mut app = App::new(session);

    // Restore the terminal on panic so the shell is not left in raw mode.
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
        default_panic(info);
    }));

    let mut terminal = setup_terminal()?;
    let result = run(&mut app, &mut terminal);
    restore_terminal(terminal)?;

    if let Err(err) = app.session.config().save(&config_file) {
        tracing::warn!(%err, "could not persist config");
    }

    result
}
