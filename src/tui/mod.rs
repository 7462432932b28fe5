pub mod widgets;

use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};
use ratatui::DefaultTerminal;
use tracing::info;

use crate::image_io::{default_output_path, load_image, save_image};
use crate::mapper::Recolorer;
use crate::store::{Palette, PaletteStore, SOURCE_PALETTE};
use widgets::PaletteWidget;

const HELP: &str = "up/down select  i image  enter colorize  q quit";
const IMAGE_PROMPT: &str = "image: ";

/// Outcome of the last action, shown on the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Saved(PathBuf),
    Failed(String),
}

/// State for the interactive palette picker.
pub struct TuiApp {
    store: PaletteStore,
    recolorer: Recolorer,
    names: Vec<String>,
    list_state: ListState,
    /// Selected palette, or the message explaining why it failed to load.
    preview: std::result::Result<Palette, String>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    /// Path being typed on the entry line, while it is open.
    editing: Option<String>,
    status: Status,
    should_quit: bool,
}

impl TuiApp {
    pub fn new(
        store: PaletteStore,
        recolorer: Recolorer,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        initial_palette: &str,
    ) -> Self {
        let names: Vec<String> = store
            .list_palette_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let selected = names
            .iter()
            .position(|n| n == initial_palette)
            .or((!names.is_empty()).then_some(0));

        let mut app = Self {
            store,
            recolorer,
            names,
            list_state: ListState::default().with_selected(selected),
            preview: Err(String::new()),
            input,
            output,
            editing: None,
            status: Status::Idle,
            should_quit: false,
        };
        app.refresh_preview();
        app
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.list_state
            .selected()
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if self.editing.is_some() {
            self.handle_edit_key(code);
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('i') => {
                let current = self
                    .input
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.editing = Some(current);
            }
            KeyCode::Down | KeyCode::Char('j') => self.step(1),
            KeyCode::Up | KeyCode::Char('k') => self.step(-1),
            KeyCode::Enter => {
                self.status = match self.colorize_selected() {
                    Ok(path) => Status::Saved(path),
                    Err(e) => Status::Failed(format!("{e:#}")),
                };
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };
        match code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => self.editing = None,
            KeyCode::Enter => {
                let text = std::mem::take(buffer);
                self.editing = None;
                self.set_input(&text);
            }
            _ => {}
        }
    }

    /// Replace the image to recolor. A blank path clears the selection.
    pub fn set_input(&mut self, path: &str) {
        let path = path.trim();
        self.input = (!path.is_empty()).then(|| PathBuf::from(path));
        self.status = Status::Idle;
        info!(image = path, "selected input image");
    }

    /// Load the selected palette, recolor the input image, and save it.
    pub fn colorize_selected(&self) -> Result<PathBuf> {
        let input = self
            .input
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no image selected"))?;
        let name = self
            .selected_name()
            .ok_or_else(|| anyhow::anyhow!("no palette selected"))?
            .to_string();
        let target = self.store.load_palette(&name)?;
        let image = load_image(input)?;
        let result = self.recolorer.colorize_image(&image, &target)?;

        let path = self
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(input, &name));
        save_image(&result, &path)?;
        info!(palette = name.as_str(), path = %path.display(), "saved colorized image");
        Ok(path)
    }

    fn step(&mut self, delta: isize) {
        if self.names.is_empty() {
            return;
        }
        let len = self.names.len() as isize;
        let current = self.list_state.selected().unwrap_or(0) as isize;
        self.list_state
            .select(Some((current + delta).rem_euclid(len) as usize));
        self.refresh_preview();
    }

    fn refresh_preview(&mut self) {
        self.preview = match self.selected_name() {
            Some(name) => self.store.load_palette(name).map_err(|e| e.to_string()),
            None => Err("no palettes defined".to_string()),
        };
    }

    fn status_line(&self) -> Line<'_> {
        if let Some(buffer) = &self.editing {
            return Line::styled(
                format!("{IMAGE_PROMPT}{buffer}"),
                Style::default().fg(Color::Yellow),
            );
        }
        match &self.status {
            Status::Idle => {
                let image = self
                    .input
                    .as_ref()
                    .map_or_else(|| "none".to_string(), |p| p.display().to_string());
                Line::styled(
                    format!("{HELP}  [image: {image}]"),
                    Style::default().fg(Color::DarkGray),
                )
            }
            Status::Saved(path) => Line::styled(
                format!("saved {}", path.display()),
                Style::default().fg(Color::Green),
            ),
            Status::Failed(msg) => {
                Line::styled(format!("error: {msg}"), Style::default().fg(Color::Red))
            }
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let [main, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
        let [list_area, preview_area] =
            Layout::horizontal([Constraint::Length(24), Constraint::Min(0)]).areas(main);
        let [source_area, target_area] =
            Layout::vertical([Constraint::Length(6), Constraint::Length(6)]).areas(preview_area);

        let items: Vec<ListItem> = self
            .names
            .iter()
            .map(|n| ListItem::new(n.as_str()))
            .collect();
        let list = List::new(items)
            .block(Block::bordered().title("Palettes"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, list_area, &mut self.list_state);

        frame.render_widget(
            PaletteWidget::new(SOURCE_PALETTE, self.recolorer.source()),
            source_area,
        );

        let title = self.selected_name().unwrap_or("");
        match &self.preview {
            Ok(palette) => frame.render_widget(PaletteWidget::new(title, palette), target_area),
            Err(msg) => frame.render_widget(
                Paragraph::new(msg.as_str())
                    .style(Style::default().fg(Color::Red))
                    .block(Block::bordered().title(title)),
                target_area,
            ),
        }

        frame.render_widget(self.status_line(), status);
        if let Some(buffer) = &self.editing {
            let x = status.x + (IMAGE_PROMPT.len() + buffer.chars().count()) as u16;
            frame.set_cursor_position((x.min(status.right().saturating_sub(1)), status.y));
        }
    }
}

/// Launch the TUI application.
pub fn run(mut app: TuiApp) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut TuiApp) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| app.draw(frame))?;
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }
    }
    Ok(())
}
