//! Application state and event loop

use super::image::{ImageProtocol, decode_sprite};
use super::ui;
use super::worker::{LookupRequest, WorkerEvent, spawn_worker};
use crate::controller::{LookupController, LookupId};
use anyhow::Result;
use crossterm::{
    cursor::SetCursorStyle,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use pokefetch_api::{DataSource, LookupError};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Position, Rect},
};
use ratatui_image::{picker::Picker, protocol::StatefulProtocol};
use std::io::{self, IsTerminal, Stdout};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

/// Single-line text input with cursor
#[derive(Default, Clone)]
pub struct TextInput {
    pub text: String,
    /// Byte offset, always on a char boundary
    pub cursor: usize,
}

impl TextInput {
    /// Insert a character at the cursor position
    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor
    pub fn delete_char_before(&mut self) {
        if let Some((prev, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    /// Delete the character at the cursor
    pub fn delete_char_at(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.text.drain(self.cursor..self.cursor + c.len_utf8());
        }
    }

    /// Move cursor left by one character
    pub fn move_left(&mut self) {
        if let Some((prev, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = prev;
        }
    }

    /// Move cursor right by one character
    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Move cursor to start
    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end
    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Whitespace and the hyphen in names like `mr-mime`
    fn is_word_boundary(c: char) -> bool {
        c.is_whitespace() || c == '-'
    }

    /// Delete word before cursor, along with any boundary characters after it
    pub fn delete_word_before(&mut self) {
        let s = &self.text[..self.cursor];
        let word_end = s
            .char_indices()
            .rev()
            .find(|(_, c)| !Self::is_word_boundary(*c))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let start = s[..word_end]
            .char_indices()
            .rev()
            .find(|(_, c)| Self::is_word_boundary(*c))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Clear all text
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Handle an editing key, returns true if the event was consumed
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let has_ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let has_alt = modifiers.contains(KeyModifiers::ALT);

        match code {
            // Ctrl+U: clear all
            KeyCode::Char('u') if has_ctrl => self.clear(),
            // Ctrl+W or Alt+Backspace: delete word
            KeyCode::Char('w') if has_ctrl => self.delete_word_before(),
            KeyCode::Backspace if has_alt => self.delete_word_before(),
            // Ctrl+A or Home: move to start
            KeyCode::Char('a') if has_ctrl => self.move_start(),
            KeyCode::Home => self.move_start(),
            // Ctrl+E or End: move to end
            KeyCode::Char('e') if has_ctrl => self.move_end(),
            KeyCode::End => self.move_end(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            // Backspace: delete before (checked after Alt+Backspace)
            KeyCode::Backspace => self.delete_char_before(),
            KeyCode::Delete => self.delete_char_at(),
            // Regular char (no Ctrl/Alt modifiers)
            KeyCode::Char(c) if !has_ctrl && !has_alt => self.insert_char(c),
            _ => return false,
        }
        true
    }
}

/// Application state
pub struct App {
    /// Query input
    pub search_input: TextInput,
    /// Busy flag and display slot
    pub controller: LookupController,
    /// Should quit?
    pub should_quit: bool,
    /// Image picker (None if the terminal cannot draw images)
    pub picker: Option<Picker>,
    /// Decoded images for the displayed card, by slot
    pub sprites: [Option<StatefulProtocol>; 3],
    /// Where the search button was last drawn, for mouse hit testing
    pub search_button: Rect,
    /// Channel to send lookups to the worker
    request_tx: Sender<LookupRequest>,
    /// Channel to receive outcomes and sprites from the worker
    event_rx: Receiver<WorkerEvent>,
}

impl App {
    pub fn new(source: Arc<dyn DataSource>, picker: Option<Picker>) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<LookupRequest>();
        let (event_tx, event_rx) = mpsc::channel::<WorkerEvent>();

        spawn_worker(source, request_rx, event_tx);

        Self {
            search_input: TextInput::default(),
            controller: LookupController::new(),
            should_quit: false,
            picker,
            sprites: Default::default(),
            search_button: Rect::default(),
            request_tx,
            event_rx,
        }
    }

    /// Start a lookup for the current input (Enter key or the search button)
    pub fn trigger(&mut self) {
        let Some(ticket) = self.controller.begin(&self.search_input.text) else {
            return;
        };
        self.sprites = Default::default();

        let request = LookupRequest {
            id: ticket.id,
            query: ticket.query,
            with_sprites: self.picker.is_some(),
        };
        if self.request_tx.send(request).is_err() {
            log::error!("Lookup worker is gone");
            self.controller
                .finish(ticket.id, Err(LookupError::Interrupted));
        }
    }

    /// Drain worker events (non-blocking)
    pub fn poll_worker(&mut self) {
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => self.apply_worker_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Worker died without answering the lookup in flight
                    if let Some(id) = self.controller.busy().map(|b| b.id) {
                        self.controller.finish(id, Err(LookupError::Interrupted));
                    }
                    break;
                }
            }
        }
    }

    fn apply_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Completed { id, outcome } => {
                self.controller.finish(id, outcome);
            }
            WorkerEvent::Sprite { id, slot, bytes } => self.accept_sprite(id, slot, &bytes),
        }
    }

    /// Keep sprites only for the card on screen
    fn accept_sprite(&mut self, id: LookupId, slot: usize, bytes: &[u8]) {
        if self.controller.displayed_id() != Some(id) {
            log::debug!("Dropping sprite {} of stale lookup {}", slot, id);
            return;
        }
        let Some(picker) = &self.picker else {
            return;
        };
        if let Some(cell) = self.sprites.get_mut(slot) {
            *cell = decode_sprite(bytes, picker);
        }
    }

    /// Handle input event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match (key.code, key.modifiers) {
                (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                    self.should_quit = true
                }
                (KeyCode::Enter, _) => self.trigger(),
                _ => {
                    self.search_input.handle_key(key.code, key.modifiers);
                }
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if self
                    .search_button
                    .contains(Position::new(mouse.column, mouse.row))
                {
                    self.trigger();
                }
            }
            _ => {}
        }
    }
}

/// Refuse to start unless stdin and stdout are both a terminal
fn check_terminal() -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        log::error!("Missing required terminal handles for the lookup UI");
        anyhow::bail!(
            "The interactive UI needs a terminal; use `pokefetch lookup <NAME>` instead"
        );
    }
    Ok(())
}

/// Run the TUI application
pub fn run(source: Arc<dyn DataSource>) -> Result<()> {
    check_terminal()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        SetCursorStyle::BlinkingBar
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let picker = if ImageProtocol::detect().is_supported() {
        Picker::from_query_stdio().ok()
    } else {
        None
    };
    let mut app = App::new(source, picker);

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        SetCursorStyle::DefaultUserShape
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // ~60Hz keeps the spinner smooth
    const FRAME_TIME: Duration = Duration::from_micros(16_666);

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            let ev = event::read()?;
            app.handle_event(ev);
            if app.should_quit {
                break;
            }
        }

        if app.should_quit {
            break;
        }

        app.poll_worker();

        terminal.draw(|f| ui::render(f, app))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - elapsed);
        }
    }

    Ok(())
}
