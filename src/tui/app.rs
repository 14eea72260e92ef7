use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::io::blob_store::FileBlobStore;
use crate::io::config_io::read_config;
use crate::io::persistence::Persistence;
use crate::io::recovery::{recovery_entry_count, recovery_log_path};
use crate::model::{Config, ItemId};
use crate::ops::item_store::ItemStore;

use super::controller::Controller;
use super::input;
use super::render;
use super::theme::Theme;

/// A mouse press on a list row that may turn into a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub id: ItemId,
    pub column: u16,
    pub row: u16,
    /// The pointer has left the pressed cell and a drag is under way
    pub dragging: bool,
}

/// Screen regions from the last draw, used for mouse hit-testing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub add_input: Rect,
    pub search_input: Rect,
    pub list: Rect,
    pub confirm_button: Option<Rect>,
    pub cancel_button: Option<Rect>,
    pub popup: Option<Rect>,
}

/// Main application state
pub struct App {
    pub ctl: Controller,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub should_quit: bool,
    /// Keyboard cursor: index into the visible rows
    pub cursor: usize,
    /// Visible rows scrolled past
    pub scroll: usize,
    pub press: Option<Press>,
    pub layout: ScreenLayout,
}

impl App {
    pub fn new(ctl: Controller, config: &Config) -> Self {
        App {
            ctl,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            should_quit: false,
            cursor: 0,
            scroll: 0,
            press: None,
            layout: ScreenLayout::default(),
        }
    }

    /// Id under the keyboard cursor
    pub fn cursor_id(&self) -> Option<ItemId> {
        self.ctl.view.visible_ids().get(self.cursor).copied()
    }

    /// Keep the cursor on an existing visible row
    pub fn clamp_cursor(&mut self) {
        let count = self.ctl.view.visible_ids().len();
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }

    pub fn move_cursor_to(&mut self, id: ItemId) {
        if let Some(pos) = self.ctl.view.visible_ids().iter().position(|&v| v == id) {
            self.cursor = pos;
        }
    }

    /// Pointer x (px) at the center of a terminal column
    pub fn pointer_x(&self, column: u16) -> i32 {
        let w = self.ctl.gestures().cell_width_px;
        column as i32 * w + w / 2
    }

    /// Pointer y (px) at the center of a terminal row
    pub fn pointer_y(&self, row: u16) -> i32 {
        let h = self.ctl.gestures().cell_height_px;
        row as i32 * h + h / 2
    }
}

/// Run the TUI against the list stored in `data_dir`
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config(data_dir)?;
    let store = ItemStore::open(Persistence::new(FileBlobStore::new(data_dir)));
    let ctl = Controller::new(store, config.gestures.clone()).with_recovery_dir(data_dir);
    let mut app = App::new(ctl, &config);

    let unsaved = recovery_entry_count(data_dir);
    if unsaved > 0 {
        app.ctl.status_message = Some(format!(
            "{} unsaved snapshot(s) in {}",
            unsaved,
            recovery_log_path(data_dir).display()
        ));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal if anything panics
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);
    app.ctl.log_unsaved_on_exit();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }
        app.ctl.expire_alert(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
