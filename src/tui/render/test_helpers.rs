use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::blob_store::MemoryBlobStore;
use crate::io::persistence::Persistence;
use crate::model::Config;
use crate::ops::item_store::ItemStore;
use crate::tui::app::App;
use crate::tui::controller::Controller;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Draw the whole screen for `app`, updating its layout and viewport
pub fn render_app(app: &mut App, w: u16, h: u16) -> String {
    render_to_string(w, h, |frame, _| super::render(frame, app))
}

/// An app over an in-memory store holding `texts` in order
pub fn app_with_items(texts: &[&str]) -> App {
    let mut store = ItemStore::open(Persistence::new(MemoryBlobStore::new())).with_clock(|| 0);
    for text in texts {
        store.add(text).unwrap();
    }
    let config = Config::default();
    let ctl = Controller::new(store, config.gestures.clone());
    App::new(ctl, &config)
}
