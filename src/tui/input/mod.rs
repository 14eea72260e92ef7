mod fields;
mod list;
mod mouse;
mod text;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::App;
use super::controller::Focus;

// Submodules reach each other's handlers through `use super::*;`
#[allow(unused_imports)]
use fields::*;
#[allow(unused_imports)]
use list::*;
#[allow(unused_imports)]
use text::*;

pub use mouse::handle_mouse;

/// Handle a key event for the focused region
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    app.ctl.status_message = None;

    // An open confirmation owns the keyboard
    if app.ctl.confirm_key(key.code) {
        app.clamp_cursor();
        return;
    }

    match app.ctl.focus {
        Focus::AddInput => handle_add_key(app, key),
        Focus::Search => handle_search_key(app, key),
        Focus::List => handle_list_key(app, key),
        Focus::Edit(id) => handle_edit_key(app, id, key),
    }
    app.clamp_cursor();
}

/// Handle bracketed paste into whichever field has focus
pub fn handle_paste(app: &mut App, text: &str) {
    if app.ctl.gate.is_open() {
        return;
    }
    match app.ctl.focus {
        Focus::AddInput => app.ctl.add_input.insert_str(text),
        Focus::Search => {
            app.ctl.search_input.insert_str(text);
            search_changed(app);
        }
        Focus::Edit(id) => {
            if let Some(editor) = app
                .ctl
                .view
                .node_mut(id)
                .and_then(|n| n.editor.as_mut())
                .filter(|e| !e.is_settled())
            {
                editor.input.insert_str(text);
            }
        }
        Focus::List => {}
    }
}
