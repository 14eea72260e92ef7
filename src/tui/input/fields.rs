use super::*;

use crate::model::ItemId;
use crate::tui::controller::{CommitTrigger, Intent};

pub(super) fn handle_add_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let text = app.ctl.add_input.text().to_string();
            app.ctl.dispatch(Intent::AddRequested(text));
            if let Some(id) = app.ctl.store.all().last().map(|i| i.id) {
                app.move_cursor_to(id);
            }
        }
        KeyCode::Esc => app.ctl.dispatch(Intent::AddCancelled),
        KeyCode::Tab => app.ctl.set_focus(Focus::Search),
        KeyCode::BackTab | KeyCode::Down => app.ctl.set_focus(Focus::List),
        _ => {
            edit_line(&mut app.ctl.add_input, key);
        }
    }
}

pub(super) fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.ctl.search_input.clear();
            search_changed(app);
            app.ctl.set_focus(Focus::List);
        }
        KeyCode::Enter | KeyCode::Tab | KeyCode::Down => app.ctl.set_focus(Focus::List),
        KeyCode::BackTab | KeyCode::Up => app.ctl.set_focus(Focus::AddInput),
        _ => {
            if edit_line(&mut app.ctl.search_input, key) == LineEdit::Changed {
                search_changed(app);
            }
        }
    }
}

/// Re-filter the list from the search field and reset the cursor
pub(super) fn search_changed(app: &mut App) {
    let query = app.ctl.search_input.text().to_string();
    app.ctl.dispatch(Intent::SearchChanged(query));
    app.cursor = 0;
    app.scroll = 0;
}

pub(super) fn handle_edit_key(app: &mut App, id: ItemId, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.ctl.dispatch(Intent::EditCommit {
            id,
            trigger: CommitTrigger::Enter,
        }),
        KeyCode::Esc => app.ctl.dispatch(Intent::EditCancelled { id }),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.ctl.set_focus(Focus::List)
        }
        _ => {
            if let Some(editor) = app
                .ctl
                .view
                .node_mut(id)
                .and_then(|n| n.editor.as_mut())
                .filter(|e| !e.is_settled())
            {
                edit_line(&mut editor.input, key);
            }
        }
    }
}
