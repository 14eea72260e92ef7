use super::*;

use crate::model::ItemAction;
use crate::tui::controller::Intent;

pub(super) fn handle_list_key(app: &mut App, key: KeyEvent) {
    let count = app.ctl.view.visible_ids().len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            if app.cursor == 0 {
                app.ctl.set_focus(Focus::Search);
            } else {
                app.cursor -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.cursor + 1 < count {
                app.cursor += 1;
            }
        }
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.cursor = count.saturating_sub(1),
        KeyCode::Char('K') => nudge(app, Nudge::Up),
        KeyCode::Char('J') => nudge(app, Nudge::Down),
        KeyCode::Char(' ') | KeyCode::Char('x') => click_cursor(app, ItemAction::Complete),
        KeyCode::Enter | KeyCode::Char('e') => click_cursor(app, ItemAction::Edit),
        KeyCode::Delete | KeyCode::Char('d') => click_cursor(app, ItemAction::Delete),
        KeyCode::Char('a') | KeyCode::Tab => app.ctl.set_focus(Focus::AddInput),
        KeyCode::Char('/') | KeyCode::BackTab => app.ctl.set_focus(Focus::Search),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn click_cursor(app: &mut App, action: ItemAction) {
    if let Some(id) = app.cursor_id() {
        app.ctl.dispatch(Intent::Clicked { id, action });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Nudge {
    Up,
    Down,
}

/// Move the cursor row one place by replaying a short drag over the
/// neighbouring row, so keyboard moves reorder exactly like mouse drags.
pub(super) fn nudge(app: &mut App, direction: Nudge) {
    let Some(id) = app.cursor_id() else {
        return;
    };
    let spans = app.ctl.view.row_spans();
    let Some(pos) = spans.iter().position(|(n, _)| *n == id) else {
        return;
    };
    let pointer_y = match direction {
        Nudge::Up => {
            let Some(prev) = pos.checked_sub(1).map(|p| spans[p].1) else {
                return;
            };
            prev.top
        }
        Nudge::Down => {
            let Some((_, next)) = spans.get(pos + 1) else {
                return;
            };
            next.top + next.height
        }
    };

    app.ctl.dispatch(Intent::DragStarted { id, pointer_x: 0 });
    app.ctl.dispatch(Intent::DragMoved { pointer_y });
    app.ctl.dispatch(Intent::Dropped);
    app.ctl.dispatch(Intent::DragEnded { pointer_x: 0 });
    app.move_cursor_to(id);
}
