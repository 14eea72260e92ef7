use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::model::ItemAction;
use crate::tui::app::{App, Press};
use crate::tui::controller::{Focus, Intent};
use crate::tui::render::list_view::action_columns;

/// Handle a mouse event: clicks on fields, buttons and action glyphs, and
/// press-drag-release gestures on list rows.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => press(app, column, row),
        MouseEventKind::Drag(MouseButton::Left) => drag(app, column, row),
        MouseEventKind::Up(MouseButton::Left) => release(app, column),
        MouseEventKind::ScrollUp => app.cursor = app.cursor.saturating_sub(1),
        MouseEventKind::ScrollDown => {
            app.cursor += 1;
            app.clamp_cursor();
        }
        _ => {}
    }
}

fn press(app: &mut App, column: u16, row: u16) {
    app.ctl.status_message = None;
    let pos = Position::new(column, row);

    if let Some(popup) = app.layout.popup
        && popup.contains(pos)
    {
        if app.layout.confirm_button.is_some_and(|r| r.contains(pos)) {
            app.ctl.dispatch(Intent::ConfirmAccepted);
        } else if app.layout.cancel_button.is_some_and(|r| r.contains(pos)) {
            app.ctl.dispatch(Intent::ConfirmDeclined);
        }
        app.clamp_cursor();
        return;
    }

    if app.layout.add_input.contains(pos) {
        app.ctl.set_focus(Focus::AddInput);
        return;
    }
    if app.layout.search_input.contains(pos) {
        app.ctl.set_focus(Focus::Search);
        return;
    }
    if !app.layout.list.contains(pos) {
        return;
    }

    let Some(id) = app.ctl.view.node_at(app.pointer_y(row)) else {
        app.ctl.set_focus(Focus::List);
        return;
    };

    if let Some(action) = action_at(app, column) {
        app.ctl.set_focus(Focus::List);
        app.move_cursor_to(id);
        app.ctl.dispatch(Intent::Clicked { id, action });
        app.clamp_cursor();
        return;
    }

    // Clicking inside the field being edited keeps it open
    if app.ctl.focus == Focus::Edit(id) {
        return;
    }
    app.ctl.set_focus(Focus::List);
    app.move_cursor_to(id);
    app.press = Some(Press {
        id,
        column,
        row,
        dragging: false,
    });
}

fn action_at(app: &App, column: u16) -> Option<ItemAction> {
    action_columns(app.layout.list)
        .into_iter()
        .find(|&(_, col)| col == column)
        .map(|(action, _)| action)
}

fn drag(app: &mut App, column: u16, row: u16) {
    let Some(mut press) = app.press else {
        return;
    };
    if !press.dragging {
        if column == press.column && row == press.row {
            return;
        }
        press.dragging = true;
        app.press = Some(press);
        let pointer_x = app.pointer_x(press.column);
        app.ctl.dispatch(Intent::DragStarted {
            id: press.id,
            pointer_x,
        });
    }
    let pointer_y = drag_pointer_y(app, press.id, row);
    app.ctl.dispatch(Intent::DragMoved { pointer_y });
}

/// A terminal row is one cell tall, so there is no upper or lower half to
/// aim at. Report the top edge of the row when moving up and its bottom
/// edge when moving down, which lands the dragged row on the hovered one.
fn drag_pointer_y(app: &App, id: crate::model::ItemId, row: u16) -> i32 {
    let h = app.ctl.gestures().cell_height_px.max(1);
    let row_top = row as i32 * h;
    let dragged_top = app
        .ctl
        .view
        .row_spans()
        .into_iter()
        .find(|(n, _)| *n == id)
        .map(|(_, span)| span.top);
    match dragged_top {
        Some(top) if row_top > top => row_top + h - 1,
        _ => row_top,
    }
}

fn release(app: &mut App, column: u16) {
    let Some(press) = app.press.take() else {
        return;
    };
    if press.dragging {
        app.ctl.dispatch(Intent::Dropped);
        let pointer_x = app.pointer_x(column);
        app.ctl.dispatch(Intent::DragEnded { pointer_x });
        app.move_cursor_to(press.id);
        app.clamp_cursor();
    }
}
