use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::ItemAction;
use crate::ops::reconcile::Viewport;
use crate::ops::search::highlight_regex;
use crate::tui::app::App;
use crate::tui::controller::Focus;
use crate::util::unicode::{display_width, truncate_to_width};

use super::push_highlighted_spans;

/// Cells before the item text: cursor marker, checkbox, space
const ROW_PREFIX: u16 = 5;
/// Cells reserved at the right edge for the action glyphs
const ACTIONS_WIDTH: u16 = 7;

/// Screen column of each action glyph on a row of `area`
pub fn action_columns(area: Rect) -> [(ItemAction, u16); 3] {
    let right = area.x + area.width;
    let mut cols = [(ItemAction::Complete, 0); 3];
    for (i, action) in ItemAction::ALL.iter().enumerate() {
        let offset = ACTIONS_WIDTH - 1 - 2 * i as u16;
        cols[i] = (*action, right.saturating_sub(offset));
    }
    cols
}

/// Keep the keyboard cursor on screen, unless a drag is moving rows around
fn adjust_scroll(app: &mut App, height: usize, count: usize) {
    if app.ctl.view.dragging().is_some() {
        return;
    }
    if app.cursor < app.scroll {
        app.scroll = app.cursor;
    } else if height > 0 && app.cursor >= app.scroll + height {
        app.scroll = app.cursor + 1 - height;
    }
    app.scroll = app.scroll.min(count.saturating_sub(height.max(1)));
}

pub fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let height = area.height as usize;
    let count = app.ctl.view.visible_ids().len();

    adjust_scroll(app, height, count);
    let cell_h = app.ctl.gestures().cell_height_px;
    app.ctl.view.set_viewport(Viewport {
        top: area.y as i32 * cell_h,
        row_height: cell_h,
        scroll: app.scroll,
    });

    if count == 0 {
        let msg = if app.ctl.store.is_empty() {
            " nothing to do"
        } else {
            " no matches"
        };
        let line = Line::from(Span::styled(msg, Style::default().fg(app.theme.dim).bg(bg)));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let search_re = highlight_regex(app.ctl.view.query());
    let text_room = area.width.saturating_sub(ROW_PREFIX + ACTIONS_WIDTH) as usize;
    let dragging = app.ctl.view.dragging();
    let list_focused = matches!(app.ctl.focus, Focus::List | Focus::Edit(_));

    let mut lines: Vec<Line> = Vec::new();
    let mut edit_cursor: Option<(u16, u16)> = None;

    let visible = app.ctl.view.nodes().iter().filter(|n| !n.hidden);
    for (row, node) in visible.enumerate().skip(app.scroll).take(height) {
        let Some(item) = app.ctl.store.get(node.id) else {
            continue;
        };
        let is_cursor = list_focused && row == app.cursor;
        let is_dragged = dragging == Some(node.id);
        let row_bg = if is_cursor || is_dragged {
            app.theme.selection_bg
        } else {
            bg
        };

        let mut text_style = Style::default().fg(app.theme.text).bg(row_bg);
        if item.done {
            text_style = text_style
                .fg(app.theme.dim)
                .add_modifier(Modifier::CROSSED_OUT);
        }
        if is_dragged {
            text_style = text_style
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD);
        }

        let mut spans = vec![
            Span::styled(
                if is_cursor { "\u{25B8}" } else { " " },
                Style::default().fg(app.theme.highlight).bg(row_bg),
            ),
            Span::styled(
                if item.done { "[x]" } else { "[ ]" },
                Style::default()
                    .fg(if item.done {
                        app.theme.green
                    } else {
                        app.theme.dim
                    })
                    .bg(row_bg),
            ),
            Span::styled(" ", Style::default().bg(row_bg)),
        ];

        let shown = match &node.editor {
            Some(editor) => {
                let text = truncate_to_width(editor.input.text(), text_room);
                if app.ctl.focus == Focus::Edit(node.id) && !editor.is_settled() {
                    let col = (editor.input.cursor_col() as u16).min(text_room as u16);
                    let y = area.y + (row - app.scroll) as u16;
                    edit_cursor = Some((area.x + ROW_PREFIX + col, y));
                }
                spans.push(Span::styled(
                    text.clone(),
                    Style::default()
                        .fg(app.theme.text_bright)
                        .bg(row_bg)
                        .add_modifier(Modifier::UNDERLINED),
                ));
                text
            }
            None => {
                let text = truncate_to_width(&item.text, text_room);
                let match_style = Style::default()
                    .fg(app.theme.search_match_fg)
                    .bg(app.theme.search_match_bg);
                push_highlighted_spans(
                    &mut spans,
                    &text,
                    text_style,
                    match_style,
                    search_re.as_ref(),
                );
                text
            }
        };

        let pad = text_room.saturating_sub(display_width(&shown)) + 1;
        spans.push(Span::styled(" ".repeat(pad), Style::default().bg(row_bg)));
        for action in ItemAction::ALL {
            let color = match action {
                ItemAction::Complete => app.theme.green,
                ItemAction::Edit => app.theme.highlight,
                ItemAction::Delete => app.theme.red,
            };
            spans.push(Span::styled(
                action.glyph().to_string(),
                Style::default().fg(color).bg(row_bg),
            ));
            spans.push(Span::styled(" ", Style::default().bg(row_bg)));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);

    if let Some(pos) = edit_cursor
        && !app.ctl.gate.is_open()
    {
        frame.set_cursor_position(pos);
    }
}
