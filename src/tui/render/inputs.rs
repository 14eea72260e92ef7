use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::controller::Focus;
use crate::util::line_buffer::LineBuffer;
use crate::util::unicode::{display_width, truncate_to_width};

/// Shown next to the add input when an empty add is attempted
pub const EMPTY_ALERT: &str = "Please enter a task";

const PROMPT_WIDTH: u16 = 3;

pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let items = app.ctl.store.all();
    let done = items.iter().filter(|i| i.done).count();

    let title = " jot";
    let summary = format!("{} items, {} done ", items.len(), done);
    let pad = (area.width as usize).saturating_sub(display_width(title) + display_width(&summary));

    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ".repeat(pad), Style::default().bg(bg)),
        Span::styled(summary, Style::default().fg(app.theme.dim).bg(bg)),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

pub fn render_add_input(frame: &mut Frame, app: &App, area: Rect) {
    let alert = app.ctl.alert_visible().then_some(EMPTY_ALERT);
    let focused = app.ctl.focus == Focus::AddInput;
    render_field(
        frame,
        app,
        area,
        FieldSpec {
            prompt: " + ",
            placeholder: "add a task",
            alert,
            focused,
        },
        &app.ctl.add_input,
    );
}

pub fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.ctl.focus == Focus::Search;
    render_field(
        frame,
        app,
        area,
        FieldSpec {
            prompt: " / ",
            placeholder: "search",
            alert: None,
            focused,
        },
        &app.ctl.search_input,
    );
}

pub fn render_separator(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(Span::styled(
        "\u{2500}".repeat(area.width as usize),
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

struct FieldSpec {
    prompt: &'static str,
    placeholder: &'static str,
    alert: Option<&'static str>,
    focused: bool,
}

fn render_field(frame: &mut Frame, app: &App, area: Rect, spec: FieldSpec, buf: &LineBuffer) {
    let bg = app.theme.background;
    let prompt_style = if spec.focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };

    let alert_width = spec.alert.map_or(0, |a| display_width(a) + 1);
    let room = (area.width.saturating_sub(PROMPT_WIDTH) as usize).saturating_sub(alert_width);

    let mut spans = vec![Span::styled(spec.prompt, prompt_style)];
    let body = if buf.is_empty() {
        Span::styled(
            truncate_to_width(spec.placeholder, room),
            Style::default().fg(app.theme.dim).bg(bg),
        )
    } else {
        Span::styled(
            truncate_to_width(buf.text(), room),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )
    };
    let used = display_width(&body.content);
    spans.push(body);

    if let Some(alert) = spec.alert {
        let pad = room.saturating_sub(used) + 1;
        spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
        spans.push(Span::styled(
            alert,
            Style::default()
                .fg(app.theme.red)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    if spec.focused && !app.ctl.gate.is_open() {
        let col = (buf.cursor_col() as u16).min(room as u16);
        frame.set_cursor_position((area.x + PROMPT_WIDTH + col, area.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::controller::Intent;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn placeholder_shows_when_empty() {
        let mut app = app_with_items(&[]);
        let out = render_app(&mut app, 40, 8);
        assert!(out.contains(" + add a task"));
        assert!(out.contains(" / search"));
    }

    #[test]
    fn typed_text_replaces_the_placeholder() {
        let mut app = app_with_items(&[]);
        app.ctl.add_input.insert_str("buy milk");
        let out = render_app(&mut app, 40, 8);
        assert!(out.contains(" + buy milk"));
        assert!(!out.contains("add a task"));
    }

    #[test]
    fn empty_add_shows_the_alert() {
        let mut app = app_with_items(&[]);
        app.ctl.dispatch(Intent::AddRequested("  ".into()));
        let out = render_app(&mut app, 60, 8);
        assert!(out.contains(EMPTY_ALERT));
    }

    #[test]
    fn header_counts_items() {
        let mut app = app_with_items(&["a", "b"]);
        let id = app.ctl.store.all()[0].id;
        app.ctl.dispatch(Intent::Clicked {
            id,
            action: crate::model::ItemAction::Complete,
        });
        let out = render_app(&mut app, 40, 8);
        assert!(out.contains("2 items, 1 done"));
    }
}
