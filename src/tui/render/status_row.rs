use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::controller::Focus;
use crate::util::unicode::{display_width, truncate_to_width};

fn key_hints(focus: Focus) -> &'static str {
    match focus {
        Focus::AddInput => "Enter add  Tab search  \u{2193} list",
        Focus::Search => "Esc clear  Enter list",
        Focus::List => "Space done  e edit  d delete  J/K move  / search  q quit",
        Focus::Edit(_) => "Enter save  Esc cancel",
    }
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = Vec::new();
    let mut used = 0;
    if let Some(msg) = &app.ctl.status_message {
        let color = if msg.starts_with("warning") {
            app.theme.red
        } else {
            app.theme.text
        };
        let text = truncate_to_width(&format!(" {}", msg), width);
        used = display_width(&text);
        spans.push(Span::styled(text, Style::default().fg(color).bg(bg)));
    }

    if app.show_key_hints && !app.ctl.gate.is_open() {
        let hint = key_hints(app.ctl.focus);
        let hint_width = display_width(hint) + 1;
        if used + hint_width < width {
            spans.push(Span::styled(
                " ".repeat(width - used - hint_width),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn hints_follow_focus() {
        let mut app = app_with_items(&["a"]);
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("Enter add"));

        app.ctl.set_focus(Focus::List);
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("J/K move"));
    }

    #[test]
    fn hints_can_be_turned_off() {
        let mut app = app_with_items(&["a"]);
        app.show_key_hints = false;
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(!out.contains("Enter add"));
    }

    #[test]
    fn status_message_is_shown() {
        let mut app = app_with_items(&["a"]);
        app.ctl.status_message = Some("warning: changes not saved (disk full)".into());
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("warning: changes not saved (disk full)"));
    }
}
