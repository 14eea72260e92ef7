use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::tui::controller::PendingMutation;
use crate::util::unicode::truncate_to_width;

const CANCEL_LABEL: &str = "[ Cancel ]";
const CONFIRM_LABEL: &str = "[ Confirm ]";
/// Row of the buttons inside the popup border
const BUTTON_ROW: u16 = 4;

/// Render the confirmation popup while the gate is open and record its
/// button regions for mouse clicks
pub fn render_confirm_popup(frame: &mut Frame, app: &mut App, area: Rect) {
    if !app.ctl.gate.is_open() {
        app.layout.popup = None;
        app.layout.confirm_button = None;
        app.layout.cancel_button = None;
        return;
    }
    let Some(request) = app.ctl.gate.request() else {
        return;
    };

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let bright_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let popup_w: u16 = 44.min(area.width.saturating_sub(2));
    let room = popup_w.saturating_sub(6) as usize;

    let detail = match &request.pending {
        PendingMutation::Delete { id } => app
            .ctl
            .store
            .get(*id)
            .map(|i| format!("\"{}\"", i.text))
            .unwrap_or_default(),
        PendingMutation::Edit { text, .. } => format!("\u{2192} \"{}\"", text),
    };

    let lines = vec![
        Line::from(Span::styled(format!(" {}", request.message), header_style)),
        Line::from(Span::styled("", text_style)),
        Line::from(vec![
            Span::styled("  ", text_style),
            Span::styled(truncate_to_width(&detail, room), bright_style),
        ]),
        Line::from(Span::styled("", text_style)),
        Line::from(vec![
            Span::styled("  ", text_style),
            Span::styled(CANCEL_LABEL, text_style),
            Span::styled("  ", text_style),
            Span::styled(CONFIRM_LABEL, header_style),
        ]),
        Line::from(vec![
            Span::styled("  ", text_style),
            Span::styled("Enter", dim_style),
            Span::styled(" confirm  ", text_style),
            Span::styled("Esc", dim_style),
            Span::styled(" cancel", text_style),
        ]),
    ];

    let popup_h = ((lines.len() as u16) + 2).min(area.height);
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);

    let button_y = overlay_area.y + 1 + BUTTON_ROW;
    let cancel_x = overlay_area.x + 3;
    let confirm_x = cancel_x + CANCEL_LABEL.len() as u16 + 2;
    app.layout.popup = Some(overlay_area);
    app.layout.cancel_button = Some(Rect::new(cancel_x, button_y, CANCEL_LABEL.len() as u16, 1));
    app.layout.confirm_button =
        Some(Rect::new(confirm_x, button_y, CONFIRM_LABEL.len() as u16, 1));
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
