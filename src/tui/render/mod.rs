pub mod confirm_popup;
pub mod inputs;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use super::app::App;

/// Main render function: dispatches to sub-renderers and records the
/// regions mouse input hit-tests against
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header | add input | search input | separator | list | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // add input
            Constraint::Length(1), // search input
            Constraint::Length(1), // separator
            Constraint::Min(1),    // list
            Constraint::Length(1), // status row
        ])
        .split(area);

    app.layout.add_input = chunks[1];
    app.layout.search_input = chunks[2];
    app.layout.list = chunks[4];

    inputs::render_header(frame, app, chunks[0]);
    inputs::render_add_input(frame, app, chunks[1]);
    inputs::render_search_input(frame, app, chunks[2]);
    inputs::render_separator(frame, app, chunks[3]);
    list_view::render_list(frame, app, chunks[4]);
    status_row::render_status_row(frame, app, chunks[5]);

    // Confirmation popup (rendered on top of everything)
    confirm_popup::render_confirm_popup(frame, app, area);
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(
            text[m.start()..m.end()].to_string(),
            highlight_style,
        ));
        last_end = m.end();
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;
    use crate::ops::search::highlight_regex;
    use crate::tui::controller::{Focus, Intent};

    #[test]
    fn highlighted_spans_split_on_matches() {
        let re = highlight_regex("milk");
        let mut spans = Vec::new();
        push_highlighted_spans(
            &mut spans,
            "Milk and more milk",
            Style::default(),
            Style::default(),
            re.as_ref(),
        );
        let parts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["Milk", " and more ", "milk"]);
    }

    #[test]
    fn full_screen_shows_inputs_and_rows() {
        let mut app = app_with_items(&["buy milk", "walk dog"]);
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("jot"));
        assert!(out.contains("add a task"));
        assert!(out.contains("search"));
        assert!(out.contains("[ ] buy milk"));
        assert!(out.contains("[ ] walk dog"));
        assert!(out.contains("\u{2713} \u{270E} \u{2717}"));
    }

    #[test]
    fn layout_regions_are_recorded() {
        let mut app = app_with_items(&["a"]);
        render_app(&mut app, TERM_W, TERM_H);
        assert_eq!(app.layout.add_input.y, 1);
        assert_eq!(app.layout.search_input.y, 2);
        assert_eq!(app.layout.list.y, 4);
        assert_eq!(app.layout.list.height, TERM_H - 5);
        assert!(app.layout.popup.is_none());
    }

    #[test]
    fn popup_appears_while_the_gate_is_open() {
        let mut app = app_with_items(&["buy milk"]);
        app.ctl.set_focus(Focus::List);
        let id = app.ctl.store.all()[0].id;
        app.ctl.dispatch(Intent::Clicked {
            id,
            action: crate::model::ItemAction::Delete,
        });
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("confirm delete"));
        assert!(out.contains("[ Confirm ]"));
        assert!(out.contains("[ Cancel ]"));
        assert!(app.layout.popup.is_some());
    }
}
