use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::util::line_buffer::LineBuffer;

/// Result of feeding a key to a single-line input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LineEdit {
    /// Text changed
    Changed,
    /// Only the cursor moved (or nothing happened)
    Moved,
    /// Not a text-editing key
    Unhandled,
}

pub(super) fn edit_line(buf: &mut LineBuffer, key: KeyEvent) -> LineEdit {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            buf.clear();
            LineEdit::Changed
        }
        (m, KeyCode::Char(c)) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            buf.insert_char(c);
            LineEdit::Changed
        }
        (_, KeyCode::Backspace) => changed_if(buf.backspace()),
        (_, KeyCode::Delete) => changed_if(buf.delete()),
        (_, KeyCode::Left) => {
            buf.move_left();
            LineEdit::Moved
        }
        (_, KeyCode::Right) => {
            buf.move_right();
            LineEdit::Moved
        }
        (_, KeyCode::Home) => {
            buf.home();
            LineEdit::Moved
        }
        (_, KeyCode::End) => {
            buf.end();
            LineEdit::Moved
        }
        _ => LineEdit::Unhandled,
    }
}

fn changed_if(changed: bool) -> LineEdit {
    if changed {
        LineEdit::Changed
    } else {
        LineEdit::Moved
    }
}
