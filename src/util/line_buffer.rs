use super::unicode;

/// Single-line text input with a grapheme-aware cursor (byte offset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
    cursor: usize,
}

impl LineBuffer {
    /// Buffer holding `text` with the cursor at the end
    pub fn with_text(text: &str) -> Self {
        LineBuffer {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor position in terminal cells
    pub fn cursor_col(&self) -> usize {
        unicode::byte_offset_to_display_col(&self.text, self.cursor)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        // Newlines would break the single-row layout
        let c = if c == '\n' || c == '\r' { ' ' } else { c };
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        let clean = s.replace(['\n', '\r'], " ");
        self.text.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    /// Delete the grapheme before the cursor. Returns false at start.
    pub fn backspace(&mut self) -> bool {
        match unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            Some(prev) => {
                self.text.replace_range(prev..self.cursor, "");
                self.cursor = prev;
                true
            }
            None => false,
        }
    }

    /// Delete the grapheme under the cursor. Returns false at end.
    pub fn delete(&mut self) -> bool {
        match unicode::next_grapheme_boundary(&self.text, self.cursor) {
            Some(next) => {
                self.text.replace_range(self.cursor..next, "");
                true
            }
            None => false,
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_backspace() {
        let mut buf = LineBuffer::default();
        for c in "abc".chars() {
            buf.insert_char(c);
        }
        assert!(buf.backspace());
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn insert_in_middle() {
        let mut buf = LineBuffer::with_text("ac");
        buf.move_left();
        buf.insert_char('b');
        assert_eq!(buf.text(), "abc");
        buf.home();
        assert!(buf.delete());
        assert_eq!(buf.text(), "bc");
        buf.end();
        assert!(!buf.delete());
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut buf = LineBuffer::with_text("cafe\u{0301}");
        buf.backspace();
        assert_eq!(buf.text(), "caf");
        assert_eq!(buf.cursor_col(), 3);
    }

    #[test]
    fn pasted_newlines_become_spaces() {
        let mut buf = LineBuffer::default();
        buf.insert_str("a\nb");
        assert_eq!(buf.text(), "a b");
        assert_eq!(buf.cursor(), 3);
    }
}
