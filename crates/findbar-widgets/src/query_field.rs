//! Single-line query field used inside the find bar.
//!
//! Handles the usual line-editing keys (word motion, kill to start/end,
//! undo/redo, bracketed paste) and reports every content change as a
//! [`Message::Changed`] command. Cursor-only motion reports nothing.

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use findbar_core::command::Command;
use findbar_core::component::Component;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

const UNDO_DEPTH: usize = 100;

/// Style configuration for the query field.
#[derive(Debug, Clone)]
pub struct QueryFieldStyle {
    /// Style applied to the query text.
    pub text: Style,
    /// Style applied to the placeholder text.
    pub placeholder: Style,
    /// Style applied to the cursor cell.
    pub cursor: Style,
}

impl Default for QueryFieldStyle {
    fn default() -> Self {
        Self {
            text: Style::default().fg(Color::Rgb(0xe6, 0x60, 0x00)),
            placeholder: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

/// Messages for the query field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A keyboard event to process.
    KeyPress(KeyEvent),
    /// Paste text at the cursor. Line breaks are dropped.
    Paste(String),
    /// Emitted after the content changed, carrying the new value.
    Changed(String),
}

/// A single-line editable query.
pub struct QueryField {
    value: Vec<char>,
    cursor: usize,
    focus: bool,
    placeholder: String,
    char_limit: Option<usize>,
    style: QueryFieldStyle,
    undo_stack: VecDeque<(Vec<char>, usize)>,
    redo_stack: VecDeque<(Vec<char>, usize)>,
}

impl QueryField {
    /// Create an empty field showing `placeholder` while unfocused.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            value: Vec::new(),
            cursor: 0,
            focus: false,
            placeholder: placeholder.into(),
            char_limit: None,
            style: QueryFieldStyle::default(),
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
        }
    }

    /// Set the maximum number of characters allowed.
    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = Some(limit);
        self
    }

    /// Set custom styles.
    pub fn with_style(mut self, style: QueryFieldStyle) -> Self {
        self.style = style;
        self
    }

    /// Give this field keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// The current value.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Replace the value and move the cursor to the end.
    ///
    /// The replacement is recorded for undo. The char limit truncates it.
    pub fn set_value(&mut self, value: &str) {
        self.record_undo((self.value.clone(), self.cursor));
        let limit = self.char_limit.unwrap_or(usize::MAX);
        self.value = value.chars().take(limit).collect();
        self.cursor = self.value.len();
    }

    /// Cursor position as a character index.
    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Whether the value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn record_undo(&mut self, snapshot: (Vec<char>, usize)) {
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > UNDO_DEPTH {
            self.undo_stack.pop_front();
        }
    }

    fn at_limit(&self) -> bool {
        self.char_limit.is_some_and(|limit| self.value.len() >= limit)
    }

    fn insert_chars(&mut self, chars: impl IntoIterator<Item = char>) -> bool {
        let mut inserted = false;
        for c in chars {
            if self.at_limit() {
                break;
            }
            self.value.insert(self.cursor, c);
            self.cursor += 1;
            inserted = true;
        }
        inserted
    }

    fn delete_backward(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.value.remove(self.cursor);
        true
    }

    fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.value.len() {
            return false;
        }
        self.value.remove(self.cursor);
        true
    }

    fn delete_word_backward(&mut self) -> bool {
        let end = self.cursor;
        let start = self.word_start_before(end);
        self.value.drain(start..end);
        self.cursor = start;
        start != end
    }

    fn delete_word_forward(&mut self) -> bool {
        let start = self.cursor;
        let end = self.word_end_after(start);
        self.value.drain(start..end);
        start != end
    }

    fn word_start_before(&self, mut pos: usize) -> usize {
        while pos > 0 && !self.value[pos - 1].is_alphanumeric() {
            pos -= 1;
        }
        while pos > 0 && self.value[pos - 1].is_alphanumeric() {
            pos -= 1;
        }
        pos
    }

    fn word_end_after(&self, mut pos: usize) -> usize {
        let len = self.value.len();
        while pos < len && !self.value[pos].is_alphanumeric() {
            pos += 1;
        }
        while pos < len && self.value[pos].is_alphanumeric() {
            pos += 1;
        }
        pos
    }

    fn kill_to_start(&mut self) -> bool {
        let removed = self.value.drain(..self.cursor).count();
        self.cursor = 0;
        removed > 0
    }

    fn kill_to_end(&mut self) -> bool {
        let before = self.value.len();
        self.value.truncate(self.cursor);
        before != self.value.len()
    }

    fn undo(&mut self) -> bool {
        let Some((value, cursor)) = self.undo_stack.pop_back() else {
            return false;
        };
        let changed = value != self.value;
        let current = std::mem::replace(&mut self.value, value);
        self.redo_stack.push_back((current, self.cursor));
        self.cursor = cursor;
        changed
    }

    fn redo(&mut self) -> bool {
        let Some((value, cursor)) = self.redo_stack.pop_back() else {
            return false;
        };
        let changed = value != self.value;
        let current = std::mem::replace(&mut self.value, value);
        self.undo_stack.push_back((current, self.cursor));
        self.cursor = cursor;
        changed
    }

    /// Run an edit and record undo state only when it changed the content.
    fn edit(&mut self, f: impl FnOnce(&mut Self) -> bool) -> Command<Message> {
        let snapshot = (self.value.clone(), self.cursor);
        if !f(self) {
            return Command::none();
        }
        self.record_undo(snapshot);
        Command::message(Message::Changed(self.value()))
    }

    fn changed_if(&self, changed: bool) -> Command<Message> {
        if changed {
            Command::message(Message::Changed(self.value()))
        } else {
            Command::none()
        }
    }

    /// First character index shown so that the cursor stays inside `width`
    /// columns.
    fn scroll_offset(&self, width: usize) -> usize {
        if width == 0 {
            return self.cursor;
        }
        // The cursor cell itself takes one column when it sits past the end.
        let mut used = 1;
        let mut start = self.cursor;
        while start > 0 {
            let w = self.value[start - 1].width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            start -= 1;
        }
        start
    }
}

impl Component for QueryField {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => {
                if !self.focus {
                    return Command::none();
                }
                match (key.code, key.modifiers) {
                    (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                        self.edit(|f| f.insert_chars([c]))
                    }
                    (KeyCode::Backspace, KeyModifiers::NONE) => self.edit(Self::delete_backward),
                    (KeyCode::Delete, KeyModifiers::NONE) => self.edit(Self::delete_forward),
                    (KeyCode::Backspace, m) if m.contains(KeyModifiers::ALT) => {
                        self.edit(Self::delete_word_backward)
                    }
                    (KeyCode::Char('w'), m) if m.contains(KeyModifiers::CONTROL) => {
                        self.edit(Self::delete_word_backward)
                    }
                    (KeyCode::Char('d'), m) if m.contains(KeyModifiers::ALT) => {
                        self.edit(Self::delete_word_forward)
                    }
                    (KeyCode::Delete, m) if m.contains(KeyModifiers::CONTROL) => {
                        self.edit(Self::delete_word_forward)
                    }
                    (KeyCode::Char('u'), m) if m.contains(KeyModifiers::CONTROL) => {
                        self.edit(Self::kill_to_start)
                    }
                    (KeyCode::Char('k'), m) if m.contains(KeyModifiers::CONTROL) => {
                        self.edit(Self::kill_to_end)
                    }
                    (KeyCode::Char('z'), m) if m.contains(KeyModifiers::CONTROL) => {
                        let changed = self.undo();
                        self.changed_if(changed)
                    }
                    (KeyCode::Char('y'), m) if m.contains(KeyModifiers::CONTROL) => {
                        let changed = self.redo();
                        self.changed_if(changed)
                    }
                    (KeyCode::Left, KeyModifiers::NONE) => {
                        self.cursor = self.cursor.saturating_sub(1);
                        Command::none()
                    }
                    (KeyCode::Right, KeyModifiers::NONE) => {
                        self.cursor = (self.cursor + 1).min(self.value.len());
                        Command::none()
                    }
                    (KeyCode::Left, m)
                        if m.contains(KeyModifiers::CONTROL) || m.contains(KeyModifiers::ALT) =>
                    {
                        self.cursor = self.word_start_before(self.cursor);
                        Command::none()
                    }
                    (KeyCode::Right, m)
                        if m.contains(KeyModifiers::CONTROL) || m.contains(KeyModifiers::ALT) =>
                    {
                        self.cursor = self.word_end_after(self.cursor);
                        Command::none()
                    }
                    (KeyCode::Home, _) => {
                        self.cursor = 0;
                        Command::none()
                    }
                    (KeyCode::Char('a'), m) if m.contains(KeyModifiers::CONTROL) => {
                        self.cursor = 0;
                        Command::none()
                    }
                    (KeyCode::End, _) => {
                        self.cursor = self.value.len();
                        Command::none()
                    }
                    (KeyCode::Char('e'), m) if m.contains(KeyModifiers::CONTROL) => {
                        self.cursor = self.value.len();
                        Command::none()
                    }
                    _ => Command::none(),
                }
            }
            Message::Paste(text) => {
                if !self.focus {
                    return Command::none();
                }
                let chars: Vec<char> = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
                self.edit(|f| f.insert_chars(chars))
            }
            Message::Changed(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let width = area.width as usize;

        let line = if self.value.is_empty() {
            if self.focus {
                Line::from(Span::styled(" ", self.style.cursor))
            } else {
                Line::from(Span::styled(self.placeholder.as_str(), self.style.placeholder))
            }
        } else {
            let offset = if self.focus { self.scroll_offset(width) } else { 0 };
            let mut spans = Vec::new();
            if !self.focus {
                let shown: String = self.value[offset..].iter().collect();
                spans.push(Span::styled(shown, self.style.text));
            } else {
                let before: String = self.value[offset..self.cursor].iter().collect();
                if !before.is_empty() {
                    spans.push(Span::styled(before, self.style.text));
                }
                match self.value.get(self.cursor) {
                    Some(c) => {
                        spans.push(Span::styled(c.to_string(), self.style.cursor));
                        let after: String = self.value[self.cursor + 1..].iter().collect();
                        if !after.is_empty() {
                            spans.push(Span::styled(after, self.style.text));
                        }
                    }
                    None => spans.push(Span::styled(" ", self.style.cursor)),
                }
            }
            Line::from(spans)
        };

        frame.render_widget(Paragraph::new(line), area);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findbar_core::testing::{render_component, row_string};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn alt(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::ALT)
    }

    fn focused(text: &str) -> QueryField {
        let mut field = QueryField::new("Find in page");
        field.focus();
        field.set_value(text);
        field
    }

    fn changed(cmd: Command<Message>) -> Option<String> {
        match cmd.into_message() {
            Some(Message::Changed(s)) => Some(s),
            _ => None,
        }
    }

    #[test]
    fn typing_reports_each_change() {
        let mut field = focused("");
        assert_eq!(changed(field.update(Message::KeyPress(key(KeyCode::Char('h'))))).as_deref(), Some("h"));
        assert_eq!(changed(field.update(Message::KeyPress(key(KeyCode::Char('i'))))).as_deref(), Some("hi"));
        assert_eq!(field.value(), "hi");
    }

    #[test]
    fn cursor_motion_reports_nothing() {
        let mut field = focused("abc");
        assert!(field.update(Message::KeyPress(key(KeyCode::Left))).is_none());
        assert!(field.update(Message::KeyPress(key(KeyCode::Home))).is_none());
        assert!(field.update(Message::KeyPress(ctrl(KeyCode::Char('e')))).is_none());
        assert_eq!(field.cursor_position(), 3);
    }

    #[test]
    fn backspace_at_start_is_not_a_change() {
        let mut field = focused("ab");
        field.update(Message::KeyPress(key(KeyCode::Home)));
        assert!(field.update(Message::KeyPress(key(KeyCode::Backspace))).is_none());
        assert_eq!(field.value(), "ab");
    }

    #[test]
    fn insert_in_middle() {
        let mut field = focused("ac");
        field.update(Message::KeyPress(key(KeyCode::Left)));
        field.update(Message::KeyPress(key(KeyCode::Char('b'))));
        assert_eq!(field.value(), "abc");
        assert_eq!(field.cursor_position(), 2);
    }

    #[test]
    fn word_deletion() {
        let mut field = focused("find in page");
        assert_eq!(changed(field.update(Message::KeyPress(ctrl(KeyCode::Char('w'))))).as_deref(), Some("find in "));
        field.update(Message::KeyPress(key(KeyCode::Home)));
        assert_eq!(changed(field.update(Message::KeyPress(alt(KeyCode::Char('d'))))).as_deref(), Some(" in "));
    }

    #[test]
    fn word_motion() {
        let mut field = focused("find in page");
        field.update(Message::KeyPress(ctrl(KeyCode::Left)));
        assert_eq!(field.cursor_position(), 8);
        field.update(Message::KeyPress(alt(KeyCode::Left)));
        assert_eq!(field.cursor_position(), 5);
        field.update(Message::KeyPress(ctrl(KeyCode::Right)));
        assert_eq!(field.cursor_position(), 7);
    }

    #[test]
    fn kill_to_start_and_end() {
        let mut field = focused("hello world");
        for _ in 0..6 {
            field.update(Message::KeyPress(key(KeyCode::Left)));
        }
        field.update(Message::KeyPress(ctrl(KeyCode::Char('k'))));
        assert_eq!(field.value(), "hello");
        field.update(Message::KeyPress(ctrl(KeyCode::Char('u'))));
        assert_eq!(field.value(), "");
        assert!(field.update(Message::KeyPress(ctrl(KeyCode::Char('u')))).is_none());
    }

    #[test]
    fn undo_and_redo_report_changes() {
        let mut field = focused("");
        field.update(Message::KeyPress(key(KeyCode::Char('a'))));
        field.update(Message::KeyPress(key(KeyCode::Char('b'))));
        assert_eq!(changed(field.update(Message::KeyPress(ctrl(KeyCode::Char('z'))))).as_deref(), Some("a"));
        assert_eq!(changed(field.update(Message::KeyPress(ctrl(KeyCode::Char('y'))))).as_deref(), Some("ab"));
    }

    #[test]
    fn undo_on_empty_stack_is_noop() {
        let mut field = QueryField::new("");
        field.focus();
        assert!(field.update(Message::KeyPress(ctrl(KeyCode::Char('z')))).is_none());
    }

    #[test]
    fn paste_drops_line_breaks_and_respects_limit() {
        let mut field = QueryField::new("").with_char_limit(5);
        field.focus();
        let cmd = field.update(Message::Paste("ab\ncd\r\nef".into()));
        assert_eq!(changed(cmd).as_deref(), Some("abcde"));
        assert!(field.update(Message::KeyPress(key(KeyCode::Char('z')))).is_none());
    }

    #[test]
    fn unfocused_ignores_input() {
        let mut field = QueryField::new("");
        assert!(field.update(Message::KeyPress(key(KeyCode::Char('a')))).is_none());
        assert!(field.update(Message::Paste("x".into())).is_none());
        assert!(field.is_empty());
    }

    #[test]
    fn multibyte_editing() {
        let mut field = focused("café");
        field.update(Message::KeyPress(key(KeyCode::Backspace)));
        assert_eq!(field.value(), "caf");
    }

    #[test]
    fn placeholder_when_unfocused_and_empty() {
        let field = QueryField::new("Find");
        let buf = render_component(&field, 8, 1);
        assert_eq!(row_string(&buf, 0), "Find    ");
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let field = focused("abcdefghij");
        let buf = render_component(&field, 5, 1);
        // Four trailing characters plus the cursor cell.
        assert_eq!(row_string(&buf, 0), "ghij ");
    }
}
