//! Find-in-page toolbar.
//!
//! A one-line bar with a query field, a match counter, previous/next buttons
//! and a close button under a thin top divider. The bar does no searching
//! itself: every interaction is forwarded to a [`FindBarListener`], and the
//! listener's owner reports results back through
//! [`set_current_result`](FindBar::set_current_result) and
//! [`set_total_results`](FindBar::set_total_results).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::{Arc, Mutex};
//! use findbar_widgets::find_bar::{FindBar, NotificationQueue, Notification};
//!
//! let queue = Arc::new(Mutex::new(NotificationQueue::default()));
//! let mut bar = FindBar::new();
//! bar.set_listener(&queue);
//! bar.activate();
//!
//! // In update(), forward input, then drain the queue. The guard is dropped
//! // at the end of the `let`, before the bar is driven again:
//! //   bar.update(find_bar::Message::KeyPress(key));
//! //   let pending = queue.lock().unwrap().drain();
//! //   for n in pending { /* search, then set_total_results */ }
//! ```

use std::cell::Cell;
use std::sync::{Arc, Mutex, Weak};

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use findbar_core::command::Command;
use findbar_core::component::Component;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::button::{self, IconButton, IconButtonStyle};
use crate::key::FindBarKeyMap;
use crate::layout::{centre_row, AccessibilityNode, Control, FindBarLayout};
use crate::query_field::{self, QueryField, QueryFieldStyle};

/// Match counts above this are shown as `"{current}/500+"`.
pub const MATCH_DISPLAY_CAP: usize = 500;

/// Counter text for the given result position.
pub fn format_counter(current: usize, total: usize) -> String {
    if total > MATCH_DISPLAY_CAP {
        format!("{current}/{MATCH_DISPLAY_CAP}+")
    } else {
        format!("{current}/{total}")
    }
}

/// Whether `text` holds nothing but spaces and tabs. Line breaks count as
/// content.
fn is_blank(text: &str) -> bool {
    text.chars().all(is_horizontal_space)
}

fn is_horizontal_space(c: char) -> bool {
    c.is_whitespace()
        && !matches!(
            c,
            '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
        )
}

/// Receiver of find bar interactions, usually the object that owns the
/// searchable content.
///
/// The bar holds its listener weakly; see [`FindBar::set_listener`].
pub trait FindBarListener: Send {
    /// The query changed, by typing or through [`FindBar::set_text`].
    fn on_text_change(&mut self, bar: &FindBar, text: &str);
    /// The user asked for the previous match.
    fn on_find_previous(&mut self, bar: &FindBar, text: &str);
    /// The user asked for the next match.
    fn on_find_next(&mut self, bar: &FindBar, text: &str);
    /// The user dismissed the bar.
    fn on_close(&mut self, bar: &FindBar);
}

/// A recorded listener callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    TextChanged(String),
    FindPrevious(String),
    FindNext(String),
    Closed,
}

/// Listener that queues notifications for an Elm-style host to drain after
/// each update.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Vec<Notification>,
}

impl NotificationQueue {
    /// Take every queued notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FindBarListener for NotificationQueue {
    fn on_text_change(&mut self, _bar: &FindBar, text: &str) {
        self.pending.push(Notification::TextChanged(text.to_string()));
    }

    fn on_find_previous(&mut self, _bar: &FindBar, text: &str) {
        self.pending.push(Notification::FindPrevious(text.to_string()));
    }

    fn on_find_next(&mut self, _bar: &FindBar, text: &str) {
        self.pending.push(Notification::FindNext(text.to_string()));
    }

    fn on_close(&mut self, _bar: &FindBar) {
        self.pending.push(Notification::Closed);
    }
}

/// Colors of the bar and its controls.
#[derive(Debug, Clone)]
pub struct FindBarStyle {
    /// Query text.
    pub query: Style,
    /// Placeholder shown while the query is empty and unfocused.
    pub placeholder: Style,
    /// Match counter text.
    pub counter: Style,
    /// Enabled buttons.
    pub button: Style,
    /// Disabled buttons.
    pub button_disabled: Style,
    /// Top divider.
    pub border: Style,
    /// Fill behind everything.
    pub background: Style,
}

impl Default for FindBarStyle {
    fn default() -> Self {
        Self {
            query: Style::default().fg(Color::Rgb(0xe6, 0x60, 0x00)),
            placeholder: Style::default().fg(Color::DarkGray),
            counter: Style::default().fg(Color::Gray),
            button: Style::default(),
            button_disabled: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Rgb(0xee, 0xee, 0xee)),
            background: Style::default(),
        }
    }
}

/// Construction options for [`FindBar::with_options`].
#[derive(Debug, Clone)]
pub struct FindBarOptions {
    /// Placeholder shown in the empty, unfocused query field.
    pub placeholder: String,
    /// Maximum query length in characters.
    pub char_limit: Option<usize>,
    /// Whether [`FindBar::activate`] may give the bar focus.
    pub accepts_focus: bool,
    pub style: FindBarStyle,
    pub keys: FindBarKeyMap,
}

impl Default for FindBarOptions {
    fn default() -> Self {
        Self {
            placeholder: Control::QueryField.label().to_string(),
            char_limit: None,
            accepts_focus: true,
            style: FindBarStyle::default(),
            keys: FindBarKeyMap::default(),
        }
    }
}

/// Messages for the find bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A key press while the bar is focused.
    KeyPress(KeyEvent),
    /// A mouse event in terminal coordinates.
    Mouse(MouseEvent),
    /// Bracketed paste into the query field.
    Paste(String),
    /// Press the previous button.
    Previous,
    /// Press the next button.
    Next,
    /// Press the close button.
    Close,
}

/// The find-in-page toolbar.
pub struct FindBar {
    field: QueryField,
    previous: IconButton,
    next: IconButton,
    close: IconButton,
    counter_text: String,
    counter_hidden: bool,
    current_result: usize,
    total_results: usize,
    focus: bool,
    accepts_focus: bool,
    keys: FindBarKeyMap,
    style: FindBarStyle,
    listener: Option<Weak<Mutex<dyn FindBarListener>>>,
    last_area: Cell<Rect>,
}

impl Default for FindBar {
    fn default() -> Self {
        Self::new()
    }
}

impl FindBar {
    /// Create a bar with default options.
    pub fn new() -> Self {
        Self::with_options(FindBarOptions::default())
    }

    /// Create a bar from explicit options.
    pub fn with_options(options: FindBarOptions) -> Self {
        let style = options.style;
        let mut field = QueryField::new(options.placeholder).with_style(QueryFieldStyle {
            text: style.query,
            placeholder: style.placeholder,
            ..QueryFieldStyle::default()
        });
        if let Some(limit) = options.char_limit {
            field = field.with_char_limit(limit);
        }
        let button_style = IconButtonStyle {
            normal: style.button,
            disabled: style.button_disabled,
        };

        let mut bar = Self {
            field,
            previous: IconButton::new("‹").with_style(button_style.clone()),
            next: IconButton::new("›").with_style(button_style.clone()),
            close: IconButton::new("×").with_style(button_style),
            counter_text: format_counter(0, 0),
            counter_hidden: true,
            current_result: 0,
            total_results: 0,
            focus: false,
            accepts_focus: options.accepts_focus,
            keys: options.keys,
            style,
            listener: None,
            last_area: Cell::new(Rect::default()),
        };
        bar.set_navigation_enabled(false);
        bar
    }

    /// Register the listener. Only a weak reference is kept, so dropping the
    /// caller's `Arc` silences the bar.
    ///
    /// # Deadlocks
    ///
    /// The listener's mutex is locked for the duration of every callback.
    /// Calling [`set_text`](Self::set_text), [`update`](Component::update)
    /// or anything else that notifies while holding that lock (for example
    /// inside a `queue.lock()` drain loop) never returns. Drain into a local
    /// `Vec` and release the guard before driving the bar.
    pub fn set_listener<L: FindBarListener + 'static>(&mut self, listener: &Arc<Mutex<L>>) {
        let listener: Arc<Mutex<dyn FindBarListener>> = listener.clone();
        self.listener = Some(Arc::downgrade(&listener));
    }

    /// Forget the listener.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Index of the active match as last reported.
    pub fn current_result(&self) -> usize {
        self.current_result
    }

    /// Total matches as last reported.
    pub fn total_results(&self) -> usize {
        self.total_results
    }

    /// Store the active match index and refresh the counter. No check against
    /// the total is made.
    pub fn set_current_result(&mut self, current: usize) {
        self.current_result = current;
        self.counter_text = format_counter(self.current_result, self.total_results);
    }

    /// Store the match count, refresh the counter, and enable navigation iff
    /// there is more than one match.
    pub fn set_total_results(&mut self, total: usize) {
        self.total_results = total;
        self.counter_text = format_counter(self.current_result, self.total_results);
        self.set_navigation_enabled(total > 1);
    }

    /// The text the counter shows (even while hidden).
    pub fn counter_text(&self) -> &str {
        &self.counter_text
    }

    /// Whether the counter is hidden because the query is blank.
    pub fn is_counter_hidden(&self) -> bool {
        self.counter_hidden
    }

    /// Whether previous/next currently accept presses.
    pub fn is_navigation_enabled(&self) -> bool {
        self.previous.is_enabled() && self.next.is_enabled()
    }

    /// The current query.
    pub fn text(&self) -> String {
        self.field.value()
    }

    /// Replace the query and notify the listener exactly as a typed edit would.
    pub fn set_text(&mut self, text: &str) {
        self.field.set_value(text);
        self.text_did_change();
    }

    /// Focus the query field, then take focus for the bar. Returns whether
    /// the bar accepted focus.
    pub fn activate(&mut self) -> bool {
        self.field.focus();
        self.focus = self.accepts_focus;
        self.focus
    }

    /// Drop focus from the bar and its field.
    pub fn deactivate(&mut self) {
        self.field.blur();
        self.focus = false;
    }

    /// The control under a cell of the last rendered frame.
    pub fn control_at(&self, column: u16, row: u16) -> Option<Control> {
        self.layout(self.last_area.get()).control_at(column, row)
    }

    /// Layout of the bar when drawn into `area`.
    pub fn layout(&self, area: Rect) -> FindBarLayout {
        let width = u16::try_from(self.counter_text.width()).unwrap_or(u16::MAX);
        FindBarLayout::compute(area, width)
    }

    /// Describe every control for UI automation.
    pub fn accessibility_nodes(&self, area: Rect) -> Vec<AccessibilityNode> {
        let layout = self.layout(area);
        Control::ALL
            .into_iter()
            .map(|control| AccessibilityNode {
                control,
                identifier: control.identifier(),
                label: control.label(),
                area: layout.rect(control),
                enabled: match control {
                    Control::Previous => self.previous.is_enabled(),
                    Control::Next => self.next.is_enabled(),
                    _ => true,
                },
                hidden: control == Control::MatchCount && self.counter_hidden,
            })
            .collect()
    }

    fn set_navigation_enabled(&mut self, enabled: bool) {
        self.previous.set_enabled(enabled);
        self.next.set_enabled(enabled);
        self.keys.set_navigation_enabled(enabled);
    }

    fn text_did_change(&mut self) {
        let text = self.field.value();
        self.counter_hidden = is_blank(&text);
        log::debug!("find bar text changed ({} chars)", text.chars().count());
        self.notify(|listener, bar| listener.on_text_change(bar, &text));
    }

    fn press(&mut self, control: Control) {
        let button = match control {
            Control::Previous => &mut self.previous,
            Control::Next => &mut self.next,
            Control::Close => &mut self.close,
            Control::QueryField | Control::MatchCount => return,
        };
        if button.update(button::Message::Press).into_message() != Some(button::Message::Pressed) {
            return;
        }
        let text = self.field.value();
        log::debug!("find bar control pressed: {}", control.identifier());
        match control {
            Control::Previous => self.notify(|l, bar| l.on_find_previous(bar, &text)),
            Control::Next => self.notify(|l, bar| l.on_find_next(bar, &text)),
            _ => self.notify(|l, bar| l.on_close(bar)),
        }
    }

    fn notify(&self, f: impl FnOnce(&mut (dyn FindBarListener + 'static), &FindBar)) {
        let Some(listener) = self.listener.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        match listener.lock() {
            Ok(mut guard) => f(&mut *guard, self),
            Err(_) => log::warn!("find bar listener poisoned; notification dropped"),
        };
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.keys.close.matches(&key) {
            self.press(Control::Close);
        } else if self.keys.find_previous.matches(&key) {
            self.press(Control::Previous);
        } else if self.keys.find_next.matches(&key) {
            self.press(Control::Next);
        } else {
            self.forward_to_field(query_field::Message::KeyPress(key));
        }
    }

    fn forward_to_field(&mut self, msg: query_field::Message) {
        if let Some(query_field::Message::Changed(_)) = self.field.update(msg).into_message() {
            self.text_did_change();
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        match self.control_at(mouse.column, mouse.row) {
            Some(Control::QueryField) => {
                self.activate();
            }
            Some(control) => self.press(control),
            None => {}
        }
    }
}

impl Component for FindBar {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => {
                if self.focus {
                    self.handle_key(key);
                }
            }
            Message::Paste(text) => {
                if self.focus {
                    self.forward_to_field(query_field::Message::Paste(text));
                }
            }
            Message::Mouse(mouse) => self.handle_mouse(mouse),
            Message::Previous => self.press(Control::Previous),
            Message::Next => self.press(Control::Next),
            Message::Close => self.press(Control::Close),
        }
        Command::none()
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        self.last_area.set(area);
        if area.width == 0 || area.height == 0 {
            return;
        }
        let layout = self.layout(area);

        frame.render_widget(Block::default().style(self.style.background), area);

        self.field.view(frame, centre_row(layout.field));
        if !self.counter_hidden {
            frame.render_widget(
                Paragraph::new(self.counter_text.as_str())
                    .alignment(Alignment::Center)
                    .style(self.style.counter),
                centre_row(layout.counter),
            );
        }
        self.previous.view(frame, layout.previous);
        self.next.view(frame, layout.next);
        self.close.view(frame, layout.close);

        if layout.border.is_empty() {
            return;
        }
        // Divider is drawn last so it sits on top of the controls.
        let rule = "─".repeat(layout.border.width as usize);
        frame.render_widget(
            Paragraph::new(Line::styled(rule, self.style.border)),
            layout.border,
        );
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
