//! Square glyph button used for the find bar's previous, next and close
//! controls.

use findbar_core::command::Command;
use findbar_core::component::Component;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::layout::centre_row;

/// Style configuration for a button.
#[derive(Debug, Clone)]
pub struct IconButtonStyle {
    /// Style while enabled.
    pub normal: Style,
    /// Style while disabled.
    pub disabled: Style,
}

impl Default for IconButtonStyle {
    fn default() -> Self {
        Self {
            normal: Style::default(),
            disabled: Style::default().fg(Color::DarkGray),
        }
    }
}

/// Messages for a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Activate the button (click, key binding or programmatic tap).
    Press,
    /// Emitted when an enabled button was activated.
    Pressed,
}

/// A single-glyph button. Disabled buttons swallow presses.
pub struct IconButton {
    glyph: String,
    enabled: bool,
    style: IconButtonStyle,
}

impl IconButton {
    /// Create an enabled button showing `glyph`.
    pub fn new(glyph: impl Into<String>) -> Self {
        Self {
            glyph: glyph.into(),
            enabled: true,
            style: IconButtonStyle::default(),
        }
    }

    /// Set custom styles.
    pub fn with_style(mut self, style: IconButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Whether presses are accepted.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the button.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The glyph drawn in the middle of the button.
    pub fn glyph(&self) -> &str {
        &self.glyph
    }
}

impl Component for IconButton {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Press if self.enabled => Command::message(Message::Pressed),
            Message::Press | Message::Pressed => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let style = if self.enabled {
            self.style.normal
        } else {
            self.style.disabled
        };
        frame.render_widget(
            Paragraph::new(self.glyph.as_str())
                .alignment(Alignment::Center)
                .style(style),
            centre_row(area),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findbar_core::testing::{render_component, row_string};

    #[test]
    fn enabled_button_reports_press() {
        let mut button = IconButton::new("×");
        let cmd = button.update(Message::Press);
        assert_eq!(cmd.into_message(), Some(Message::Pressed));
    }

    #[test]
    fn disabled_button_swallows_press() {
        let mut button = IconButton::new("›");
        button.set_enabled(false);
        assert!(button.update(Message::Press).is_none());
        assert!(!button.is_enabled());
    }

    #[test]
    fn glyph_is_centred() {
        let button = IconButton::new("x");
        let buf = render_component(&button, 3, 3);
        assert_eq!(row_string(&buf, 0), "   ");
        assert_eq!(row_string(&buf, 1), " x ");
        assert_eq!(row_string(&buf, 2), "   ");
    }

    #[test]
    fn disabled_style_applies() {
        let mut button = IconButton::new("x");
        button.set_enabled(false);
        let buf = render_component(&button, 3, 1);
        assert_eq!(buf[(1, 0)].fg, Color::DarkGray);
    }
}
