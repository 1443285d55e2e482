use crossterm::event::{KeyEvent, MouseEvent};

/// Terminal input delivered to [`Model::on_event`](crate::Model::on_event).
///
/// Each variant wraps the corresponding [`crossterm::event::Event`] payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event (only delivered when mouse capture is enabled).
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Terminal window gained focus.
    FocusGained,
    /// Terminal window lost focus.
    FocusLost,
    /// Bracketed paste content.
    Paste(String),
}

impl From<crossterm::event::Event> for TerminalEvent {
    fn from(event: crossterm::event::Event) -> Self {
        match event {
            crossterm::event::Event::Key(k) => TerminalEvent::Key(k),
            crossterm::event::Event::Mouse(m) => TerminalEvent::Mouse(m),
            crossterm::event::Event::Resize(w, h) => TerminalEvent::Resize(w, h),
            crossterm::event::Event::FocusGained => TerminalEvent::FocusGained,
            crossterm::event::Event::FocusLost => TerminalEvent::FocusLost,
            crossterm::event::Event::Paste(s) => TerminalEvent::Paste(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{Event, KeyCode, KeyModifiers};

    #[test]
    fn converts_crossterm_events() {
        let key = KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL);
        assert_eq!(TerminalEvent::from(Event::Key(key)), TerminalEvent::Key(key));
        assert_eq!(
            TerminalEvent::from(Event::Resize(80, 24)),
            TerminalEvent::Resize(80, 24)
        );
        assert_eq!(
            TerminalEvent::from(Event::Paste("needle".into())),
            TerminalEvent::Paste("needle".into())
        );
    }
}
