//! Drives a find bar embedded in a host model through the headless runtime.

use std::sync::{Arc, Mutex};

use findbar::crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use findbar::ratatui::layout::Rect;
use findbar::ratatui::Frame;
use findbar::testing::{row_string, TestProgram};
use findbar::widgets::find_bar;
use findbar::widgets::{FindBar, Notification, NotificationQueue};
use findbar::{Command, Component, Model, TerminalEvent};

/// Host that counts occurrences of the query in a fixed text.
struct Host {
    text: String,
    bar: FindBar,
    queue: Arc<Mutex<NotificationQueue>>,
    seen: Vec<Notification>,
    closed: bool,
}

#[derive(Debug)]
enum Msg {
    Bar(find_bar::Message),
}

impl Model for Host {
    type Message = Msg;
    type Flags = String;

    fn init(text: String) -> (Self, Command<Msg>) {
        let queue = Arc::new(Mutex::new(NotificationQueue::default()));
        let mut bar = FindBar::new();
        bar.set_listener(&queue);
        bar.activate();
        let host = Host {
            text,
            bar,
            queue,
            seen: Vec::new(),
            closed: false,
        };
        (host, Command::none())
    }

    fn update(&mut self, Msg::Bar(msg): Msg) -> Command<Msg> {
        let cmd = self.bar.update(msg).map(Msg::Bar);
        let drained = self.queue.lock().unwrap().drain();
        for notification in drained {
            match &notification {
                Notification::TextChanged(query) => {
                    let total = if query.is_empty() {
                        0
                    } else {
                        self.text.matches(query.as_str()).count()
                    };
                    self.bar.set_total_results(total);
                    self.bar.set_current_result(usize::from(total > 0));
                }
                Notification::FindNext(_) => {
                    let next = self.bar.current_result() % self.bar.total_results() + 1;
                    self.bar.set_current_result(next);
                }
                Notification::FindPrevious(_) => {}
                Notification::Closed => {
                    self.closed = true;
                    self.bar.deactivate();
                }
            }
            self.seen.push(notification);
        }
        cmd
    }

    fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        self.bar.view(frame, Rect::new(0, 0, area.width, area.height.min(3)));
    }

    fn on_event(&self, event: TerminalEvent) -> Option<Msg> {
        match event {
            TerminalEvent::Key(key) if self.bar.focused() => {
                Some(Msg::Bar(find_bar::Message::KeyPress(key)))
            }
            TerminalEvent::Paste(text) => Some(Msg::Bar(find_bar::Message::Paste(text))),
            TerminalEvent::Mouse(mouse) => Some(Msg::Bar(find_bar::Message::Mouse(mouse))),
            _ => None,
        }
    }
}

fn key(code: KeyCode) -> TerminalEvent {
    TerminalEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(prog: &mut TestProgram<Host>, text: &str) {
    for c in text.chars() {
        prog.event(key(KeyCode::Char(c)));
    }
}

#[test]
fn typing_reports_each_edit_and_updates_counter() {
    let mut prog = TestProgram::<Host>::new("a cat and a catalogue".into());
    type_text(&mut prog, "cat");

    assert_eq!(
        prog.model().seen,
        vec![
            Notification::TextChanged("c".into()),
            Notification::TextChanged("ca".into()),
            Notification::TextChanged("cat".into()),
        ]
    );
    assert_eq!(prog.model().bar.counter_text(), "1/2");
    assert!(prog.model().bar.is_navigation_enabled());

    let screen = prog.render(40, 3);
    assert_eq!(row_string(&screen, 0), "─".repeat(40));
    assert!(row_string(&screen, 1).contains(" 1/2 "));
}

#[test]
fn enter_steps_through_matches() {
    let mut prog = TestProgram::<Host>::new("ab ab ab".into());
    type_text(&mut prog, "ab");
    assert_eq!(prog.model().bar.counter_text(), "1/3");

    prog.event(key(KeyCode::Enter));
    assert_eq!(prog.model().bar.counter_text(), "2/3");
    prog.event(key(KeyCode::Enter));
    prog.event(key(KeyCode::Enter));
    assert_eq!(prog.model().bar.counter_text(), "1/3");
    assert_eq!(
        prog.model().seen.last(),
        Some(&Notification::FindNext("ab".into()))
    );
}

#[test]
fn single_match_disables_navigation() {
    let mut prog = TestProgram::<Host>::new("needle in a haystack".into());
    type_text(&mut prog, "needle");
    assert_eq!(prog.model().bar.counter_text(), "1/1");
    assert!(!prog.model().bar.is_navigation_enabled());

    let before = prog.model().seen.len();
    prog.event(key(KeyCode::Enter));
    assert_eq!(prog.model().seen.len(), before);
}

#[test]
fn capped_counter_scenario() {
    let mut prog = TestProgram::<Host>::new(String::new());
    let bar = &mut prog.model_mut().bar;
    bar.set_total_results(1000);
    bar.set_current_result(3);
    assert_eq!(bar.counter_text(), "3/500+");
    assert!(bar.is_navigation_enabled());

    bar.set_total_results(1);
    assert_eq!(bar.counter_text(), "3/1");
    assert!(!bar.is_navigation_enabled());
}

#[test]
fn escape_closes_and_releases_focus() {
    let mut prog = TestProgram::<Host>::new("text".into());
    type_text(&mut prog, "t");
    prog.event(key(KeyCode::Esc));

    assert!(prog.model().closed);
    assert!(!prog.model().bar.focused());
    assert_eq!(prog.model().seen.last(), Some(&Notification::Closed));
    assert!(!prog.event(key(KeyCode::Char('x'))));
}

#[test]
fn clicking_close_button() {
    let mut prog = TestProgram::<Host>::new("text".into());
    prog.render(40, 3);
    prog.event(TerminalEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 38,
        row: 1,
        modifiers: KeyModifiers::NONE,
    }));
    assert!(prog.model().closed);
}

#[test]
fn paste_counts_as_one_edit() {
    let mut prog = TestProgram::<Host>::new("copy paste paste".into());
    prog.event(TerminalEvent::Paste("paste".into()));
    assert_eq!(prog.model().seen, vec![Notification::TextChanged("paste".into())]);
    assert_eq!(prog.model().bar.counter_text(), "1/2");
}
