//! # Find in Page Example
//!
//! A read-only document viewer hosting the find bar:
//! - Ctrl+F opens the bar at the bottom of the screen and focuses it
//! - The viewer registers a [`NotificationQueue`] as the bar's listener and
//!   drains it after every update
//! - Matches are found with a case-insensitive substring scan and reported
//!   back through `set_total_results` / `set_current_result`
//! - Esc or the × button closes the bar
//!
//! Settings are read from `~/.config/findbar/config.toml` and debug logs go
//! to `findbar.log` in the system temp directory.
//!
//! Run with: `cargo run --example find_in_page`

use std::sync::{Arc, Mutex};

use findbar::config::{load_config, ConfigResult};
use findbar::crossterm::event::{KeyCode, KeyModifiers};
use findbar::logging::init_file_logger;
use findbar::ratatui::layout::{Constraint, Layout};
use findbar::ratatui::style::{Color, Modifier, Style};
use findbar::ratatui::text::{Line, Span};
use findbar::ratatui::widgets::{Block, Borders, Paragraph};
use findbar::ratatui::Frame;
use findbar::widgets::find_bar;
use findbar::widgets::{FindBar, FindBarOptions, Notification, NotificationQueue};
use findbar::{Command, Component, Model, ProgramOptions, TerminalEvent};

const PAGE: &str = "\
The find bar sits along the bottom edge of the viewer.
Type a query and every match on the page is counted.
Enter or Ctrl+G steps to the next match, Shift+Enter or Ctrl+P to the previous one.
Once there are more than five hundred matches the counter stops counting exactly.
Close the bar with Esc, or click the close button with the mouse.

A page may contain the same word many times: page, Page, PAGE.
Matching ignores ASCII case, so all three of those count.";

/// A match as (line index, byte offset, byte length).
type Match = (usize, usize, usize);

struct Flags {
    options: FindBarOptions,
    warning: Option<String>,
}

struct Viewer {
    lines: Vec<&'static str>,
    bar: FindBar,
    queue: Arc<Mutex<NotificationQueue>>,
    bar_open: bool,
    matches: Vec<Match>,
    /// 1-based index into `matches`; 0 when there are none.
    current: usize,
    status: Option<String>,
}

#[derive(Debug)]
enum Msg {
    Bar(find_bar::Message),
    OpenBar,
    Quit,
}

impl Viewer {
    fn drain_notifications(&mut self) {
        let notifications = match self.queue.lock() {
            Ok(mut queue) => queue.drain(),
            Err(poisoned) => poisoned.into_inner().drain(),
        };
        for notification in notifications {
            match notification {
                Notification::TextChanged(text) => {
                    self.matches = find_matches(&self.lines, &text);
                    self.current = usize::from(!self.matches.is_empty());
                    log::debug!("query {:?} has {} matches", text, self.matches.len());
                }
                Notification::FindNext(_) => self.step(true),
                Notification::FindPrevious(_) => self.step(false),
                Notification::Closed => {
                    self.bar_open = false;
                    self.bar.deactivate();
                    self.matches.clear();
                    self.current = 0;
                }
            }
            self.bar.set_total_results(self.matches.len());
            self.bar.set_current_result(self.current);
        }
    }

    fn step(&mut self, forward: bool) {
        let total = self.matches.len();
        if total == 0 {
            return;
        }
        self.current = if forward {
            self.current % total + 1
        } else if self.current <= 1 {
            total
        } else {
            self.current - 1
        };
    }

    fn render_line(&self, index: usize, line: &'static str) -> Line<'static> {
        let highlight = Style::default().bg(Color::Yellow).fg(Color::Black);
        let active = highlight.bg(Color::Rgb(0xe6, 0x60, 0x00)).add_modifier(Modifier::BOLD);

        let mut spans = Vec::new();
        let mut cursor = 0;
        for (n, &(row, start, len)) in self.matches.iter().enumerate() {
            if row != index {
                continue;
            }
            spans.push(Span::raw(&line[cursor..start]));
            let style = if n + 1 == self.current { active } else { highlight };
            spans.push(Span::styled(&line[start..start + len], style));
            cursor = start + len;
        }
        spans.push(Span::raw(&line[cursor..]));
        Line::from(spans)
    }
}

fn find_matches(lines: &[&str], query: &str) -> Vec<Match> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_ascii_lowercase();
    lines
        .iter()
        .enumerate()
        .flat_map(|(row, line)| {
            line.to_ascii_lowercase()
                .match_indices(&needle)
                .map(|(start, _)| (row, start, needle.len()))
                .collect::<Vec<_>>()
        })
        .collect()
}

impl Model for Viewer {
    type Message = Msg;
    type Flags = Flags;

    fn init(flags: Flags) -> (Self, Command<Msg>) {
        let queue = Arc::new(Mutex::new(NotificationQueue::default()));
        let mut bar = FindBar::with_options(flags.options);
        bar.set_listener(&queue);
        (
            Viewer {
                lines: PAGE.lines().collect(),
                bar,
                queue,
                bar_open: false,
                matches: Vec::new(),
                current: 0,
                status: flags.warning,
            },
            Command::none(),
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Bar(m) => {
                let cmd = self.bar.update(m).map(Msg::Bar);
                self.drain_notifications();
                return cmd;
            }
            Msg::OpenBar => {
                self.bar_open = true;
                self.bar.activate();
                // Re-run the previous query, as reopening a browser find bar does.
                let text = self.bar.text();
                self.bar.set_text(&text);
                self.drain_notifications();
            }
            Msg::Quit => return Command::quit(),
        }
        Command::none()
    }

    fn view(&self, frame: &mut Frame) {
        let bar_height = if self.bar_open { 3 } else { 0 };
        let [page_area, bar_area, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(bar_height),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let lines: Vec<Line> = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| self.render_line(i, line))
            .collect();
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Document "),
            ),
            page_area,
        );

        if self.bar_open {
            self.bar.view(frame, bar_area);
        }

        let help = match &self.status {
            Some(warning) => Line::styled(warning.as_str(), Style::default().fg(Color::Red)),
            None => Line::from(vec![
                Span::styled("Ctrl+F", Style::default().fg(Color::Cyan)),
                Span::raw(" find  "),
                Span::styled("Esc", Style::default().fg(Color::Cyan)),
                Span::raw(" close  "),
                Span::styled("q", Style::default().fg(Color::Cyan)),
                Span::raw(" quit"),
            ]),
        };
        frame.render_widget(Paragraph::new(help), help_area);
    }

    fn on_event(&self, event: TerminalEvent) -> Option<Msg> {
        match event {
            TerminalEvent::Key(key) => {
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::Char('c') if ctrl => Some(Msg::Quit),
                    KeyCode::Char('f') if ctrl => Some(Msg::OpenBar),
                    _ if self.bar.focused() => Some(Msg::Bar(find_bar::Message::KeyPress(key))),
                    KeyCode::Char('q') => Some(Msg::Quit),
                    _ => None,
                }
            }
            TerminalEvent::Paste(text) if self.bar.focused() => {
                Some(Msg::Bar(find_bar::Message::Paste(text)))
            }
            TerminalEvent::Mouse(mouse) if self.bar_open => {
                Some(Msg::Bar(find_bar::Message::Mouse(mouse)))
            }
            _ => None,
        }
    }
}

#[findbar::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_path = std::env::temp_dir().join("findbar.log");
    if let Err(err) = init_file_logger(&log_path, log::LevelFilter::Debug) {
        eprintln!("logging disabled: {err}");
    }

    let ConfigResult { config, warning } = load_config();
    let (bar_options, warning) = match config.find_bar_options() {
        Ok(options) => (options, warning),
        Err(err) => (FindBarOptions::default(), Some(err.to_string())),
    };

    let flags = Flags {
        options: bar_options,
        warning,
    };
    let options = ProgramOptions {
        title: Some("find in page".into()),
        ..ProgramOptions::default()
    };
    findbar::run_with::<Viewer>(flags, options).await?;
    Ok(())
}
