use crate::command::{Action, Command, CommandInner};
use crate::component::Component;
use crate::event::TerminalEvent;
use crate::model::Model;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// A headless test harness that drives a [`Model`] without a real terminal.
///
/// Synchronous commands (e.g. [`Command::message`]) are queued and flushed
/// with [`drain_messages`](TestProgram::drain_messages); futures are dropped.
///
/// ```rust,ignore
/// let mut prog = TestProgram::<Reader>::new(flags);
/// prog.event(TerminalEvent::Key(ctrl_f));
/// prog.drain_messages();
/// assert!(prog.render_string(40, 3).contains("1/3"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            quit: false,
        };
        program.collect_sync_messages(init_cmd);
        program
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect_sync_messages(cmd);
    }

    /// Offer a terminal event to [`Model::on_event`] and send the resulting
    /// message, if any. Returns whether the event was mapped.
    pub fn event(&mut self, event: TerminalEvent) -> bool {
        match self.model.on_event(event) {
            Some(msg) => {
                self.send(msg);
                true
            }
            None => false,
        }
    }

    /// Process pending synchronous messages until none are produced.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                self.collect_sync_messages(cmd);
            }
        }
    }

    /// Whether any update returned [`Command::quit`].
    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the model to a [`Buffer`] of the given dimensions.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        draw(width, height, |frame| self.model.view(frame))
    }

    /// Render the model and return the visible content as a plain string.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn collect_sync_messages(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => self.pending_messages.push(msg),
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect_sync_messages(cmd);
                }
            }
            // Async commands can't be executed synchronously in tests
            CommandInner::Future(_) => {}
        }
    }
}

/// Render a single [`Component`] into a `width` x `height` buffer whose
/// area starts at the origin.
pub fn render_component<C: Component>(component: &C, width: u16, height: u16) -> Buffer {
    draw(width, height, |frame| {
        let area = frame.area();
        component.view(frame, area);
    })
}

/// Concatenate each buffer row into a line; rows are joined with `\n`.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}

/// The text of a single buffer row.
pub fn row_string(buf: &Buffer, row: u16) -> String {
    let area: Rect = buf.area;
    (area.left()..area.right())
        .map(|x| buf[(x, row)].symbol())
        .collect()
}

fn draw(width: u16, height: u16, f: impl FnOnce(&mut ratatui::Frame)) -> Buffer {
    let backend = ratatui::backend::TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(f).unwrap();
    terminal.backend().buffer().clone()
}
