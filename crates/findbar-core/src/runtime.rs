use crate::command::{Action, Command, CommandInner};
use crate::event::TerminalEvent;
use crate::model::Model;
use crossterm::{
    cursor,
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        EventStream,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stderr, stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Output target for the terminal UI.
///
/// Switch to [`Stderr`](OutputTarget::Stderr) when stdout is piped so the UI
/// still reaches the terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout (default).
    #[default]
    Stdout,
    /// Write to stderr.
    Stderr,
}

type Writer = Box<dyn Write + Send>;

fn open_writer(target: OutputTarget) -> Writer {
    match target {
        OutputTarget::Stdout => Box::new(stdout()),
        OutputTarget::Stderr => Box::new(stderr()),
    }
}

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration options for a [`Program`].
///
/// Override only what you need with struct update syntax:
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     mouse_capture: true,
///     title: Some("find in page".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Target frames per second (default: 60, clamped to 1..=120).
    pub fps: u32,
    /// Start in the alternate screen (default: true).
    pub alt_screen: bool,
    /// Capture mouse clicks so buttons can be pressed (default: true).
    pub mouse_capture: bool,
    /// Enable bracketed paste (default: true).
    pub bracketed_paste: bool,
    /// Set the terminal title.
    pub title: Option<String>,
    /// Restore the terminal before the default panic hook runs (default: true).
    pub catch_panics: bool,
    /// Quit on ctrl-c delivered as a signal (default: true).
    pub handle_signals: bool,
    /// Output target: stdout (default) or stderr.
    pub output: OutputTarget,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse_capture: true,
            bracketed_paste: true,
            title: None,
            catch_panics: true,
            handle_signals: true,
            output: OutputTarget::default(),
        }
    }
}

/// A cloneable handle to a running [`Program`].
///
/// [`send`](ProgramHandle::send) injects a message from another task and
/// [`kill`](ProgramHandle::kill) stops the loop at the next iteration.
#[derive(Clone)]
pub struct ProgramHandle<Msg: Send + 'static> {
    msg_tx: mpsc::UnboundedSender<Msg>,
    killed: Arc<AtomicBool>,
}

impl<Msg: Send + 'static> ProgramHandle<Msg> {
    /// Send a message to the running program. Silently dropped after exit.
    pub fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    /// Force the program to exit without processing queued messages.
    pub fn kill(&self) {
        self.killed.store(true, Ordering::SeqCst);
    }
}

/// The program runtime. Owns the terminal and drives the [`Model`]
/// lifecycle until the model returns [`Command::quit`].
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let model = Program::<Reader>::new(flags)?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<CrosstermBackend<Writer>>,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    options: ProgramOptions,
    needs_redraw: bool,
    should_quit: bool,
    killed: Arc<AtomicBool>,
}

impl<M: Model> Program<M> {
    /// Create a new program with default options.
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Create a new program with custom options.
    ///
    /// Returns an error if terminal initialization fails.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (model, init_cmd) = M::init(flags);
        let terminal = init_terminal(&options)?;

        let mut program = Self {
            model,
            terminal,
            msg_tx,
            msg_rx,
            options,
            needs_redraw: true,
            should_quit: false,
            killed: Arc::new(AtomicBool::new(false)),
        };
        log::debug!("program initialized");

        program.execute_command(init_cmd);
        Ok(program)
    }

    /// Get a handle for external control (send messages, force-kill).
    pub fn handle(&self) -> ProgramHandle<M::Message> {
        ProgramHandle {
            msg_tx: self.msg_tx.clone(),
            killed: self.killed.clone(),
        }
    }

    /// Run the program until quit and return the final model.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let result = self.event_loop().await;
        log::debug!("shutting down");
        restore_terminal(&self.options)?;
        result.map(|()| self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.render()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let handle_signals = self.options.handle_signals;
        let mut events = EventStream::new();

        loop {
            if self.killed.load(Ordering::SeqCst) {
                return Ok(());
            }

            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    log::debug!("received ctrl+c signal");
                    return Ok(());
                }

                Some(event) = events.next() => self.handle_terminal_event(event),

                Some(msg) = self.msg_rx.recv() => self.drain_queue(msg),

                _ = frame_interval.tick(), if self.needs_redraw => {
                    self.render()?;
                    self.needs_redraw = false;
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn handle_terminal_event(&mut self, event: io::Result<crossterm::event::Event>) {
        let event = match event {
            Ok(event) => TerminalEvent::from(event),
            Err(err) => {
                log::warn!("terminal event error: {err}");
                return;
            }
        };
        if let TerminalEvent::Resize(..) = event {
            self.needs_redraw = true;
        }
        if let Some(msg) = self.model.on_event(event) {
            self.process_message(msg);
        }
    }

    /// Process `first` and everything already queued behind it, stopping
    /// early on quit.
    fn drain_queue(&mut self, first: M::Message) {
        self.process_message(first);
        while !self.should_quit {
            match self.msg_rx.try_recv() {
                Ok(msg) => self.process_message(msg),
                Err(_) => break,
            }
        }
    }

    fn process_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute_command(cmd);
        self.needs_redraw = true;
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Action(Action::Quit) => {
                log::debug!("quit requested");
                self.should_quit = true;
            }
            CommandInner::Future(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let msg = fut.await;
                    let _ = tx.send(msg);
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
        }
    }

    fn render(&mut self) -> Result<(), ProgramError> {
        self.terminal.draw(|frame| {
            self.model.view(frame);
        })?;
        Ok(())
    }
}

fn init_terminal(options: &ProgramOptions) -> Result<Terminal<CrosstermBackend<Writer>>, ProgramError> {
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let snapshot = options.clone();
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal(&snapshot);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = open_writer(options.output);

    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    if options.bracketed_paste {
        execute!(writer, EnableBracketedPaste)?;
    }
    if options.mouse_capture {
        execute!(writer, EnableMouseCapture)?;
    }
    if let Some(ref title) = options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;

    let backend = CrosstermBackend::new(writer);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(options: &ProgramOptions) -> Result<(), io::Error> {
    // Best effort: keep restoring even if a step fails, report raw mode only.
    let raw = disable_raw_mode();
    let mut writer = open_writer(options.output);
    execute!(writer, DisableBracketedPaste).ok();
    execute!(writer, DisableMouseCapture).ok();
    execute!(writer, cursor::Show).ok();
    if options.alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = ProgramOptions::default();
        assert_eq!(opts.fps, 60);
        assert!(opts.alt_screen);
        assert!(opts.mouse_capture);
        assert_eq!(opts.output, OutputTarget::Stdout);
    }

    #[test]
    fn program_error_wraps_io() {
        let err = ProgramError::from(io::Error::new(io::ErrorKind::Other, "tty gone"));
        assert_eq!(err.to_string(), "IO error: tty gone");
    }
}
