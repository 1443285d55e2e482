use crate::command::Command;
use crate::event::TerminalEvent;
use ratatui::Frame;

/// The top-level application trait, following the [Elm Architecture].
///
/// The [`Program`](crate::Program) drives a continuous cycle:
///
/// 1. [`init`](Model::init) creates the initial state and may return a
///    [`Command`].
/// 2. [`view`](Model::view) renders the state to a [`ratatui::Frame`].
/// 3. Terminal input is offered to [`on_event`](Model::on_event), which maps
///    it into a message (or drops it).
/// 4. [`update`](Model::update) processes each message and may return a
///    further [`Command`].
/// 5. Steps 2 to 4 repeat until a [`Command::quit`] is returned.
///
/// [Elm Architecture]: https://guide.elm-lang.org/architecture/
pub trait Model: Sized + Send + 'static {
    /// The application's message type.
    type Message: Send + 'static;

    /// Initialization data passed to [`Model::init`]. Use `()` when none is
    /// needed.
    type Flags: Send + 'static;

    /// Create the initial model state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Process a message, mutate state, and return a command for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the current state. Called after every update that changed
    /// something and on the first frame.
    fn view(&self, frame: &mut Frame);

    /// Map a terminal event into a message.
    ///
    /// Receives `&self` so routing can depend on the current focus. The
    /// default implementation ignores every event.
    fn on_event(&self, event: TerminalEvent) -> Option<Self::Message> {
        let _ = event;
        None
    }
}
