use crate::command::Command;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// `Component` mirrors [`Model`](crate::Model) except that
/// [`view`](Component::view) receives the area to draw into, so a parent
/// decides where each child goes. The find bar, its query field and its
/// buttons are all components.
///
/// # Composition pattern
///
/// Wrap the child's message type in a parent variant and lift returned
/// commands with [`Command::map`]:
///
/// ```rust,ignore
/// use findbar_core::{Command, Component, Model};
/// use findbar_widgets::find_bar::{self, FindBar};
///
/// struct Reader { bar: FindBar }
///
/// enum Msg { Bar(find_bar::Message) }
///
/// impl Model for Reader {
///     // ...
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Bar(m) => self.bar.update(m).map(Msg::Bar),
///         }
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side
    /// effects. The parent lifts the command with [`Command::map`].
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations confine all drawing to it.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently has focus.
    ///
    /// Parents use this to decide which child receives keyboard events.
    fn focused(&self) -> bool {
        false
    }
}
