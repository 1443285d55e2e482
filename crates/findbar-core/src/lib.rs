//! Core runtime for the **findbar** workspace.
//!
//! `findbar-core` provides the traits, types, and runtime behind the find bar
//! widget and the applications that host it. The design follows the
//! [Elm Architecture]: state changes happen in `update`, rendering in `view`,
//! and side effects are described by [`Command`]s.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view / on_event) |
//! | [`Component`] | Reusable sub-model that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Side effect executed by the runtime |
//! | [`Program`] | Wires a [`Model`] to a real terminal and drives the event loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for models and components |
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{OutputTarget, Program, ProgramError, ProgramHandle, ProgramOptions};

/// Run an application with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
