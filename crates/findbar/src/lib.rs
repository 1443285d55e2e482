//! **findbar** -- a find-in-page toolbar for [`ratatui`] applications.
//!
//! This umbrella crate re-exports everything needed to host the bar:
//!
//! * All public items from [`findbar_core`] at the crate root ([`Model`],
//!   [`Component`], [`Command`], [`Program`], [`run`], ...).
//! * The [`widgets`] module with [`FindBar`](widgets::FindBar) and its
//!   controls.
//! * [`config`] for the optional TOML file and [`logging`] for file logs.
//! * [`ratatui`], [`crossterm`], and [`tokio`].
//!
//! The bar never searches anything itself. The host registers a
//! [`FindBarListener`](widgets::FindBarListener) (or the ready-made
//! [`NotificationQueue`](widgets::NotificationQueue)), reacts to the
//! notifications, and reports results back with
//! [`set_current_result`](widgets::FindBar::set_current_result) and
//! [`set_total_results`](widgets::FindBar::set_total_results).

pub mod config;
pub mod logging;

pub use findbar_core::*;
pub mod widgets {
    pub use findbar_widgets::*;
}

pub use crossterm;
pub use ratatui;
pub use tokio;
