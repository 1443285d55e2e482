//! Widgets behind the **findbar** toolbar.
//!
//! Every widget implements [`findbar_core::Component`], so it can be embedded
//! inside any [`findbar_core::Model`] and placed freely within [`ratatui`]
//! layouts.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`find_bar`] | The find-in-page toolbar and its listener contract |
//! | [`query_field`] | Single-line query editor |
//! | [`button`] | Square glyph button with enabled state |
//! | [`layout`] | Bar geometry, hit testing and accessibility identifiers |
//! | [`key`] | Key bindings for navigation and close |

pub mod button;
pub mod find_bar;
pub mod key;
pub mod layout;
pub mod query_field;

pub use find_bar::{
    format_counter, FindBar, FindBarListener, FindBarOptions, FindBarStyle, Notification,
    NotificationQueue, MATCH_DISPLAY_CAP,
};
pub use layout::{AccessibilityNode, Control, FindBarLayout};
