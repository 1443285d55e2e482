//! Key bindings for the find bar's navigation and close actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key binding that maps one or more key combinations to a described action.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The set of key combinations that trigger this binding.
    pub keys: Vec<KeyCombination>,
    /// A human-readable description of the action this binding performs.
    pub description: String,
    /// Whether this binding is currently active. Disabled bindings never match.
    pub enabled: bool,
}

/// A single key press with modifier keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    /// The base key code.
    pub code: KeyCode,
    /// Modifier keys that must be held alongside the base key.
    pub modifiers: KeyModifiers,
}

impl Binding {
    /// Create a binding for several key combinations.
    pub fn with_keys(keys: Vec<KeyCombination>, description: impl Into<String>) -> Self {
        Self {
            keys,
            description: description.into(),
            enabled: true,
        }
    }

    /// Return whether the event matches one of the combinations exactly.
    ///
    /// Modifiers are compared for equality so that `Enter` and `Shift+Enter`
    /// can be bound to different actions. Always `false` when disabled.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.enabled
            && self
                .keys
                .iter()
                .any(|k| k.code == event.code && event.modifiers == k.modifiers)
    }

    /// Set whether this binding is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Short label for the first key combination, e.g. `"Ctrl+G"`.
    pub fn primary_label(&self) -> Option<String> {
        self.keys.first().map(KeyCombination::label)
    }
}

impl KeyCombination {
    /// A key with no modifiers.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// A key with the Ctrl modifier.
    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// A key with the Shift modifier.
    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    fn label(&self) -> String {
        let key = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        };
        let mut parts = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift");
        }
        parts.push(&key);
        parts.join("+")
    }
}

/// Bindings consulted by [`FindBar`](crate::find_bar::FindBar) before a key
/// reaches the query field.
#[derive(Debug, Clone)]
pub struct FindBarKeyMap {
    /// Step to the next match.
    pub find_next: Binding,
    /// Step to the previous match.
    pub find_previous: Binding,
    /// Dismiss the bar.
    pub close: Binding,
}

impl Default for FindBarKeyMap {
    fn default() -> Self {
        Self {
            find_next: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Enter),
                    KeyCombination::ctrl(KeyCode::Char('g')),
                    KeyCombination::ctrl(KeyCode::Char('n')),
                    KeyCombination::new(KeyCode::F(3)),
                ],
                "Next match",
            ),
            find_previous: Binding::with_keys(
                vec![
                    KeyCombination::shift(KeyCode::Enter),
                    KeyCombination::ctrl(KeyCode::Char('p')),
                    KeyCombination::shift(KeyCode::F(3)),
                ],
                "Previous match",
            ),
            close: Binding::with_keys(vec![KeyCombination::new(KeyCode::Esc)], "Close"),
        }
    }
}

impl FindBarKeyMap {
    /// Enable or disable both navigation bindings together.
    pub fn set_navigation_enabled(&mut self, enabled: bool) {
        self.find_next.set_enabled(enabled);
        self.find_previous.set_enabled(enabled);
    }

    /// All bindings, for help lines.
    pub fn bindings(&self) -> [&Binding; 3] {
        [&self.find_previous, &self.find_next, &self.close]
    }
}
