use serde::{Deserialize, Serialize};

/// Keys the chart surface reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Enter,
    Space,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                alt: false,
                ctrl: false,
                shift: false,
            },
        }
    }

    #[must_use]
    pub const fn alt(ch: char) -> Self {
        Self {
            key: Key::Char(ch),
            modifiers: Modifiers {
                alt: true,
                ctrl: false,
                shift: false,
            },
        }
    }
}

/// Modifier-gated shortcut letters (matched case-insensitively, with Alt).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShortcutConfig {
    pub toggle_table: char,
    pub export_png: char,
    pub export_csv: char,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            toggle_table: 't',
            export_png: 'p',
            export_csv: 'c',
        }
    }
}

/// What the host should do in response to a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Focus moved to the given data point index.
    FocusMoved(usize),
    /// Read the focused point aloud via the live region.
    Announce(usize),
    ToggleTable,
    ExportPng,
    ExportCsv,
    /// Focus left the data points.
    Cleared,
    Ignored,
}

/// Keyboard focus over the data points of one chart.
///
/// Focus indexes rows of the chart's data table, so the announced point is
/// always one the table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusState {
    focused: Option<usize>,
}

impl FocusState {
    #[must_use]
    pub fn focused(self) -> Option<usize> {
        self.focused
    }

    /// Keeps focus inside `0..point_count` after the data changed.
    pub fn clamp_to(&mut self, point_count: usize) {
        self.focused = match (self.focused, point_count) {
            (_, 0) => None,
            (Some(index), count) => Some(index.min(count - 1)),
            (None, _) => None,
        };
    }

    pub fn handle(
        &mut self,
        input: KeyInput,
        point_count: usize,
        shortcuts: ShortcutConfig,
    ) -> KeyAction {
        if input.modifiers.alt {
            return match input.key {
                Key::Char(ch) => shortcut_action(ch, shortcuts),
                _ => KeyAction::Ignored,
            };
        }
        if point_count == 0 {
            self.focused = None;
            return KeyAction::Ignored;
        }

        let last = point_count - 1;
        let next = match (input.key, self.focused) {
            (Key::ArrowRight | Key::ArrowDown, None) => 0,
            (Key::ArrowRight | Key::ArrowDown, Some(index)) => (index + 1).min(last),
            (Key::ArrowLeft | Key::ArrowUp, None) => 0,
            (Key::ArrowLeft | Key::ArrowUp, Some(index)) => index.saturating_sub(1),
            (Key::Home, _) => 0,
            (Key::End, _) => last,
            (Key::Enter | Key::Space, focused) => {
                let index = focused.unwrap_or(0).min(last);
                self.focused = Some(index);
                return KeyAction::Announce(index);
            }
            (Key::Escape, _) => {
                self.focused = None;
                return KeyAction::Cleared;
            }
            (Key::Char(_), _) => return KeyAction::Ignored,
        };
        self.focused = Some(next);
        KeyAction::FocusMoved(next)
    }
}

fn shortcut_action(ch: char, shortcuts: ShortcutConfig) -> KeyAction {
    let pressed = ch.to_ascii_lowercase();
    if pressed == shortcuts.toggle_table.to_ascii_lowercase() {
        KeyAction::ToggleTable
    } else if pressed == shortcuts.export_png.to_ascii_lowercase() {
        KeyAction::ExportPng
    } else if pressed == shortcuts.export_csv.to_ascii_lowercase() {
        KeyAction::ExportCsv
    } else {
        KeyAction::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::{FocusState, Key, KeyAction, KeyInput, ShortcutConfig};

    #[test]
    fn arrows_clamp_at_edges() {
        let mut focus = FocusState::default();
        let shortcuts = ShortcutConfig::default();
        assert_eq!(
            focus.handle(KeyInput::plain(Key::ArrowLeft), 3, shortcuts),
            KeyAction::FocusMoved(0)
        );
        focus.handle(KeyInput::plain(Key::End), 3, shortcuts);
        assert_eq!(
            focus.handle(KeyInput::plain(Key::ArrowRight), 3, shortcuts),
            KeyAction::FocusMoved(2)
        );
    }

    #[test]
    fn clamp_drops_focus_for_empty_tables() {
        let mut focus = FocusState::default();
        focus.handle(KeyInput::plain(Key::End), 5, ShortcutConfig::default());
        focus.clamp_to(2);
        assert_eq!(focus.focused(), Some(1));
        focus.clamp_to(0);
        assert_eq!(focus.focused(), None);
    }
}
