use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        // Terminals report shifted letters with SHIFT set; the char already says it
        let modifiers = match code {
            KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        Self { code, modifiers }
    }

    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn alt(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::ALT)
    }

    pub fn code(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Parse `x`, `<C-c>`, `<A-p>`, `<Tab>`, `<Del>` and friends
    pub fn parse(notation: &str) -> Option<Self> {
        let Some(inner) = notation
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
        else {
            let mut chars = notation.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Self::char(c)),
                _ => None,
            };
        };

        let mut modifiers = KeyModifiers::NONE;
        let mut rest = inner;
        loop {
            if let Some(r) = rest.strip_prefix("C-") {
                modifiers |= KeyModifiers::CONTROL;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("A-") {
                modifiers |= KeyModifiers::ALT;
                rest = r;
            } else {
                break;
            }
        }

        let code = match rest {
            "Tab" => KeyCode::Tab,
            "Enter" | "CR" => KeyCode::Enter,
            "Esc" => KeyCode::Esc,
            "Del" => KeyCode::Delete,
            "BS" => KeyCode::Backspace,
            "Up" => KeyCode::Up,
            "Down" => KeyCode::Down,
            "Left" => KeyCode::Left,
            "Right" => KeyCode::Right,
            "Space" => KeyCode::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(Self::new(code, modifiers))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Picking
    Pick,
    ShortcutPick,
    OpenContextMenu { column: u16, row: u16 },
    ContextMenuPick,
    CloseMenu,

    // Favorites
    SaveFavorite,
    RemoveFavorite,

    // Clipboard
    CopyHex,
    CopyRgb,
    CopyHsl,
    Activate,

    // Navigation
    FocusNext,
    MoveUp,
    MoveDown,

    Quit,
}

impl Action {
    /// Look up an action by the name used in `bind(...)`
    pub fn from_name(name: &str) -> Option<Self> {
        let action = match name {
            "pick" => Action::Pick,
            "shortcut_pick" => Action::ShortcutPick,
            "context_menu" => Action::OpenContextMenu { column: 2, row: 1 },
            "save_favorite" => Action::SaveFavorite,
            "remove_favorite" => Action::RemoveFavorite,
            "copy_hex" => Action::CopyHex,
            "copy_rgb" => Action::CopyRgb,
            "copy_hsl" => Action::CopyHsl,
            "activate" => Action::Activate,
            "focus_next" => Action::FocusNext,
            "move_up" => Action::MoveUp,
            "move_down" => Action::MoveDown,
            "quit" => Action::Quit,
            _ => return None,
        };
        Some(action)
    }
}

pub struct Keymap {
    bindings: HashMap<Key, Action>,
}

impl Keymap {
    pub fn new() -> Self {
        let bindings = [
            (Key::char('p'), Action::Pick),
            (Key::alt('p'), Action::ShortcutPick),
            (Key::char('m'), Action::OpenContextMenu { column: 2, row: 1 }),
            (Key::char('s'), Action::SaveFavorite),
            (Key::char('d'), Action::RemoveFavorite),
            (Key::code(KeyCode::Delete), Action::RemoveFavorite),
            (Key::char('x'), Action::CopyHex),
            (Key::char('r'), Action::CopyRgb),
            (Key::char('l'), Action::CopyHsl),
            (Key::code(KeyCode::Enter), Action::Activate),
            (Key::code(KeyCode::Tab), Action::FocusNext),
            (Key::char('k'), Action::MoveUp),
            (Key::code(KeyCode::Up), Action::MoveUp),
            (Key::char('j'), Action::MoveDown),
            (Key::code(KeyCode::Down), Action::MoveDown),
            (Key::char('q'), Action::Quit),
            (Key::ctrl('c'), Action::Quit),
        ];
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }

    /// Defaults overridden by user binds; bad entries are logged and skipped
    pub fn with_overrides(binds: &HashMap<String, String>) -> Self {
        let mut keymap = Self::new();
        for (notation, name) in binds {
            let Some(key) = Key::parse(notation) else {
                log::warn!("ignoring bind: cannot parse key {notation:?}");
                continue;
            };
            if name == "none" {
                keymap.bindings.remove(&key);
                continue;
            }
            match Action::from_name(name) {
                Some(action) => {
                    keymap.bindings.insert(key, action);
                }
                None => log::warn!("ignoring bind {notation}: unknown action {name:?}"),
            }
        }
        keymap
    }

    pub fn lookup(&self, key: &Key) -> Option<Action> {
        self.bindings.get(key).copied()
    }

    /// First key bound to an action, for the help line
    pub fn key_for(&self, action: Action) -> Option<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| key_to_string(k))
            .collect();
        keys.sort_by_key(|k| (k.len(), k.clone()));
        keys.into_iter().next()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

pub fn key_to_string(key: &Key) -> String {
    let mut s = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        s.push_str("C-");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        s.push_str("A-");
    }
    match key.code {
        KeyCode::Char(' ') => s.push_str("Space"),
        KeyCode::Char(c) => s.push(c),
        KeyCode::Esc => s.push_str("Esc"),
        KeyCode::Enter => s.push_str("Enter"),
        KeyCode::Tab => s.push_str("Tab"),
        KeyCode::Delete => s.push_str("Del"),
        KeyCode::Left => s.push('←'),
        KeyCode::Right => s.push('→'),
        KeyCode::Up => s.push('↑'),
        KeyCode::Down => s.push('↓'),
        _ => s.push('?'),
    }
    s
}
