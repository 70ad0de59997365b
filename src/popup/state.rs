use std::time::Instant;

use super::event::{PopupEvent, Toast};
use crate::color::ColorReading;

/// Which part of the popup receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    PickButton,
    History,
    Favorites,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::PickButton => Focus::History,
            Focus::History => Focus::Favorites,
            Focus::Favorites => Focus::PickButton,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveToast {
    pub toast: Toast,
    pub shown_at: Instant,
}

impl ActiveToast {
    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= self.toast.duration
    }
}

/// Screen position of an open context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextMenu {
    pub column: u16,
    pub row: u16,
}

pub const CONTEXT_MENU_ENTRY: &str = "Pick Color with Pipette";

impl ContextMenu {
    /// Border plus one space of padding each side
    pub const WIDTH: u16 = CONTEXT_MENU_ENTRY.len() as u16 + 4;
    pub const HEIGHT: u16 = 3;

    /// Keep the whole menu on a `cols` x `rows` screen
    pub fn clamped(self, cols: u16, rows: u16) -> Self {
        Self {
            column: self.column.min(cols.saturating_sub(Self::WIDTH)),
            row: self.row.min(rows.saturating_sub(Self::HEIGHT)),
        }
    }

    /// Whether a click at this cell lands on the menu entry
    pub fn entry_hit(&self, column: u16, row: u16) -> bool {
        row == self.row + 1 && column >= self.column && column < self.column + Self::WIDTH
    }
}

/// Everything the renderer draws. Only changes through [`PopupState::apply`]
/// and the navigation helpers.
#[derive(Debug, Clone)]
pub struct PopupState {
    pub display: Option<ColorReading>,
    pub history: Vec<String>,
    pub favorites: Vec<String>,
    pub toast: Option<ActiveToast>,
    pub focus: Focus,
    pub selected: usize,
    pub picking: bool,
    pub context_menu: Option<ContextMenu>,
    pub running: bool,
}

impl PopupState {
    pub fn new() -> Self {
        Self {
            display: None,
            history: Vec::new(),
            favorites: Vec::new(),
            toast: None,
            focus: Focus::default(),
            selected: 0,
            picking: false,
            context_menu: None,
            running: true,
        }
    }

    pub fn apply(&mut self, event: PopupEvent, now: Instant) {
        match event {
            PopupEvent::DisplayChanged(reading) => self.display = Some(reading),
            PopupEvent::HistoryLoaded(history) => {
                self.history = history;
                self.clamp_selection();
            }
            PopupEvent::FavoritesLoaded(favorites) => {
                self.favorites = favorites;
                self.clamp_selection();
            }
            PopupEvent::Toast(toast) => {
                self.toast = Some(ActiveToast {
                    toast,
                    shown_at: now,
                })
            }
            PopupEvent::Picking(picking) => self.picking = picking,
        }
    }

    pub fn apply_all(&mut self, events: impl IntoIterator<Item = PopupEvent>, now: Instant) {
        for event in events {
            self.apply(event, now);
        }
    }

    /// Drop an expired toast; returns whether anything changed
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self.toast.as_ref().is_some_and(|t| t.expired(now)) {
            self.toast = None;
            return true;
        }
        false
    }

    /// The hex of the color currently on display
    pub fn current_hex(&self) -> Option<&str> {
        self.display.as_ref().map(|d| d.hex.as_str())
    }

    pub fn focused_list(&self) -> Option<&[String]> {
        match self.focus {
            Focus::PickButton => None,
            Focus::History => Some(&self.history),
            Focus::Favorites => Some(&self.favorites),
        }
    }

    /// The list entry under the selection, if a list has focus
    pub fn selected_color(&self) -> Option<&str> {
        self.focused_list()
            .and_then(|list| list.get(self.selected))
            .map(String::as_str)
    }

    pub fn selected_favorite(&self) -> Option<&str> {
        match self.focus {
            Focus::Favorites => self.selected_color(),
            _ => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        self.selected = 0;
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.focused_list().map_or(0, <[String]>::len);
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Open the menu at a click position, kept inside the screen
    pub fn open_context_menu_within(&mut self, column: u16, row: u16, screen: (u16, u16)) {
        let (cols, rows) = screen;
        self.context_menu = Some(ContextMenu { column, row }.clamped(cols, rows));
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    fn clamp_selection(&mut self) {
        let len = self.focused_list().map_or(0, <[String]>::len);
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

impl Default for PopupState {
    fn default() -> Self {
        Self::new()
    }
}
