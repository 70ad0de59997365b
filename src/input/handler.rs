use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

use super::keymap::{Action, Key, Keymap};
use crate::popup::{ContextMenu, PopupState};

/// Translate a terminal event into a popup action. Pure, the caller runs it.
pub fn handle_event(state: &PopupState, keymap: &Keymap, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, keymap, key),
        Event::Mouse(mouse) => handle_mouse(state, mouse),
        // Resize is handled by the renderer
        _ => None,
    }
}

fn handle_key(state: &PopupState, keymap: &Keymap, key: KeyEvent) -> Option<Action> {
    if state.context_menu.is_some() {
        return handle_menu_key(key);
    }
    keymap.lookup(&Key::new(key.code, key.modifiers))
}

fn handle_menu_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::ContextMenuPick),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseMenu),
        _ => None,
    }
}

fn handle_mouse(state: &PopupState, mouse: MouseEvent) -> Option<Action> {
    let MouseEventKind::Down(button) = mouse.kind else {
        return None;
    };

    match (state.context_menu, button) {
        (Some(menu), MouseButton::Left) => Some(menu_click(menu, mouse)),
        (_, MouseButton::Right) => Some(Action::OpenContextMenu {
            column: mouse.column,
            row: mouse.row,
        }),
        (Some(_), _) => Some(Action::CloseMenu),
        (None, _) => None,
    }
}

fn menu_click(menu: ContextMenu, mouse: MouseEvent) -> Action {
    if menu.entry_hit(mouse.column, mouse.row) {
        Action::ContextMenuPick
    } else {
        Action::CloseMenu
    }
}
