//! The popup: what it shows, and the operations behind its buttons and lists.

mod controller;
mod event;
mod state;

pub use controller::PopupController;
pub use event::{PopupEvent, PopupMessage, ToastKind};
pub use state::{CONTEXT_MENU_ENTRY, ContextMenu, Focus, PopupState};
