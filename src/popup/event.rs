use std::time::Duration;

use crate::color::ColorReading;
use crate::platform::PickError;

/// Messages delivered to the popup from outside its own event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupMessage {
    /// The background service picked a color (shortcut or context menu)
    ColorPicked(String),
    /// A background pick produced no color
    PickerError(PickError),
    /// A pick started from the popup itself completed
    PickFinished(Result<String, PickError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub duration: Duration,
}

impl Toast {
    pub fn info(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Info,
            duration,
        }
    }

    pub fn error(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            duration,
        }
    }
}

/// State changes the controller asks the presentation layer to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEvent {
    DisplayChanged(ColorReading),
    HistoryLoaded(Vec<String>),
    FavoritesLoaded(Vec<String>),
    Toast(Toast),
    Picking(bool),
}
