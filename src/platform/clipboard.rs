use std::future::Future;
use std::io::Write;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("nothing to copy")]
    Empty,
}

pub trait Clipboard: Send + Sync {
    fn write(&self, text: &str) -> impl Future<Output = Result<(), ClipboardError>> + Send;
}

/// Copies through the terminal using the OSC 52 escape sequence, which works
/// over ssh and without a display server connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        if text.is_empty() {
            return Err(ClipboardError::Empty);
        }
        let mut stdout = std::io::stdout();
        stdout.write_all(osc52_sequence(text).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// `ESC ] 52 ; c ; <base64> BEL`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}
