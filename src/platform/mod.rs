//! Host capabilities: screen sampling, clipboard, and notifications between
//! the background service and the popup.

mod clipboard;
mod messaging;
mod sampler;

pub use clipboard::{Clipboard, Osc52Clipboard};
pub use messaging::Notifier;
pub use sampler::{CommandSampler, PickError, Sampler};
