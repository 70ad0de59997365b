//! Scripting module - Rhai runtime for configuration
//!
//! All functions are exposed under the `pipette` namespace:
//! - `pipette::config::*` - settings, themes, keybinds

mod api;
mod engine;

pub use engine::ScriptEngine;
