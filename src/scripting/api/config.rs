//! pipette::config - Settings, themes, and keybinds
//!
//! Usage in Rhai:
//! ```rhai
//! pipette::config::set_theme("nord");
//! pipette::config::set_sampler("hyprpicker");
//! pipette::config::set_history_capacity(8);
//! pipette::config::bind("<A-p>", "shortcut_pick");
//! ```

use rhai::plugin::*;
use std::sync::{Arc, RwLock};

use crate::config::Settings;

/// Create the config module with access to settings
pub fn create_module(settings: Arc<RwLock<Settings>>) -> rhai::Module {
    let mut module = rhai::Module::new();

    // set_theme(name: &str)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_theme", move |name: &str| {
            if let Ok(mut settings) = s.write() {
                settings.theme = name.to_string();
            }
            Ok(())
        });
    }

    // get_theme() -> String
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "get_theme",
            move || -> Result<String, Box<EvalAltResult>> {
                Ok(s.read().map(|s| s.theme.clone()).unwrap_or_default())
            },
        );
    }

    // set_history_capacity(n: i64)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_history_capacity", move |n: i64| {
            if let Ok(mut settings) = s.write() {
                settings.history_capacity = Settings::clamp_capacity(n);
            }
            Ok(())
        });
    }

    // set_favorites_capacity(n: i64)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_favorites_capacity", move |n: i64| {
            if let Ok(mut settings) = s.write() {
                settings.favorites_capacity = Settings::clamp_capacity(n);
            }
            Ok(())
        });
    }

    // set_sampler(program: &str)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_sampler", move |program: &str| {
            if let Ok(mut settings) = s.write() {
                settings.sampler = program.to_string();
            }
            Ok(())
        });
    }

    // set_sampler_args(args: Array)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_sampler_args", move |args: rhai::Array| {
            let args = args.into_iter().map(|a| a.to_string()).collect();
            if let Ok(mut settings) = s.write() {
                settings.sampler_args = args;
            }
            Ok(())
        });
    }

    // set_copy_on_pick(enabled: bool)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_copy_on_pick", move |enabled: bool| {
            if let Ok(mut settings) = s.write() {
                settings.copy_on_pick = enabled;
            }
            Ok(())
        });
    }

    // set_show_color_name(enabled: bool)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_show_color_name", move |enabled: bool| {
            if let Ok(mut settings) = s.write() {
                settings.show_color_name = enabled;
            }
            Ok(())
        });
    }

    // set_toast_duration(ms: i64)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_toast_duration", move |ms: i64| {
            if let Ok(mut settings) = s.write() {
                settings.toast_duration_ms = ms.clamp(250, 10_000) as u64;
            }
            Ok(())
        });
    }

    // bind(key: &str, action: &str)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("bind", move |key: &str, action: &str| {
            if let Ok(mut settings) = s.write() {
                settings
                    .keybinds
                    .insert(key.to_string(), action.to_string());
            }
            Ok(())
        });
    }

    // list_themes() -> Array
    module.set_native_fn(
        "list_themes",
        || -> Result<rhai::Array, Box<EvalAltResult>> {
            let themes = crate::theme::list_builtin_themes();
            Ok(themes
                .into_iter()
                .map(|s| rhai::Dynamic::from(s.to_string()))
                .collect())
        },
    );

    module
}
