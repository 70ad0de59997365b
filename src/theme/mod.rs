mod theme;

pub use theme::Theme;

/// Built-in themes
pub fn default_theme() -> Theme {
    Theme::gruvbox_dark()
}

pub fn list_builtin_themes() -> Vec<&'static str> {
    vec![
        "gruvbox-dark",
        "gruvbox-light",
        "nord",
        "dracula",
        "solarized-dark",
    ]
}

pub fn get_builtin_theme(name: &str) -> Option<Theme> {
    match name {
        "gruvbox-dark" => Some(Theme::gruvbox_dark()),
        "gruvbox-light" => Some(Theme::gruvbox_light()),
        "nord" => Some(Theme::nord()),
        "dracula" => Some(Theme::dracula()),
        "solarized-dark" => Some(Theme::solarized_dark()),
        _ => None,
    }
}

/// Resolve a configured theme name, falling back to the default
pub fn resolve(name: &str) -> Theme {
    get_builtin_theme(name).unwrap_or_else(|| {
        log::warn!("unknown theme {name:?}, using {}", default_theme().name);
        default_theme()
    })
}
