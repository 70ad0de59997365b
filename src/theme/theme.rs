use crate::color::Rgb;

/// Colors for every part of the popup
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Popup chrome
    pub background: Rgb,
    pub foreground: Rgb,
    pub muted: Rgb,
    pub accent: Rgb,
    pub border: Rgb,
    pub selection: Rgb,

    // Buttons and menus
    pub button_bg: Rgb,
    pub button_fg: Rgb,
    pub menu_bg: Rgb,
    pub menu_fg: Rgb,

    // Toasts
    pub toast_ok: Rgb,
    pub toast_error: Rgb,
    pub toast_fg: Rgb,
}

impl Theme {
    /// Gruvbox Dark - warm retro theme
    pub fn gruvbox_dark() -> Self {
        Self {
            name: "gruvbox-dark".to_string(),
            background: Rgb::from_u24(0x282828),
            foreground: Rgb::from_u24(0xebdbb2),
            muted: Rgb::from_u24(0x928374),
            accent: Rgb::from_u24(0xfe8019),
            border: Rgb::from_u24(0x504945),
            selection: Rgb::from_u24(0x504945),

            button_bg: Rgb::from_u24(0x3c3836),
            button_fg: Rgb::from_u24(0xfabd2f),
            menu_bg: Rgb::from_u24(0x1d2021),
            menu_fg: Rgb::from_u24(0xebdbb2),

            toast_ok: Rgb::from_u24(0x98971a),
            toast_error: Rgb::from_u24(0xcc241d),
            toast_fg: Rgb::from_u24(0xfbf1c7),
        }
    }

    /// Gruvbox Light
    pub fn gruvbox_light() -> Self {
        Self {
            name: "gruvbox-light".to_string(),
            background: Rgb::from_u24(0xfbf1c7),
            foreground: Rgb::from_u24(0x3c3836),
            muted: Rgb::from_u24(0x928374),
            accent: Rgb::from_u24(0xd65d0e),
            border: Rgb::from_u24(0xd5c4a1),
            selection: Rgb::from_u24(0xebdbb2),

            button_bg: Rgb::from_u24(0xebdbb2),
            button_fg: Rgb::from_u24(0xb57614),
            menu_bg: Rgb::from_u24(0xf2e5bc),
            menu_fg: Rgb::from_u24(0x3c3836),

            toast_ok: Rgb::from_u24(0x79740e),
            toast_error: Rgb::from_u24(0x9d0006),
            toast_fg: Rgb::from_u24(0xfbf1c7),
        }
    }

    /// Nord - arctic, north-bluish color palette
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            background: Rgb::from_u24(0x2e3440),
            foreground: Rgb::from_u24(0xd8dee9),
            muted: Rgb::from_u24(0x616e88),
            accent: Rgb::from_u24(0x88c0d0),
            border: Rgb::from_u24(0x4c566a),
            selection: Rgb::from_u24(0x434c5e),

            button_bg: Rgb::from_u24(0x3b4252),
            button_fg: Rgb::from_u24(0x88c0d0),
            menu_bg: Rgb::from_u24(0x3b4252),
            menu_fg: Rgb::from_u24(0xeceff4),

            toast_ok: Rgb::from_u24(0xa3be8c),
            toast_error: Rgb::from_u24(0xbf616a),
            toast_fg: Rgb::from_u24(0x2e3440),
        }
    }

    /// Dracula - dark theme with vibrant colors
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            background: Rgb::from_u24(0x282a36),
            foreground: Rgb::from_u24(0xf8f8f2),
            muted: Rgb::from_u24(0x6272a4),
            accent: Rgb::from_u24(0xbd93f9),
            border: Rgb::from_u24(0x44475a),
            selection: Rgb::from_u24(0x44475a),

            button_bg: Rgb::from_u24(0x44475a),
            button_fg: Rgb::from_u24(0x50fa7b),
            menu_bg: Rgb::from_u24(0x21222c),
            menu_fg: Rgb::from_u24(0xf8f8f2),

            toast_ok: Rgb::from_u24(0x50fa7b),
            toast_error: Rgb::from_u24(0xff5555),
            toast_fg: Rgb::from_u24(0x282a36),
        }
    }

    /// Solarized Dark
    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark".to_string(),
            background: Rgb::from_u24(0x002b36),
            foreground: Rgb::from_u24(0x839496),
            muted: Rgb::from_u24(0x586e75),
            accent: Rgb::from_u24(0x268bd2),
            border: Rgb::from_u24(0x586e75),
            selection: Rgb::from_u24(0x073642),

            button_bg: Rgb::from_u24(0x073642),
            button_fg: Rgb::from_u24(0xb58900),
            menu_bg: Rgb::from_u24(0x073642),
            menu_fg: Rgb::from_u24(0x93a1a1),

            toast_ok: Rgb::from_u24(0x859900),
            toast_error: Rgb::from_u24(0xdc322f),
            toast_fg: Rgb::from_u24(0xfdf6e3),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::gruvbox_dark()
    }
}
