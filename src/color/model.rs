use std::fmt;

/// An sRGB triple derived from a `#RRGGBB` string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string. The leading `#` is required.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Self::from_u24(value))
    }

    pub const fn from_u24(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Squared euclidean distance in RGB space
    pub fn distance_sq(&self, other: &Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    pub fn to_hsl(&self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        let (h, s) = if max == min {
            (0.0, 0.0)
        } else {
            let d = max - min;
            let s = if l > 0.5 {
                d / (2.0 - max - min)
            } else {
                d / (max + min)
            };
            let h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            (h / 6.0, s)
        };

        // 359.5 and up rounds onto 360, which is the same angle as 0
        let hue = (h * 360.0).round() as u16 % 360;
        Hsl {
            h: hue,
            s: (s * 100.0).round() as u8,
            l: (l * 100.0).round() as u8,
        }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }

    /// Black or white, whichever reads better on top of this color
    pub fn contrast_text(&self) -> Rgb {
        let luma = 299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32;
        if luma >= 128_000 {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Hue in degrees, saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

/// Convert a hex string to its `rgb(r, g, b)` form.
///
/// Anything that is not `#` followed by six hex digits yields black.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    Rgb::from_hex(hex).unwrap_or_default()
}

/// Convert `rgb(r, g, b)` or `rgba(r, g, b, a)` text to HSL.
///
/// Text that does not start with `rgb` or has no three leading channel
/// values yields `hsl(0, 0%, 0%)`.
pub fn rgb_to_hsl(rgb: &str) -> Hsl {
    parse_rgb_text(rgb)
        .map(|rgb| rgb.to_hsl())
        .unwrap_or_default()
}

/// Parse the first three channels out of `rgb(...)` / `rgba(...)` text.
pub fn parse_rgb_text(text: &str) -> Option<Rgb> {
    let rest = text.strip_prefix("rgb")?;
    let rest = rest.strip_prefix('a').unwrap_or(rest);
    let mut rest = rest.strip_prefix('(')?;

    let mut channels = [0u8; 3];
    for (i, channel) in channels.iter_mut().enumerate() {
        if i > 0 {
            rest = rest.strip_prefix(',')?.trim_start();
        }
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        *channel = rest[..end].parse().ok()?;
        rest = &rest[end..];
    }

    Some(Rgb::new(channels[0], channels[1], channels[2]))
}
