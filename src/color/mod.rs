use serde::Serialize;

mod model;
mod names;

pub use model::{Rgb, hex_to_rgb, rgb_to_hsl};
pub use names::{ColorNamer, NamedColorTable, nearest_color_name};

/// Everything the popup shows for one picked color
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorReading {
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
    pub name: String,
}

impl ColorReading {
    pub fn describe(hex: &str, namer: Option<&dyn ColorNamer>) -> Self {
        let rgb = hex_to_rgb(hex).to_string();
        let hsl = rgb_to_hsl(&rgb).to_string();
        Self {
            hex: hex.to_string(),
            rgb,
            hsl,
            name: nearest_color_name(hex, namer),
        }
    }

    /// The swatch color; black for anything unparseable
    pub fn swatch(&self) -> Rgb {
        hex_to_rgb(&self.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_fills_every_field() {
        let table = NamedColorTable::css();
        let reading = ColorReading::describe("#2ECC71", Some(&table));
        assert_eq!(reading.hex, "#2ECC71");
        assert_eq!(reading.rgb, "rgb(46, 204, 113)");
        assert_eq!(reading.hsl, "hsl(145, 63%, 49%)");
        assert!(!reading.name.is_empty());
    }

    #[test]
    fn describe_without_table() {
        let reading = ColorReading::describe("#000000", None);
        assert_eq!(reading.name, "N/A");
    }

    #[test]
    fn describe_is_deterministic() {
        let a = ColorReading::describe("#123456", None);
        let b = ColorReading::describe("#123456", None);
        assert_eq!(a, b);
    }

    #[test]
    fn reading_serializes_as_flat_object() {
        let reading = ColorReading::describe("#FFFFFF", None);
        let value = serde_json::to_value(&reading).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "hex": "#FFFFFF",
                "rgb": "rgb(255, 255, 255)",
                "hsl": "hsl(0, 0%, 100%)",
                "name": "N/A",
            })
        );
    }
}
