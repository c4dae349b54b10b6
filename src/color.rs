use std::collections::{BTreeMap, BTreeSet};

use palette::{Hsl, IntoColor, Srgb};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

const DEFAULT_COLOR: &str = "#9e9e9e";

/// Generates `n` visually distinct `#rrggbb` colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → hex colour
// ---------------------------------------------------------------------------

/// One legend row as sent to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Maps the distinct values of a categorical attribute to distinct colours.
/// Values are keyed in sorted order so the same dataset always yields the
/// same colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, String>,
}

impl ColorMap {
    pub fn new(values: &BTreeSet<String>) -> Self {
        let mapping = values
            .iter()
            .cloned()
            .zip(generate_palette(values.len()))
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a value; unknown values get a neutral grey.
    pub fn color_for(&self, value: &str) -> &str {
        self.mapping.get(value).map(String::as_str).unwrap_or(DEFAULT_COLOR)
    }

    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        self.mapping
            .iter()
            .map(|(label, color)| LegendEntry {
                label: label.clone(),
                color: color.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct_hex() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for c in &colors {
            assert_eq!(c.len(), 7);
            assert!(c.starts_with('#'));
        }
        let unique: BTreeSet<&String> = colors.iter().collect();
        assert_eq!(unique.len(), 4);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn map_is_stable_and_has_fallback() {
        let values: BTreeSet<String> = ["FT", "B4", "v1.0"].map(String::from).into();
        let a = ColorMap::new(&values);
        let b = ColorMap::new(&values);
        assert_eq!(a.legend_entries(), b.legend_entries());
        assert_eq!(a.legend_entries()[0].label, "B4");
        assert_eq!(a.color_for("unknown"), DEFAULT_COLOR);
        assert_ne!(a.color_for("FT"), DEFAULT_COLOR);
    }
}
