use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: play outcome → Color32
// ---------------------------------------------------------------------------

/// Maps every outcome in the dataset to a distinct colour, so the same
/// outcome looks the same in all three charts.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new(outcomes: &BTreeSet<String>) -> Self {
        let palette = generate_palette(outcomes.len());
        ColorMap {
            mapping: outcomes.iter().cloned().zip(palette).collect(),
        }
    }

    /// Look up the colour for an outcome; unknown outcomes are gray.
    pub fn color_for(&self, outcome: &str) -> Color32 {
        self.mapping.get(outcome).copied().unwrap_or(Color32::GRAY)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        let unique: BTreeSet<[u8; 4]> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 6);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_color_map_lookup() {
        let outcomes: BTreeSet<String> =
            ["Out", "Single", "Triple"].iter().map(|s| s.to_string()).collect();
        let cm = ColorMap::new(&outcomes);
        assert_eq!(cm.len(), 3);
        assert_ne!(cm.color_for("Out"), cm.color_for("Single"));
        assert_eq!(cm.color_for("Out"), cm.color_for("Out"));
        assert_eq!(cm.color_for("Balk"), Color32::GRAY);
    }
}
