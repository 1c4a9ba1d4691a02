use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Season;

pub const LINE: Color32 = Color32::from_rgb(0x00, 0x7B, 0xFF);
pub const MARKER: Color32 = Color32::from_rgb(0xFF, 0x57, 0x33);
pub const CASUAL: Color32 = Color32::from_rgb(0x98, 0xDF, 0x8A);
pub const REGISTERED: Color32 = Color32::from_rgb(0xA4, 0xC8, 0xE1);
pub const HOUR_BAR: Color32 = Color32::from_rgb(0x72, 0xBC, 0xD4);

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
            let hsl = Hsl::new(hue, 0.65, 0.6);
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
// Season colours
// ---------------------------------------------------------------------------

/// One stable colour per season, independent of which seasons are present.
#[derive(Debug, Clone)]
pub struct SeasonColors {
    mapping: BTreeMap<Season, Color32>,
}

impl Default for SeasonColors {
    fn default() -> Self {
        let mapping = Season::ALL
            .into_iter()
            .zip(generate_palette(Season::ALL.len()))
            .collect();
        Self { mapping }
    }
}

impl SeasonColors {
    pub fn color_for(&self, season: Season) -> Color32 {
        self.mapping.get(&season).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn every_season_has_a_colour() {
        let colors = SeasonColors::default();
        for season in Season::ALL {
            assert_ne!(colors.color_for(season), Color32::GRAY);
        }
    }
}
