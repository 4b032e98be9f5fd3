use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::CellValue;

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Diverging scale for heatmaps
// ---------------------------------------------------------------------------

/// Red → yellow → green, `t` in `[0, 1]`.
pub fn red_yellow_green(t: f64) -> Color32 {
    let red = Srgb::new(0.647_f32, 0.0, 0.149).into_linear::<f32>();
    let yellow = Srgb::new(1.0_f32, 1.0, 0.749).into_linear::<f32>();
    let green = Srgb::new(0.0_f32, 0.408, 0.216).into_linear::<f32>();

    let t = t.clamp(0.0, 1.0) as f32;
    let mixed: LinSrgb = if t < 0.5 {
        red.mix(yellow, t * 2.0)
    } else {
        yellow.mix(green, (t - 0.5) * 2.0)
    };
    to_color32(Srgb::from_linear(mixed))
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the distinct values, in the given order.
    pub fn new<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let values: Vec<&CellValue> = values.into_iter().collect();
        let palette = generate_palette(values.len());
        let mapping: BTreeMap<CellValue, Color32> = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Pin a specific colour for one value.
    pub fn with(mut self, value: CellValue, color: Color32) -> Self {
        self.mapping.insert(value, color);
        self
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let p = generate_palette(3);
        assert_eq!(p.len(), 3);
        assert_ne!(p[0], p[1]);
        assert_ne!(p[1], p[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_scale_endpoints() {
        let lo = red_yellow_green(0.0);
        let hi = red_yellow_green(1.0);
        assert!(lo.r() > lo.g());
        assert!(hi.g() > hi.r());
        assert_eq!(red_yellow_green(-3.0), lo);
    }

    #[test]
    fn test_color_map_pins_and_defaults() {
        let male = CellValue::Str("male".into());
        let female = CellValue::Str("female".into());
        let cm = ColorMap::new([&male, &female]).with(male.clone(), Color32::BLUE);
        assert_eq!(cm.color_for(&male), Color32::BLUE);
        assert_ne!(cm.color_for(&female), Color32::GRAY);
        assert_eq!(cm.color_for(&CellValue::Null), Color32::GRAY);
    }
}
