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
            let hsl = Hsl::new(hue, 0.75, 0.55);
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
// Series colours for a plot view
// ---------------------------------------------------------------------------

/// Fixed colours for the curves drawn in one view, in draw order.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    colors: Vec<Color32>,
}

impl SeriesColors {
    pub fn new(series: usize) -> Self {
        Self {
            colors: generate_palette(series),
        }
    }

    /// Colour of series `index`; wraps around when there are more series.
    pub fn get(&self, index: usize) -> Color32 {
        if self.colors.is_empty() {
            return Color32::LIGHT_BLUE;
        }
        self.colors[index % self.colors.len()]
    }
}
