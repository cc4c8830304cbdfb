use serde::Deserialize;

/// Options for overlay rendering.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayOptions {
    /// Render at thumbnail proportions: rappel markers and descent glyphs
    /// double in size and descent glyphs space out (default: false)
    #[serde(default)]
    pub thumb: bool,

    /// Descent contrast order: black halo under white glyphs when true,
    /// inverted otherwise (default: true)
    #[serde(default = "default_true")]
    pub white_not_black: bool,

    /// Lower bound on the render scale, for very small images (default: 0)
    #[serde(default)]
    pub min_window_scale: f64,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            thumb: false,
            white_not_black: true,
            min_window_scale: 0.0,
        }
    }
}

impl OverlayOptions {
    /// Render scale shared by all scale-proportional glyphs.
    pub fn scale(&self, width: f64, height: f64) -> f64 {
        width.max(height).max(self.min_window_scale)
    }
}

fn default_true() -> bool {
    true
}
