//! Render configuration. Everything is expressed in logical units; the
//! device pixel ratio is only applied when layers are rasterised.

use serde::{Deserialize, Serialize};

use super::model::LoadError;

pub const MIN_PIXEL_RATIO: f32 = 1.0;
pub const MAX_PIXEL_RATIO: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 40.0,
            right: 40.0,
            bottom: 60.0,
            left: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub band_padding: f64,
    /// Multiplier applied to the value-domain maximum.
    pub domain_headroom: f64,
    pub y_ticks: usize,
    pub marker_radius: f64,
    pub pixel_ratio: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 400.0,
            margins: Margins::default(),
            band_padding: 0.2,
            domain_headroom: 1.05,
            y_ticks: 5,
            marker_radius: 4.0,
            pixel_ratio: 1.0,
            background: "#0f1116".to_string(),
        }
    }
}

impl RenderConfig {
    /// Partial overrides on top of the defaults.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let config: RenderConfig = serde_json::from_str(text)?;
        let ratio = config.pixel_ratio;
        Ok(config.with_pixel_ratio(ratio))
    }

    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.pixel_ratio = if ratio.is_finite() {
            ratio.clamp(MIN_PIXEL_RATIO, MAX_PIXEL_RATIO)
        } else {
            MIN_PIXEL_RATIO
        };
        self
    }

    pub fn plot_width(&self) -> f64 {
        (self.width - self.margins.left - self.margins.right).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.height - self.margins.top - self.margins.bottom).max(0.0)
    }

    /// Physical surface size after applying the pixel ratio.
    pub fn surface_size(&self) -> (u32, u32) {
        let ratio = f64::from(self.pixel_ratio);
        (
            (self.width * ratio).round().max(1.0) as u32,
            (self.height * ratio).round().max(1.0) as u32,
        )
    }
}
