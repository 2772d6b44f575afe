//! Texture regions and lifetime-keyed colour ramps for weapon visuals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Normalised sub-rectangle of the projectile texture atlas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TexRegion {
    pub x_start: f32,
    pub y_start: f32,
    pub x_end: f32,
    pub y_end: f32,
}

impl TexRegion {
    /// The whole atlas.
    pub fn full() -> Self {
        Self {
            x_start: 0.0,
            y_start: 0.0,
            x_end: 1.0,
            y_end: 1.0,
        }
    }
}

impl Default for TexRegion {
    fn default() -> Self {
        Self::full()
    }
}

#[derive(Debug, Error)]
pub enum ColorRampError {
    #[error("color ramp needs at least 2 stops, got {0}")]
    TooFewStops(usize),
}

/// RGBA8 colour ramp sampled by a normalised lifetime in `[0, 1]`.
/// Stops are evenly spaced; sampling interpolates linearly between them.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<[u8; 4]>,
}

impl ColorRamp {
    pub fn new(stops: Vec<[u8; 4]>) -> Result<Self, ColorRampError> {
        if stops.len() < 2 {
            return Err(ColorRampError::TooFewStops(stops.len()));
        }
        Ok(Self { stops })
    }

    /// Colour at `t`, clamped to `[0, 1]`.
    pub fn color_at(&self, t: f32) -> [u8; 4] {
        let t = t.clamp(0.0, 1.0);
        let span = (self.stops.len() - 1) as f32;
        let x = t * span;
        let i = (x.floor() as usize).min(self.stops.len() - 2);
        let f = x - i as f32;

        let a = self.stops[i];
        let b = self.stops[i + 1];
        let mut out = [0u8; 4];
        for c in 0..4 {
            out[c] = (a[c] as f32 + (b[c] as f32 - a[c] as f32) * f).round() as u8;
        }
        out
    }
}
