//! Static per-weapon parameters, loaded from RON definition files.

use std::path::Path;

use anyhow::Context;
use glam::Vec3;
use rand::Rng;
use renderer::{ColorRamp, ColorRampError, TexRegion};
use serde::{Deserialize, Serialize};

/// Read-only parameters of one projectile type. Consumed at fire time and
/// per tick; never mutated by the projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponDef {
    pub name: String,
    /// Base projectile size (world units).
    #[serde(default = "default_size")]
    pub size: f32,
    /// Per-tick radius increment.
    #[serde(default)]
    pub size_growth: f32,
    /// Scale from visual size to collision/draw radius.
    #[serde(default = "default_collision_size")]
    pub collision_size: f32,
    /// Physical-life scalar: collision checks stop once the normalized
    /// lifetime counter exceeds `1 / duration`.
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Lifetime in simulation ticks.
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    /// Water weapons pass over water instead of colliding with it.
    #[serde(default)]
    pub water_weapon: bool,
    /// Cone half-angle of fire-time spread jitter (radians).
    #[serde(default)]
    pub spray_angle: f32,
    /// Intensity passed to the effect hook each tick.
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    /// Atlas region of the projectile texture.
    #[serde(default)]
    pub texture: TexRegion,
    /// Colour ramp stops sampled by normalized lifetime.
    #[serde(default = "default_color_stops")]
    pub color_stops: Vec<[u8; 4]>,
    /// Effect-generator tag; when absent no effect hook is bound.
    #[serde(default)]
    pub effect_tag: Option<String>,
}

fn default_size() -> f32 {
    1.0
}
fn default_collision_size() -> f32 {
    1.0
}
fn default_duration() -> f32 {
    1.0
}
fn default_ttl() -> u32 {
    30
}
fn default_intensity() -> f32 {
    1.0
}
fn default_color_stops() -> Vec<[u8; 4]> {
    vec![[255, 255, 255, 255], [255, 255, 255, 0]]
}

impl Default for WeaponDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            size: default_size(),
            size_growth: 0.0,
            collision_size: default_collision_size(),
            duration: default_duration(),
            ttl: default_ttl(),
            water_weapon: false,
            spray_angle: 0.0,
            intensity: default_intensity(),
            texture: TexRegion::default(),
            color_stops: default_color_stops(),
            effect_tag: None,
        }
    }
}

impl WeaponDef {
    /// Load a weapon definition from a RON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading weapon def {:?}", path))?;
        let def: Self =
            ron::from_str(&data).with_context(|| format!("parsing weapon def {:?}", path))?;
        Ok(def)
    }

    /// Load a weapon definition, falling back to defaults on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(def) => def,
            Err(e) => {
                log::warn!("{:#}, using default weapon def", e);
                Self::default()
            }
        }
    }

    /// Build the colour ramp from the configured stops.
    pub fn color_ramp(&self) -> Result<ColorRamp, ColorRampError> {
        ColorRamp::new(self.color_stops.clone())
    }

    /// Per-tick spread (turbulence) vector for a projectile fired along
    /// `dir`: a random jitter inside the spray cone, minus a slight pull
    /// against the fire direction so streams fan out as they slow.
    pub fn spawn_spread(&self, dir: Vec3, rng: &mut impl Rng) -> Vec3 {
        rand_sphere_vector(rng) * self.spray_angle - dir * 0.001
    }
}

/// Uniform random vector inside the unit sphere.
fn rand_sphere_vector(rng: &mut impl Rng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}
