//! Per-piece collision volumes.
//!
//! The shared skeleton carries one volume *template* per piece; every unit
//! instance clones its own copy so hit tests can follow the instance's pose
//! without touching shared state.

use glam::Vec3;

/// Shape of a collision volume. Closed set; hit resolution elsewhere
/// matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeShape {
    /// Axis-aligned ellipsoid (the default for imported pieces).
    Ellipsoid,
    /// Axis-aligned box.
    Box,
    /// Y-axis cylinder.
    Cylinder,
}

/// A collision shape local to one model piece.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionVolume {
    pub shape: VolumeShape,
    /// Half-extent along each local axis.
    pub half_scales: Vec3,
    /// Offset of the volume's center from the piece origin.
    pub offset: Vec3,
    /// Disabled volumes never report hits (effector pieces, emit dummies).
    pub enabled: bool,
}

impl CollisionVolume {
    pub fn new(shape: VolumeShape, half_scales: Vec3, offset: Vec3) -> Self {
        Self {
            shape,
            half_scales,
            offset,
            enabled: true,
        }
    }

    /// A volume that never collides, for pieces with no physical presence.
    pub fn disabled() -> Self {
        Self {
            shape: VolumeShape::Ellipsoid,
            half_scales: Vec3::ZERO,
            offset: Vec3::ZERO,
            enabled: false,
        }
    }

    /// Point containment test in the piece's local frame.
    pub fn contains(&self, p: Vec3) -> bool {
        if !self.enabled {
            return false;
        }
        let d = p - self.offset;
        let s = self.half_scales.max(Vec3::splat(f32::EPSILON));
        match self.shape {
            VolumeShape::Ellipsoid => {
                let n = d / s;
                n.length_squared() <= 1.0
            }
            VolumeShape::Box => d.abs().cmple(s).all(),
            VolumeShape::Cylinder => {
                let r = (d.x / s.x).powi(2) + (d.z / s.z).powi(2);
                r <= 1.0 && d.y.abs() <= s.y
            }
        }
    }
}
