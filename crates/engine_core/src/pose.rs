//! Local pose of a posable model piece.
//!
//! A pose is a translation plus three Euler angles in radians, applied in
//! the fixed order Y, X, Z. Two matrix-accumulation flavours exist and they
//! intentionally disagree in rotation sign:
//!
//! - the **render** path (draw passes, attached-geometry transforms) rotates
//!   by `+rot`,
//! - the **query** path (world-space position/emit lookups) rotates by
//!   `-rot`.
//!
//! Existing unit scripts were authored against both conventions, so the
//! asymmetry is a compatibility contract, not a bug to fix. Use
//! [`PiecePose::accumulate_render`] and [`PiecePose::accumulate_query`]
//! explicitly; never "correct" one to match the other.

use glam::{Mat4, Vec3};

/// Mutable local pose of an instance-model piece.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PiecePose {
    /// Local translation offset.
    pub pos: Vec3,
    /// Euler angles in radians, applied about Y, then X, then Z.
    pub rot: Vec3,
}

impl PiecePose {
    /// Pose with the given translation and no rotation.
    pub fn from_pos(pos: Vec3) -> Self {
        Self { pos, rot: Vec3::ZERO }
    }

    /// True when every component is zero; applying an identity pose is a
    /// no-op on any accumulator.
    pub fn is_identity(&self) -> bool {
        self.pos == Vec3::ZERO && self.rot == Vec3::ZERO
    }

    /// Post-multiply `mat` with this pose using the render sign convention
    /// (`+rot`). Zero components are skipped; the skip is a fast path only
    /// and observably equivalent to applying the zero transform.
    pub fn accumulate_render(&self, mat: &mut Mat4) {
        self.accumulate(mat, 1.0);
    }

    /// Post-multiply `mat` with this pose using the query sign convention
    /// (`-rot`). See the module docs for why the sign differs from
    /// [`Self::accumulate_render`].
    pub fn accumulate_query(&self, mat: &mut Mat4) {
        self.accumulate(mat, -1.0);
    }

    fn accumulate(&self, mat: &mut Mat4, sign: f32) {
        if self.pos != Vec3::ZERO {
            *mat *= Mat4::from_translation(self.pos);
        }
        if self.rot.y != 0.0 {
            *mat *= Mat4::from_rotation_y(sign * self.rot.y);
        }
        if self.rot.x != 0.0 {
            *mat *= Mat4::from_rotation_x(sign * self.rot.x);
        }
        if self.rot.z != 0.0 {
            *mat *= Mat4::from_rotation_z(sign * self.rot.z);
        }
    }
}
