//! Coordinate-convention conversion between the render hierarchy and the
//! script/weapon query side.
//!
//! Model space is left-handed with the positive X axis pointing to the
//! *left*. Scripts, weapons and effect emitters expect a right-pointing X
//! axis, so every position or direction leaving the model hierarchy has its
//! X component negated. All call sites go through [`to_query_space`] so the
//! convention lives in exactly one place.

use glam::Vec3;

/// Convert a model-space position or direction into query space by negating
/// the X axis. Involutive: applying it twice returns the input.
#[inline]
pub fn to_query_space(v: Vec3) -> Vec3 {
    Vec3::new(-v.x, v.y, v.z)
}
