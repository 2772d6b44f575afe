//! Camera orientation used for billboard alignment.

use glam::{Mat4, Quat, Vec3};

/// Minimal camera state: position plus orientation. Billboard emission only
/// needs the right/up basis; view/projection matrices are the backend's
/// business.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Camera looking from `position` toward `target`.
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let rotation = Quat::from_mat4(&Mat4::look_at_rh(position, target, up)).inverse();
        Self { position, rotation }
    }

    /// View-space right axis in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// View-space up axis in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Forward direction (negative Z in right-handed view space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }
}
