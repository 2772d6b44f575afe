//! Opaque renderable handles and the transform-stack drawing interface.

use glam::{Mat4, Vec3};

/// Backend identifier for one piece of renderable geometry (display list,
/// mesh buffer slot). Only the backend knows what it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u32);

/// A rendering context with an OpenGL-style transform stack. The model
/// hierarchy decides *when* and *with what transform* geometry is drawn;
/// the backend decides how.
pub trait DrawBackend {
    /// Save the current transform.
    fn push(&mut self);
    /// Restore the most recently saved transform.
    fn pop(&mut self);
    /// Post-multiply the current transform with a translation.
    fn translate(&mut self, v: Vec3);
    /// Post-multiply with a rotation about X, in radians.
    fn rotate_x(&mut self, radians: f32);
    /// Post-multiply with a rotation about Y, in radians.
    fn rotate_y(&mut self, radians: f32);
    /// Post-multiply with a rotation about Z, in radians.
    fn rotate_z(&mut self, radians: f32);
    /// Draw a renderable under the current transform.
    fn draw(&mut self, handle: RenderHandle);
}

/// Backend that records every draw call with its full transform instead of
/// rasterising. Used by tests and offline tools to inspect a draw pass.
#[derive(Debug, Default)]
pub struct MatrixRecorder {
    stack: Vec<Mat4>,
    current: Mat4,
    draws: Vec<(RenderHandle, Mat4)>,
}

impl MatrixRecorder {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            current: Mat4::IDENTITY,
            draws: Vec::new(),
        }
    }

    /// All draws issued so far, in order, with the transform each saw.
    pub fn draws(&self) -> &[(RenderHandle, Mat4)] {
        &self.draws
    }

    /// The transform currently on top of the stack.
    pub fn current(&self) -> Mat4 {
        self.current
    }

    /// True once every push has been matched by a pop.
    pub fn balanced(&self) -> bool {
        self.stack.is_empty()
    }
}

impl DrawBackend for MatrixRecorder {
    fn push(&mut self) {
        self.stack.push(self.current);
    }

    fn pop(&mut self) {
        match self.stack.pop() {
            Some(m) => self.current = m,
            None => log::warn!("transform stack pop with empty stack"),
        }
    }

    fn translate(&mut self, v: Vec3) {
        self.current *= Mat4::from_translation(v);
    }

    fn rotate_x(&mut self, radians: f32) {
        self.current *= Mat4::from_rotation_x(radians);
    }

    fn rotate_y(&mut self, radians: f32) {
        self.current *= Mat4::from_rotation_y(radians);
    }

    fn rotate_z(&mut self, radians: f32) {
        self.current *= Mat4::from_rotation_z(radians);
    }

    fn draw(&mut self, handle: RenderHandle) {
        self.draws.push((handle, self.current));
    }
}
