//! Camera-facing billboard quads, batched per frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::colormap::TexRegion;

/// Vertex format for billboard quads, laid out for direct GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BillboardVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub color: [u8; 4],
}

impl BillboardVertex {
    pub fn new(position: Vec3, uv: [f32; 2], color: [u8; 4]) -> Self {
        Self {
            position: position.to_array(),
            uv,
            color,
        }
    }
}

/// Per-frame batch of billboard quads. Filled during the draw pass, drained
/// by the backend, cleared for the next frame.
#[derive(Debug, Default)]
pub struct BillboardBatch {
    vertices: Vec<BillboardVertex>,
}

impl BillboardBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one camera-facing quad. Corners are emitted counter-clockwise
    /// relative to the right/up basis: bottom-left, bottom-right, top-right,
    /// top-left.
    pub fn add_quad(
        &mut self,
        center: Vec3,
        right: Vec3,
        up: Vec3,
        radius: f32,
        tex: &TexRegion,
        color: [u8; 4],
    ) {
        let r = right * radius;
        let u = up * radius;
        self.vertices.push(BillboardVertex::new(
            center - r - u,
            [tex.x_start, tex.y_start],
            color,
        ));
        self.vertices.push(BillboardVertex::new(
            center + r - u,
            [tex.x_end, tex.y_start],
            color,
        ));
        self.vertices.push(BillboardVertex::new(
            center + r + u,
            [tex.x_end, tex.y_end],
            color,
        ));
        self.vertices.push(BillboardVertex::new(
            center - r + u,
            [tex.x_start, tex.y_end],
            color,
        ));
    }

    pub fn vertices(&self) -> &[BillboardVertex] {
        &self.vertices
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Raw bytes for vertex-buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}
