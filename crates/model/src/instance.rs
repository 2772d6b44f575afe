//! Per-unit instance mirror of a shared model skeleton.
//!
//! A [`LocalModel`] is created when a unit spawns and destroyed with it.
//! Its pieces sit in a flat arena whose indices equal the skeleton's
//! pre-order numbering (root is 0), so scripts resolve a piece name to an
//! index once and then address it in O(1) every tick.
//!
//! Two transform paths exist and intentionally use opposite rotation signs;
//! see [`engine_core::pose`] before touching either.

use std::sync::Arc;

use engine_core::{to_query_space, PiecePose};
use glam::{Mat4, Vec3};
use physics::CollisionVolume;
use renderer::{DrawBackend, RenderHandle};

use crate::skeleton::Model;

/// Placeholder direction returned by [`LocalModel::piece_direction`] when
/// the piece has fewer than two vertices. Callers must tolerate it.
pub const DEGENERATE_DIRECTION: Vec3 = Vec3::ONE;

/// One posable node of a unit's instance tree.
#[derive(Debug, Clone)]
pub struct LocalPiece {
    /// Pre-order index of the mirrored skeleton piece.
    piece: usize,
    /// This instance's own copy of the skeleton's collision template.
    pub colvol: CollisionVolume,
    /// Script-driven local pose, applied on top of the parent chain.
    pub pose: PiecePose,
    /// Hidden pieces draw nothing but their children still do.
    pub visible: bool,
    /// Base-LOD renderable, copied from the skeleton piece.
    handle: RenderHandle,
    /// Per-LOD renderables; `None` slots await external provisioning.
    lod_handles: Vec<Option<RenderHandle>>,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl LocalPiece {
    /// Index of the mirrored skeleton piece.
    pub fn piece_index(&self) -> usize {
        self.piece
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn handle(&self) -> RenderHandle {
        self.handle
    }

    pub fn lod_handle(&self, lod: usize) -> Option<RenderHandle> {
        self.lod_handles[lod]
    }

    /// Install the renderable for one LOD slot. The slot must already exist
    /// (created by [`LocalModel::set_lod_count`]).
    pub fn set_lod_handle(&mut self, lod: usize, handle: RenderHandle) {
        self.lod_handles[lod] = Some(handle);
    }

    pub fn lod_slot_count(&self) -> usize {
        self.lod_handles.len()
    }
}

/// A unit's posable mirror of a shared [`Model`].
#[derive(Debug, Clone)]
pub struct LocalModel {
    shared: Arc<Model>,
    pieces: Vec<LocalPiece>,
    lod_count: usize,
}

impl LocalModel {
    /// Build the instance tree by walking the skeleton depth-first with a
    /// single shared cursor, so instance indices reproduce the skeleton's
    /// pre-order numbering exactly.
    pub fn new(shared: Arc<Model>) -> Self {
        let mut pieces = Vec::with_capacity(shared.piece_count());
        let mut cursor = 0;
        Self::create_pieces(&shared, 0, None, &mut cursor, &mut pieces);
        debug_assert_eq!(pieces.len(), shared.piece_count());
        Self {
            shared,
            pieces,
            lod_count: 0,
        }
    }

    fn create_pieces(
        shared: &Model,
        piece: usize,
        parent: Option<usize>,
        cursor: &mut usize,
        out: &mut Vec<LocalPiece>,
    ) {
        let index = *cursor;
        debug_assert_eq!(index, piece, "instance numbering must mirror the skeleton");
        let sp = shared.piece(piece);
        out.push(LocalPiece {
            piece,
            colvol: sp.collision_volume().clone(),
            pose: PiecePose::default(),
            visible: true,
            handle: sp.handle(),
            lod_handles: Vec::new(),
            parent,
            children: Vec::new(),
        });
        for &child in sp.children() {
            *cursor += 1;
            let child_index = *cursor;
            out[index].children.push(child_index);
            Self::create_pieces(shared, child, Some(index), cursor, out);
        }
    }

    /// The shared skeleton this instance mirrors.
    pub fn shared(&self) -> &Arc<Model> {
        &self.shared
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn piece(&self, index: usize) -> &LocalPiece {
        &self.pieces[index]
    }

    pub fn piece_mut(&mut self, index: usize) -> &mut LocalPiece {
        &mut self.pieces[index]
    }

    pub fn lod_count(&self) -> usize {
        self.lod_count
    }

    /// Set the uniform LOD count, giving every piece exactly `count` LOD
    /// slots. Surviving slots keep their handles; new slots start unset and
    /// must be provisioned before first use at that LOD.
    pub fn set_lod_count(&mut self, count: usize) {
        self.lod_count = count;
        for piece in &mut self.pieces {
            piece.lod_handles.resize(count, None);
        }
    }

    // ── Render path ────────────────────────────────────────────────────

    /// Draw the whole instance tree at base LOD through the backend's
    /// transform stack.
    pub fn draw(&self, backend: &mut dyn DrawBackend) {
        self.draw_piece(0, backend, None);
    }

    /// Like [`Self::draw`] but selecting the `lod`-indexed renderable.
    /// `lod` must be a valid slot index on every visited piece; violating
    /// that is a caller bug, checked only in debug builds.
    pub fn draw_lod(&self, backend: &mut dyn DrawBackend, lod: usize) {
        debug_assert!(lod < self.lod_count, "lod {} >= lod_count {}", lod, self.lod_count);
        self.draw_piece(0, backend, Some(lod));
    }

    fn draw_piece(&self, index: usize, backend: &mut dyn DrawBackend, lod: Option<usize>) {
        let piece = &self.pieces[index];
        // Cheap cull: hidden leaf pieces (emit dummies) contribute nothing.
        if !piece.visible && piece.children.is_empty() {
            return;
        }

        backend.push();
        apply_pose(&piece.pose, backend);

        if piece.visible {
            match lod {
                None => backend.draw(piece.handle),
                Some(lod) => {
                    debug_assert!(lod < piece.lod_handles.len());
                    if let Some(handle) = piece.lod_handles[lod] {
                        backend.draw(handle);
                    }
                }
            }
        }

        for &child in &piece.children {
            self.draw_piece(child, backend, lod);
        }

        backend.pop();
    }

    /// Apply the root-to-piece pose chain onto the backend's *current*
    /// transform, without push/pop — the caller owns save/restore. Used to
    /// render attached geometry (a held weapon, a flare) in a piece's frame.
    pub fn apply_piece_transform(&self, index: usize, backend: &mut dyn DrawBackend) {
        if let Some(parent) = self.pieces[index].parent {
            self.apply_piece_transform(parent, backend);
        }
        apply_pose(&self.pieces[index].pose, backend);
    }

    // ── Query path ─────────────────────────────────────────────────────
    //
    // Accumulates the same chain into an explicit matrix, with the query
    // rotation sign (negated angles). Do not unify with the render path.

    fn accumulate_chain(&self, index: usize, mat: &mut Mat4) {
        if let Some(parent) = self.pieces[index].parent {
            self.accumulate_chain(parent, mat);
        }
        self.pieces[index].pose.accumulate_query(mat);
    }

    /// Cumulative pose-to-model matrix of a piece, excluding the skeleton's
    /// static offset.
    pub fn piece_matrix(&self, index: usize) -> Mat4 {
        let mut mat = Mat4::IDENTITY;
        self.accumulate_chain(index, &mut mat);
        mat
    }

    /// Query-space position of a piece: the pose chain, then the skeleton
    /// piece's static offset, converted through [`to_query_space`].
    pub fn piece_pos(&self, index: usize) -> Vec3 {
        let mut mat = self.piece_matrix(index);
        mat *= Mat4::from_translation(self.shared.piece(self.pieces[index].piece).offset());
        to_query_space(mat.w_axis.truncate())
    }

    /// Untransformed emit direction of a piece: the difference of its first
    /// two declared vertices, or [`DEGENERATE_DIRECTION`] when it has fewer
    /// than two. Only meaningful for dedicated emit pieces.
    pub fn piece_direction(&self, index: usize) -> Vec3 {
        let sp = self.shared.piece(self.pieces[index].piece);
        if sp.vertex_count() < 2 {
            return DEGENERATE_DIRECTION;
        }
        sp.vertex(0) - sp.vertex(1)
    }

    /// Resolve a query-space position and direction for effect or weapon
    /// emission from a piece. Returns `None` when `index` names no bound
    /// skeleton piece; callers skip the effect rather than fail.
    ///
    /// Policy by vertex count: 0 → piece origin, facing local +Z; 1 → piece
    /// origin, toward the vertex; 2 or more → first vertex, toward the
    /// second.
    pub fn emit_dir_pos(&self, index: usize) -> Option<(Vec3, Vec3)> {
        let local = self.pieces.get(index)?;
        let sp = self.shared.pieces().get(local.piece)?;

        let mat = self.piece_matrix(index);
        let (pos, dir) = match sp.vertex_count() {
            0 => {
                let pos = mat.w_axis.truncate();
                (pos, mat.transform_point3(Vec3::Z) - pos)
            }
            1 => {
                let pos = mat.w_axis.truncate();
                (pos, mat.transform_point3(sp.vertex(0)) - pos)
            }
            _ => {
                let p1 = mat.transform_point3(sp.vertex(0));
                let p2 = mat.transform_point3(sp.vertex(1));
                (p1, p2 - p1)
            }
        };

        Some((to_query_space(pos), to_query_space(dir)))
    }
}

/// Apply a pose through the backend with the render sign convention,
/// skipping zero components (a fast path, observably identical to applying
/// them).
fn apply_pose(pose: &PiecePose, backend: &mut dyn DrawBackend) {
    if pose.pos != Vec3::ZERO {
        backend.translate(pose.pos);
    }
    if pose.rot.y != 0.0 {
        backend.rotate_y(pose.rot.y);
    }
    if pose.rot.x != 0.0 {
        backend.rotate_x(pose.rot.x);
    }
    if pose.rot.z != 0.0 {
        backend.rotate_z(pose.rot.z);
    }
}
