//! Shared model skeleton: the read-only piece tree built once per model
//! type by the importer and referenced by every unit instance.
//!
//! Pieces live in a flat arena numbered in depth-first pre-order (root is
//! index 0) and refer to each other by index, never by pointer. Instance
//! mirrors reuse the same numbering, so a piece id resolved once against the
//! skeleton stays valid for every unit of that model type.

use std::collections::HashMap;

use glam::Vec3;
use physics::CollisionVolume;
use renderer::{DrawBackend, RenderHandle};

/// Importer-side description of one piece and its subtree. Children are
/// declared in order; that order is the traversal order everywhere else.
#[derive(Debug, Clone)]
pub struct PieceDesc {
    pub name: String,
    /// Fixed local offset from the parent piece.
    pub offset: Vec3,
    /// Vertex positions in declared order; the first two define the piece's
    /// emit direction.
    pub vertices: Vec<Vec3>,
    pub handle: RenderHandle,
    pub colvol: CollisionVolume,
    pub children: Vec<PieceDesc>,
}

impl PieceDesc {
    pub fn new(name: impl Into<String>, handle: RenderHandle) -> Self {
        Self {
            name: name.into(),
            offset: Vec3::ZERO,
            vertices: Vec::new(),
            handle,
            colvol: CollisionVolume::disabled(),
            children: Vec::new(),
        }
    }

    pub fn offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn vertices(mut self, vertices: Vec<Vec3>) -> Self {
        self.vertices = vertices;
        self
    }

    pub fn colvol(mut self, colvol: CollisionVolume) -> Self {
        self.colvol = colvol;
        self
    }

    pub fn child(mut self, child: PieceDesc) -> Self {
        self.children.push(child);
        self
    }
}

/// One node of the immutable skeleton.
#[derive(Debug, Clone)]
pub struct ModelPiece {
    name: String,
    offset: Vec3,
    vertices: Vec<Vec3>,
    handle: RenderHandle,
    colvol: CollisionVolume,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl ModelPiece {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fixed local offset from the parent piece. The shared skeleton carries
    /// no independent rotation.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex(&self, i: usize) -> Vec3 {
        self.vertices[i]
    }

    pub fn handle(&self) -> RenderHandle {
        self.handle
    }

    /// Collision-volume template; instances clone it, never share it.
    pub fn collision_volume(&self) -> &CollisionVolume {
        &self.colvol
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Child piece indices in declared order.
    pub fn children(&self) -> &[usize] {
        &self.children
    }
}

/// An immutable model skeleton: the pre-order piece arena plus a name index.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    pieces: Vec<ModelPiece>,
    by_name: HashMap<String, usize>,
}

impl Model {
    /// Flatten an imported piece tree into the pre-order arena. The root of
    /// `root` becomes piece 0.
    pub fn new(name: impl Into<String>, root: PieceDesc) -> Self {
        let name = name.into();
        let mut pieces = Vec::new();
        let mut by_name = HashMap::new();
        Self::flatten(root, None, &mut pieces, &mut by_name, &name);
        log::debug!("model '{}' built with {} pieces", name, pieces.len());
        Self {
            name,
            pieces,
            by_name,
        }
    }

    fn flatten(
        desc: PieceDesc,
        parent: Option<usize>,
        pieces: &mut Vec<ModelPiece>,
        by_name: &mut HashMap<String, usize>,
        model_name: &str,
    ) -> usize {
        let index = pieces.len();
        if by_name.insert(desc.name.clone(), index).is_some() {
            log::warn!(
                "model '{}': duplicate piece name '{}', later piece shadows earlier",
                model_name,
                desc.name
            );
        }
        pieces.push(ModelPiece {
            name: desc.name,
            offset: desc.offset,
            vertices: desc.vertices,
            handle: desc.handle,
            colvol: desc.colvol,
            parent,
            children: Vec::new(),
        });
        for child in desc.children {
            let child_index = Self::flatten(child, Some(index), pieces, by_name, model_name);
            pieces[index].children.push(child_index);
        }
        index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Piece by pre-order index. Index 0 is the root.
    pub fn piece(&self, index: usize) -> &ModelPiece {
        &self.pieces[index]
    }

    pub fn pieces(&self) -> &[ModelPiece] {
        &self.pieces
    }

    /// Exact-match piece lookup by name. A miss is a normal outcome (models
    /// may lack optional pieces); callers branch on it, it is never an error.
    pub fn find_piece(&self, name: &str) -> Option<&ModelPiece> {
        self.by_name.get(name).map(|&i| &self.pieces[i])
    }

    /// Pre-order index of a named piece, for later O(1) addressing.
    pub fn piece_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Draw the skeleton in its static bind pose: each piece translated by
    /// its fixed offset only. Used for build previews, never for live units
    /// (those pose through their [`crate::LocalModel`]).
    pub fn draw_static(&self, backend: &mut dyn DrawBackend) {
        self.draw_static_piece(0, backend);
    }

    fn draw_static_piece(&self, index: usize, backend: &mut dyn DrawBackend) {
        let piece = &self.pieces[index];
        backend.push();
        backend.translate(piece.offset);
        backend.draw(piece.handle);
        for &child in &piece.children {
            self.draw_static_piece(child, backend);
        }
        backend.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::MatrixRecorder;

    fn tank() -> Model {
        Model::new(
            "tank",
            PieceDesc::new("base", RenderHandle(1))
                .child(
                    PieceDesc::new("turret", RenderHandle(2))
                        .offset(Vec3::new(0.0, 2.0, 0.0))
                        .child(
                            PieceDesc::new("barrel", RenderHandle(3))
                                .offset(Vec3::new(0.0, 0.5, 1.0)),
                        ),
                )
                .child(PieceDesc::new("tracks", RenderHandle(4))),
        )
    }

    #[test]
    fn pieces_are_numbered_pre_order() {
        let m = tank();
        assert_eq!(m.piece_count(), 4);
        assert_eq!(m.piece(0).name(), "base");
        assert_eq!(m.piece(1).name(), "turret");
        assert_eq!(m.piece(2).name(), "barrel");
        assert_eq!(m.piece(3).name(), "tracks");
        assert_eq!(m.piece(0).children(), &[1, 3]);
        assert_eq!(m.piece(1).children(), &[2]);
        assert_eq!(m.piece(2).parent(), Some(1));
    }

    #[test]
    fn find_piece_hits_and_misses() {
        let m = tank();
        assert_eq!(m.find_piece("barrel").unwrap().handle(), RenderHandle(3));
        assert!(m.find_piece("antenna").is_none());
        assert_eq!(m.piece_index("turret"), Some(1));
    }

    #[test]
    fn every_piece_is_reachable_from_the_root_once() {
        let m = tank();
        let mut seen = vec![false; m.piece_count()];
        let mut stack = vec![0usize];
        while let Some(i) = stack.pop() {
            assert!(!seen[i], "piece visited twice");
            seen[i] = true;
            stack.extend_from_slice(m.piece(i).children());
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn draw_static_composes_offsets_and_restores_frames() {
        let m = tank();
        let mut rec = MatrixRecorder::new();
        m.draw_static(&mut rec);

        assert!(rec.balanced());
        let draws = rec.draws();
        assert_eq!(draws.len(), 4);
        // Pre-order draw order.
        let handles: Vec<u32> = draws.iter().map(|d| d.0 .0).collect();
        assert_eq!(handles, vec![1, 2, 3, 4]);
        // Barrel sits at turret offset + its own.
        let barrel = draws[2].1.transform_point3(Vec3::ZERO);
        assert_eq!(barrel, Vec3::new(0.0, 2.5, 1.0));
        // Tracks restored to the root frame, unaffected by the turret chain.
        let tracks = draws[3].1.transform_point3(Vec3::ZERO);
        assert_eq!(tracks, Vec3::ZERO);
    }
}
