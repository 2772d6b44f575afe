//! Hierarchical 3D unit models.
//!
//! Each model type is parsed once into an immutable shared skeleton
//! ([`Model`]); every unit then carries its own cheap [`LocalModel`] mirror
//! with mutable per-piece poses, LOD handles and collision volumes. Scripts
//! and weapons address pieces by stable pre-order index or by name.

pub mod instance;
pub mod skeleton;

pub use instance::*;
pub use skeleton::*;
