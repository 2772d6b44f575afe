//! Collision-side interfaces consumed by the model and projectile crates:
//! per-piece collision volumes and terrain height/normal queries.

pub mod ground;
pub mod volume;

pub use ground::*;
pub use volume::*;
