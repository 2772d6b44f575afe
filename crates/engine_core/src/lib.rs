//! Core engine types shared across all simulation and rendering crates:
//! - Piece pose (translation + Euler rotation) and its matrix accumulation
//! - Coordinate-convention conversion for script/weapon queries
//! - Fixed-timestep tick clock for the sim/render alternation

pub mod coords;
pub mod pose;
pub mod time;

pub use coords::*;
pub use pose::*;
pub use time::*;

// Re-export commonly used math types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
