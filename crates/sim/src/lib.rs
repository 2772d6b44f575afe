//! Projectile simulation: weapon definitions, the projectile capability
//! trait, and the flame-stream projectile.
//!
//! Projectiles are integrated once per simulation tick and drawn once per
//! frame; the draw pass reads state and never mutates it.

pub mod flame;
pub mod projectile;
pub mod weapon;

pub use flame::*;
pub use projectile::*;
pub use weapon::*;
