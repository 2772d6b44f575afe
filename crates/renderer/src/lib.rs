//! Rendering interface consumed by the model and projectile crates.
//!
//! The actual GPU backend lives elsewhere; this crate defines what the
//! simulation side needs from it: opaque renderable handles, a transform
//! stack to draw through, a camera basis for billboards, and the small
//! texture/colour types weapon visuals are defined with.

pub mod backend;
pub mod billboard;
pub mod camera;
pub mod colormap;

pub use backend::*;
pub use billboard::*;
pub use camera::*;
pub use colormap::*;
