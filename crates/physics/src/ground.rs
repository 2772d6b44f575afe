//! Terrain height and surface-normal queries.
//!
//! Projectiles only ever ask two things of the map: the surface height at a
//! horizontal position (water-inclusive, so shots can skim a lake) and the
//! surface normal there. [`GroundMap`] is that narrow interface; the full
//! collision engine lives behind it.

use glam::Vec3;

/// Pure terrain queries at a horizontal (x, z) position.
pub trait GroundMap {
    /// Surface height, including any water surface above the ground.
    fn height_at(&self, x: f32, z: f32) -> f32;

    /// Unit surface normal.
    fn normal_at(&self, x: f32, z: f32) -> Vec3;
}

/// Infinite flat plane at a fixed height. Mostly for tests.
#[derive(Debug, Clone, Copy)]
pub struct FlatGround {
    pub height: f32,
}

impl FlatGround {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl GroundMap for FlatGround {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }

    fn normal_at(&self, _x: f32, _z: f32) -> Vec3 {
        Vec3::Y
    }
}

/// Grid-sampled heightfield with bilinear height interpolation and
/// central-difference normals. Water is modelled as a floor on the sampled
/// height so [`GroundMap::height_at`] reports the wet surface.
#[derive(Debug, Clone)]
pub struct Heightfield {
    width: usize,
    depth: usize,
    cell_size: f32,
    heights: Vec<f32>,
    water_level: Option<f32>,
}

impl Heightfield {
    /// Build from row-major samples; `heights.len()` must be `width * depth`.
    pub fn new(width: usize, depth: usize, cell_size: f32, heights: Vec<f32>) -> Self {
        assert_eq!(heights.len(), width * depth, "heightfield sample count");
        Self {
            width,
            depth,
            cell_size,
            heights,
            water_level: None,
        }
    }

    pub fn with_water_level(mut self, level: f32) -> Self {
        self.water_level = Some(level);
        self
    }

    fn sample(&self, ix: isize, iz: isize) -> f32 {
        let ix = ix.clamp(0, self.width as isize - 1) as usize;
        let iz = iz.clamp(0, self.depth as isize - 1) as usize;
        self.heights[iz * self.width + ix]
    }

    /// Bilinear ground height, ignoring water.
    pub fn ground_height_at(&self, x: f32, z: f32) -> f32 {
        let gx = x / self.cell_size;
        let gz = z / self.cell_size;
        let x0 = gx.floor();
        let z0 = gz.floor();
        let fx = gx - x0;
        let fz = gz - z0;
        let (x0, z0) = (x0 as isize, z0 as isize);

        let h00 = self.sample(x0, z0);
        let h10 = self.sample(x0 + 1, z0);
        let h01 = self.sample(x0, z0 + 1);
        let h11 = self.sample(x0 + 1, z0 + 1);

        let a = h00 + (h10 - h00) * fx;
        let b = h01 + (h11 - h01) * fx;
        a + (b - a) * fz
    }
}

impl GroundMap for Heightfield {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        let h = self.ground_height_at(x, z);
        match self.water_level {
            Some(w) => h.max(w),
            None => h,
        }
    }

    fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        // Central differences one cell out in each direction.
        let d = self.cell_size;
        let hx0 = self.ground_height_at(x - d, z);
        let hx1 = self.ground_height_at(x + d, z);
        let hz0 = self.ground_height_at(x, z - d);
        let hz1 = self.ground_height_at(x, z + d);
        Vec3::new(hx0 - hx1, 2.0 * d, hz0 - hz1).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_ground_is_flat() {
        let g = FlatGround::new(3.0);
        assert_eq!(g.height_at(100.0, -40.0), 3.0);
        assert_eq!(g.normal_at(0.0, 0.0), Vec3::Y);
    }

    #[test]
    fn heightfield_interpolates_between_samples() {
        let hf = Heightfield::new(2, 2, 1.0, vec![0.0, 2.0, 0.0, 2.0]);
        assert!((hf.height_at(0.5, 0.5) - 1.0).abs() < 1e-5);
        assert!((hf.height_at(0.0, 0.0) - 0.0).abs() < 1e-5);
        assert!((hf.height_at(1.0, 1.0) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn water_floors_the_surface_height() {
        let hf = Heightfield::new(2, 2, 1.0, vec![-5.0, -5.0, -5.0, -5.0]).with_water_level(0.0);
        assert_eq!(hf.height_at(0.5, 0.5), 0.0);
        assert_eq!(hf.ground_height_at(0.5, 0.5), -5.0);
    }

    #[test]
    fn slope_normal_tilts_against_ascent() {
        // Height rises with +x, so the normal leans toward -x.
        let hf = Heightfield::new(3, 3, 1.0, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        let n = hf.normal_at(1.0, 1.0);
        assert!(n.x < 0.0);
        assert!(n.y > 0.0);
        assert!(n.z.abs() < 1e-5);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }
}
