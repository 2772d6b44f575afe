//! The projectile capability interface and the owning projectile set.
//!
//! Projectile behaviour varies over a small closed vocabulary (motion rule,
//! collision rule, draw shape), so variants implement one common trait
//! instead of a type hierarchy.

use glam::Vec3;
use physics::GroundMap;
use renderer::{BillboardBatch, Camera};

/// Identifier of a unit handed to the external collision resolver.
pub type UnitId = u32;

/// Outcome of a shield-repulsion attempt. Discriminants are the values the
/// script API has always reported; keep them stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldResponse {
    /// Velocity already met or exceeded the shield's speed cap.
    Ignored = 0,
    /// Velocity was pushed away from the shield.
    Repulsed = 2,
}

/// External effect generator fired once per tick with lifetime-keyed state.
/// Bound to a projectile once at construction, never looked up per tick.
pub trait EffectGen {
    fn emit(&mut self, pos: Vec3, progress: f32, intensity: f32, vel: Vec3);
}

/// External resolver for projectile-vs-unit hits. The projectile only
/// forwards; damage, removal and effects are the resolver's business.
pub trait ImpactHandler {
    fn projectile_hit_unit(&mut self, pos: Vec3, target: UnitId);
}

/// Capabilities every projectile variant provides to its owner.
pub trait Projectile {
    /// Advance one simulation tick. Must not be called once
    /// [`Projectile::expired`] returns true.
    fn update(&mut self, ground: &dyn GroundMap);

    /// Emit this frame's geometry. Reads simulation state, never mutates it.
    fn draw(&self, camera: &Camera, batch: &mut BillboardBatch);

    /// Resolve a ground/terrain contact.
    fn ground_collision(&mut self, ground: &dyn GroundMap);

    /// Resolve a unit hit by delegating to the generic resolver.
    fn unit_collision(&mut self, target: UnitId, handler: &mut dyn ImpactHandler);

    /// Push the projectile away from a shield.
    fn shield_repulse(&mut self, shield_pos: Vec3, force: f32, max_speed: f32) -> ShieldResponse;

    /// Terminal: the owner drops the projectile and never ticks it again.
    fn expired(&self) -> bool;

    /// False once past physical life; collision queries skip the projectile.
    fn collision_enabled(&self) -> bool;

    fn pos(&self) -> Vec3;
}

/// Owns live projectiles and enforces the tick/draw discipline: one
/// mutating update pass per tick, expired members reclaimed at its end,
/// then any number of read-only draw passes.
#[derive(Default)]
pub struct ProjectileSet {
    items: Vec<Box<dyn Projectile>>,
}

impl ProjectileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, projectile: Box<dyn Projectile>) {
        self.items.push(projectile);
    }

    /// Tick every live projectile, then reclaim the ones that expired.
    pub fn update_all(&mut self, ground: &dyn GroundMap) {
        for p in &mut self.items {
            if !p.expired() {
                p.update(ground);
            }
        }
        self.items.retain(|p| !p.expired());
    }

    /// Draw pass: read-only over all live projectiles.
    pub fn draw_all(&self, camera: &Camera, batch: &mut BillboardBatch) {
        for p in &self.items {
            p.draw(camera, batch);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Projectile> {
        self.items.iter().map(|p| p.as_ref())
    }
}
