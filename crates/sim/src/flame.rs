//! Flame-stream projectile: a growing, turbulence-driven fireball with a
//! normalized lifetime clock and a billboard visual.

use std::sync::Arc;

use glam::Vec3;
use physics::GroundMap;
use renderer::{BillboardBatch, Camera, ColorRamp};

use crate::projectile::{
    EffectGen, ImpactHandler, Projectile, ShieldResponse, UnitId,
};
use crate::weapon::WeaponDef;

/// Upward nudge and lifetime advance applied on every ground bounce. The
/// lifetime advance desynchronizes repeated bounces; it also makes a
/// bouncing flame burn out faster, which is long-standing behaviour that
/// unit balance depends on.
const BOUNCE_NUDGE: f32 = 0.05;

/// One segment of a flame stream.
pub struct FlameProjectile {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Per-tick turbulence added to velocity; fixed at fire time.
    spread: Vec3,
    /// Normalized lifetime in `[0, 1]`, monotone, clamped at 1.
    cur_time: f32,
    /// Lifetime threshold past which collision checks stop.
    phys_life: f32,
    /// Per-tick lifetime increment (`1 / ttl`).
    inv_ttl: f32,
    radius: f32,
    sq_radius: f32,
    draw_radius: f32,
    intensity: f32,
    check_col: bool,
    delete_me: bool,
    /// Set while a scripted motion controller owns this projectile; the
    /// built-in integration and repulsion are suspended.
    pub ext_move_ctrl: bool,
    def: Arc<WeaponDef>,
    ramp: ColorRamp,
    effect: Option<Box<dyn EffectGen>>,
}

impl FlameProjectile {
    /// Fire a flame segment. `effect` is bound only when the weapon
    /// definition carries an effect tag; it is never re-checked per tick.
    pub fn new(
        pos: Vec3,
        vel: Vec3,
        spread: Vec3,
        def: Arc<WeaponDef>,
        effect: Option<Box<dyn EffectGen>>,
    ) -> Self {
        let radius = def.size * def.collision_size;
        let ramp = match def.color_ramp() {
            Ok(ramp) => ramp,
            Err(e) => {
                log::warn!("weapon '{}': {}, using default ramp", def.name, e);
                WeaponDef::default()
                    .color_ramp()
                    .unwrap_or_else(|_| unreachable!("default ramp has 2 stops"))
            }
        };
        Self {
            pos,
            vel,
            spread,
            cur_time: 0.0,
            phys_life: 1.0 / def.duration,
            inv_ttl: 1.0 / def.ttl as f32,
            radius,
            sq_radius: radius * radius,
            draw_radius: def.size,
            intensity: def.intensity,
            check_col: true,
            delete_me: false,
            ext_move_ctrl: false,
            effect: if def.effect_tag.is_some() { effect } else { None },
            ramp,
            def,
        }
    }

    /// Normalized lifetime counter.
    pub fn cur_time(&self) -> f32 {
        self.cur_time
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn sq_radius(&self) -> f32 {
        self.sq_radius
    }

    pub fn draw_radius(&self) -> f32 {
        self.draw_radius
    }

    pub fn weapon_def(&self) -> &WeaponDef {
        &self.def
    }
}

impl Projectile for FlameProjectile {
    fn update(&mut self, ground: &dyn GroundMap) {
        debug_assert!(!self.delete_me, "expired projectile ticked");

        if !self.ext_move_ctrl {
            self.pos += self.vel;
            if self.pos.y < ground.height_at(self.pos.x, self.pos.z) {
                self.ground_collision(ground);
            }
            self.vel += self.spread;
        }

        self.radius += self.def.size_growth;
        self.sq_radius = self.radius * self.radius;
        self.draw_radius = self.radius * self.def.collision_size;

        self.cur_time += self.inv_ttl;
        if self.cur_time > self.phys_life {
            self.check_col = false;
        }
        if self.cur_time > 1.0 {
            self.cur_time = 1.0;
            self.delete_me = true;
        }

        if let Some(effect) = &mut self.effect {
            effect.emit(self.pos, self.cur_time, self.intensity, self.vel);
        }
    }

    fn draw(&self, camera: &Camera, batch: &mut BillboardBatch) {
        let color = self.ramp.color_at(self.cur_time);
        batch.add_quad(
            self.pos,
            camera.right(),
            camera.up(),
            self.radius,
            &self.def.texture,
            color,
        );
    }

    fn ground_collision(&mut self, ground: &dyn GroundMap) {
        // Water weapons never collide with the water surface: above the
        // (water-inclusive) sample they pass through untouched.
        if ground.height_at(self.pos.x, self.pos.z) < self.pos.y && self.def.water_weapon {
            return;
        }
        // Bounce: cancel the inbound normal component, keep the tangential.
        let norm = ground.normal_at(self.pos.x, self.pos.z);
        let ns = self.vel.dot(norm);
        self.vel -= norm * ns;
        self.pos.y += BOUNCE_NUDGE;
        self.cur_time += BOUNCE_NUDGE;
    }

    fn unit_collision(&mut self, target: UnitId, handler: &mut dyn ImpactHandler) {
        handler.projectile_hit_unit(self.pos, target);
    }

    fn shield_repulse(&mut self, shield_pos: Vec3, force: f32, max_speed: f32) -> ShieldResponse {
        if !self.ext_move_ctrl {
            let rdir = (self.pos - shield_pos).normalize_or_zero();
            if rdir.dot(self.vel) < max_speed {
                self.vel += rdir * force;
                return ShieldResponse::Repulsed;
            }
        }
        ShieldResponse::Ignored
    }

    fn expired(&self) -> bool {
        self.delete_me
    }

    fn collision_enabled(&self) -> bool {
        self.check_col
    }

    fn pos(&self) -> Vec3 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::FlatGround;
    use renderer::TexRegion;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn flame_def(ttl: u32) -> Arc<WeaponDef> {
        Arc::new(WeaponDef {
            name: "flame".into(),
            size: 2.0,
            size_growth: 0.5,
            collision_size: 0.75,
            duration: 2.0, // phys_life = 0.5
            ttl,
            texture: TexRegion::full(),
            ..Default::default()
        })
    }

    fn airborne(def: Arc<WeaponDef>) -> FlameProjectile {
        FlameProjectile::new(
            Vec3::new(0.0, 100.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ZERO,
            def,
            None,
        )
    }

    #[test]
    fn ttl_ticks_drive_lifetime_to_exactly_one() {
        let ground = FlatGround::new(0.0);
        let mut p = airborne(flame_def(10));
        for _ in 0..9 {
            p.update(&ground);
            assert!(!p.expired());
        }
        p.update(&ground);
        assert!(p.expired());
        assert_eq!(p.cur_time(), 1.0);
    }

    #[test]
    fn collision_disables_after_physical_life() {
        let ground = FlatGround::new(0.0);
        let mut p = airborne(flame_def(10));
        // phys_life = 0.5: the 6th tick pushes cur_time past it.
        for _ in 0..5 {
            p.update(&ground);
        }
        assert!(p.collision_enabled());
        p.update(&ground);
        assert!(!p.collision_enabled());
        assert!(!p.expired());
    }

    #[test]
    fn radius_grows_and_derives_draw_radius() {
        let ground = FlatGround::new(0.0);
        let def = flame_def(10);
        let mut p = airborne(def.clone());
        assert_eq!(p.radius(), 2.0 * 0.75);
        assert_eq!(p.draw_radius(), 2.0);

        p.update(&ground);
        let r = 2.0 * 0.75 + 0.5;
        assert_eq!(p.radius(), r);
        assert_eq!(p.sq_radius(), r * r);
        assert_eq!(p.draw_radius(), r * 0.75);
    }

    #[test]
    fn update_integrates_velocity_and_accumulates_spread() {
        let ground = FlatGround::new(0.0);
        let def = flame_def(100);
        let mut p = FlameProjectile::new(
            Vec3::new(0.0, 50.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.1, 0.0),
            def,
            None,
        );
        p.update(&ground);
        assert_eq!(p.pos, Vec3::new(2.0, 50.0, 0.0));
        assert_eq!(p.vel, Vec3::new(2.0, 0.1, 0.0));
        p.update(&ground);
        // Spread applies after integration: second tick moved by (2, 0.1, 0).
        assert_eq!(p.pos, Vec3::new(4.0, 50.1, 0.0));
    }

    #[test]
    fn external_motion_control_suspends_integration() {
        let ground = FlatGround::new(0.0);
        let mut p = airborne(flame_def(10));
        p.ext_move_ctrl = true;
        let (pos, vel) = (p.pos, p.vel);
        p.update(&ground);
        assert_eq!(p.pos, pos);
        assert_eq!(p.vel, vel);
        // Lifetime still advances under external control.
        assert!(p.cur_time() > 0.0);
    }

    #[test]
    fn water_weapon_above_water_ignores_the_collision() {
        let ground = FlatGround::new(0.0);
        let def = Arc::new(WeaponDef {
            water_weapon: true,
            ..WeaponDef::default()
        });
        let mut p = FlameProjectile::new(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::ZERO,
            def,
            None,
        );
        let (pos, vel, t) = (p.pos, p.vel, p.cur_time());
        p.ground_collision(&ground);
        assert_eq!(p.pos, pos);
        assert_eq!(p.vel, vel);
        assert_eq!(p.cur_time(), t);
    }

    #[test]
    fn ground_bounce_cancels_the_normal_component_only() {
        let ground = FlatGround::new(10.0);
        let mut p = FlameProjectile::new(
            Vec3::new(0.0, 9.0, 0.0),
            Vec3::new(3.0, -2.0, 1.0),
            Vec3::ZERO,
            flame_def(10),
            None,
        );
        let t = p.cur_time();
        p.ground_collision(&ground);
        // Tangential velocity preserved, vertical cancelled.
        assert_eq!(p.vel, Vec3::new(3.0, 0.0, 1.0));
        assert_eq!(p.pos.y, 9.0 + BOUNCE_NUDGE);
        // The bounce advances the lifetime clock by the same fixed amount.
        assert_eq!(p.cur_time(), t + BOUNCE_NUDGE);
    }

    #[test]
    fn shield_repulse_pushes_slow_projectiles_only() {
        let mut p = airborne(flame_def(10));
        p.pos = Vec3::new(10.0, 0.0, 0.0);
        p.vel = Vec3::ZERO;

        // Slow along the repulse direction: pushed, component increases.
        let before = p.vel.x;
        let r = p.shield_repulse(Vec3::ZERO, 2.0, 5.0);
        assert_eq!(r, ShieldResponse::Repulsed);
        assert!(p.vel.x > before);

        // Already at the cap: ignored, velocity untouched.
        p.vel = Vec3::new(5.0, 0.0, 0.0);
        let vel = p.vel;
        assert_eq!(p.shield_repulse(Vec3::ZERO, 2.0, 5.0), ShieldResponse::Ignored);
        assert_eq!(p.vel, vel);
    }

    #[test]
    fn shield_repulse_is_inert_under_external_motion_control() {
        let mut p = airborne(flame_def(10));
        p.ext_move_ctrl = true;
        p.pos = Vec3::new(10.0, 0.0, 0.0);
        p.vel = Vec3::ZERO;
        assert_eq!(p.shield_repulse(Vec3::ZERO, 2.0, 5.0), ShieldResponse::Ignored);
        assert_eq!(p.vel, Vec3::ZERO);
    }

    #[test]
    fn draw_reads_state_and_emits_one_ccw_quad() {
        let p = airborne(flame_def(10));
        let camera = Camera::default();
        let mut batch = BillboardBatch::new();
        let t = p.cur_time();
        p.draw(&camera, &mut batch);

        assert_eq!(p.cur_time(), t);
        assert_eq!(batch.quad_count(), 1);
        let v = batch.vertices();
        let r = p.radius();
        assert_eq!(v[0].position, [-r, 100.0 - r, 0.0]);
        assert_eq!(v[2].position, [r, 100.0 + r, 0.0]);
        // Colour comes from the ramp at the current lifetime.
        assert_eq!(v[0].color, [255, 255, 255, 255]);
    }

    struct RecordingEffect(Rc<RefCell<Vec<(Vec3, f32)>>>);

    impl EffectGen for RecordingEffect {
        fn emit(&mut self, pos: Vec3, progress: f32, _intensity: f32, _vel: Vec3) {
            self.0.borrow_mut().push((pos, progress));
        }
    }

    #[test]
    fn effect_hook_fires_only_with_a_configured_tag() {
        let ground = FlatGround::new(0.0);
        let calls = Rc::new(RefCell::new(Vec::new()));

        // Tagged weapon: hook bound and fired each tick.
        let def = Arc::new(WeaponDef {
            effect_tag: Some("flame_trail".into()),
            ..WeaponDef::default()
        });
        let mut p = FlameProjectile::new(
            Vec3::new(0.0, 50.0, 0.0),
            Vec3::X,
            Vec3::ZERO,
            def,
            Some(Box::new(RecordingEffect(calls.clone()))),
        );
        p.update(&ground);
        p.update(&ground);
        assert_eq!(calls.borrow().len(), 2);
        assert!(calls.borrow()[1].1 > calls.borrow()[0].1);

        // Untagged weapon: the hook is discarded at construction.
        let silent = Rc::new(RefCell::new(Vec::new()));
        let mut q = airborne_with_effect(silent.clone());
        q.update(&ground);
        assert!(silent.borrow().is_empty());
    }

    fn airborne_with_effect(calls: Rc<RefCell<Vec<(Vec3, f32)>>>) -> FlameProjectile {
        FlameProjectile::new(
            Vec3::new(0.0, 50.0, 0.0),
            Vec3::X,
            Vec3::ZERO,
            flame_def(10), // no effect_tag
            Some(Box::new(RecordingEffect(calls))),
        )
    }
}
