//! Fixed-timestep tick clock.
//!
//! Simulation state (projectiles, piece poses) is mutated once per tick;
//! render passes read it between ticks. The clock owns the accumulator that
//! enforces this alternation: feed it wall-clock deltas, then drain
//! [`TickClock::should_tick`] before drawing the frame.

/// Drives the per-tick simulation at a fixed rate (default 30 Hz).
#[derive(Debug, Clone)]
pub struct TickClock {
    /// Length of one simulation tick in seconds.
    tick_step: f32,
    /// Wall-clock time not yet consumed by ticks.
    accumulator: f32,
    /// Ticks elapsed since creation.
    tick_count: u64,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(30.0)
    }
}

impl TickClock {
    /// Create a clock ticking at the given rate in Hz.
    pub fn new(hz: f32) -> Self {
        Self {
            tick_step: 1.0 / hz,
            accumulator: 0.0,
            tick_count: 0,
        }
    }

    /// Add a frame's worth of wall-clock time.
    pub fn advance(&mut self, dt: f32) {
        self.accumulator += dt.max(0.0);
    }

    /// Consume one tick's worth of accumulated time if available. Call in a
    /// loop until it returns `false`, running one simulation pass per `true`.
    pub fn should_tick(&mut self) -> bool {
        if self.accumulator >= self.tick_step {
            self.accumulator -= self.tick_step;
            self.tick_count += 1;
            true
        } else {
            false
        }
    }

    /// Length of one tick in seconds.
    pub fn tick_seconds(&self) -> f32 {
        self.tick_step
    }

    /// Total ticks elapsed.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Fraction of the next tick already accumulated, in `[0, 1)`. Render
    /// passes may use this to interpolate between sim states.
    pub fn interp(&self) -> f32 {
        (self.accumulator / self.tick_step).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_at_fixed_rate() {
        let mut clock = TickClock::new(30.0);
        clock.advance(1.0);
        let mut ticks = 0;
        while clock.should_tick() {
            ticks += 1;
        }
        assert_eq!(ticks, 30);
        assert_eq!(clock.tick_count(), 30);
    }

    #[test]
    fn no_tick_before_step_accumulates() {
        let mut clock = TickClock::new(10.0);
        clock.advance(0.05);
        assert!(!clock.should_tick());
        clock.advance(0.05);
        assert!(clock.should_tick());
        assert!(!clock.should_tick());
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut clock = TickClock::new(10.0);
        clock.advance(-5.0);
        assert!(!clock.should_tick());
        assert_eq!(clock.interp(), 0.0);
    }
}
