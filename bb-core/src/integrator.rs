//! Per-ball integration over one step.
//!
//! A step is explicit and first order. Balls on a billiard table move in
//! straight lines between contacts, so the position update is exact for the
//! velocity held at the start of the step; friction is then applied as an
//! impulse for the whole step.
//!
//! ## Algorithm
//!
//! ```text
//! 1. at rest?          -> clear `moving`, done
//! 2. x_new = x + v*dt
//! 3. for each cushion crossed: clamp x, bounce v, slip spin
//! 4. friction(v, spin, dt)
//! 5. moving = v != 0 || spin != 0
//! ```
//!
//! Ball-ball contacts are not handled here; the scheduler splits the step
//! around them.

use crate::collision::{CollisionResolver, Cushion};
use crate::forces::{ClothFriction, FrictionModel};
use crate::rules::TableRules;
use crate::types::Body;

impl Body {
    /// Advance this ball by `dt` seconds on the reference cloth.
    pub fn advance(&mut self, dt: f64, rules: &TableRules) {
        self.advance_with(dt, rules, &ClothFriction);
    }

    /// Advance this ball by `dt` seconds with a custom friction model.
    pub fn advance_with<F: FrictionModel>(&mut self, dt: f64, rules: &TableRules, friction: &F) {
        if self.velocity.is_zero() && self.spin_velocity.is_zero() {
            self.moving = false;
            return;
        }

        self.position += self.velocity * dt;

        for cushion in Cushion::ALL {
            if cushion.is_crossed_by(self.position, rules) {
                CollisionResolver::rebound(self, cushion, rules);
            }
        }

        friction.apply(self, rules, dt);

        self.refresh_moving();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BallKind, Vec2};

    /// No cloth at all: balls keep their velocity forever
    struct Frictionless;

    impl FrictionModel for Frictionless {
        fn apply(&self, _: &mut Body, _: &TableRules, _: f64) {}
    }

    fn rules() -> TableRules {
        TableRules::standard()
    }

    #[test]
    fn test_straight_line_motion() {
        let rules = rules();
        let mut body = Body::with_state(
            BallKind::Cue,
            Vec2::new(100.0, 80.0),
            Vec2::new(30.0, -12.0),
            Vec2::new(30.0, -12.0),
        );

        body.advance_with(1.0, &rules, &Frictionless);

        assert!((body.position().x - 130.0).abs() < 1e-10);
        assert!((body.position().y - 68.0).abs() < 1e-10);
        assert_eq!(body.velocity(), Vec2::new(30.0, -12.0));
    }

    #[test]
    fn test_resting_ball_is_untouched() {
        let rules = rules();
        let mut body = Body::at_rest(BallKind::Red, Vec2::new(100.0, 80.0));
        // A stale flag is cleared by the fast path
        body.moving = true;

        body.advance(rules.tick, &rules);

        assert!(!body.is_moving());
        assert_eq!(body.position(), Vec2::new(100.0, 80.0));
    }

    #[test]
    fn test_right_cushion_rebound_sign() {
        let rules = rules();
        let v = 120.0;
        let mut body = Body::with_state(
            BallKind::Cue,
            Vec2::new(rules.width - rules.radius - 0.5, 80.0),
            Vec2::new(v, 0.0),
            Vec2::new(v, 0.0),
        );

        body.advance_with(rules.tick, &rules, &Frictionless);

        assert_eq!(body.position().x, rules.width - rules.radius);
        assert!(
            (body.velocity().x - v * rules.wall_damping).abs() < 1e-10,
            "Expected vx={}, got {}",
            v * rules.wall_damping,
            body.velocity().x
        );
    }

    #[test]
    fn test_corner_hits_two_cushions() {
        let rules = rules();
        let mut body = Body::with_state(
            BallKind::Cue,
            Vec2::new(rules.radius + 0.2, rules.radius + 0.2),
            Vec2::new(-60.0, -60.0),
            Vec2::new(-60.0, -60.0),
        );

        body.advance(rules.tick, &rules);

        assert_eq!(body.position(), Vec2::new(rules.radius, rules.radius));
        assert!(body.velocity().x > 0.0);
        assert!(body.velocity().y > 0.0);
    }

    #[test]
    fn test_friction_applies_after_move() {
        let rules = rules();
        let mut body = Body::with_state(
            BallKind::Cue,
            Vec2::new(100.0, 80.0),
            Vec2::new(60.0, 0.0),
            Vec2::new(60.0, 0.0),
        );

        body.advance(rules.tick, &rules);

        // Position uses the velocity from the start of the step
        assert!((body.position().x - 101.0).abs() < 1e-10);
        assert!(body.velocity().x < 60.0);
        assert!(body.is_moving());
    }

    #[test]
    fn test_rolling_ball_eventually_stops() {
        let rules = rules();
        let mut body = Body::at_rest(BallKind::Cue, Vec2::new(100.0, 80.0));
        body.apply_impulse(Vec2::new(40.0, 25.0));

        let mut ticks = 0;
        while body.is_moving() && ticks < 10_000 {
            body.advance(rules.tick, &rules);
            ticks += 1;
        }

        assert!(!body.is_moving(), "Ball should stop, still moving after {} ticks", ticks);
        assert_eq!(body.velocity(), Vec2::ZERO);
        assert_eq!(body.spin_velocity(), Vec2::ZERO);
    }
}
