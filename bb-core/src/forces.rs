//! Cloth friction acting on a ball.
//!
//! A ball on the cloth is in one of two regimes:
//!
//! - **Sliding**: the contact point moves relative to the cloth
//!   (`spin_velocity != velocity`). Kinetic friction of fixed magnitude acts
//!   along the slip, speeding translation up toward the spin and winding the
//!   spin down toward the translation until the two meet.
//! - **Rolling**: the contact point is at rest. Only rolling resistance
//!   acts, and it slows translation and spin together.
//!
//! ```text
//! Stun shot just after the cue strike:
//!
//!     velocity ───────→          spin_velocity  ·  (zero)
//!     slip = spin - velocity  ←────  friction pushes spin forward,
//!                                    holds translation back
//! ```
//!
//! Rolling resistance opposes translation in both regimes.

use crate::rules::TableRules;
use crate::types::{constants, Body, Vec2};

/// Trait for the friction applied to a ball once per integration step.
///
/// Implementations update `velocity` and `spin_velocity` in place; the
/// integrator has already moved the ball and handled cushions.
pub trait FrictionModel {
    fn apply(&self, body: &mut Body, rules: &TableRules, dt: f64);
}

/// The reference cloth: slide-to-roll coupling plus rolling resistance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClothFriction;

impl ClothFriction {
    /// Rolling resistance force, opposite to travel. Zero for a ball that is
    /// not translating.
    fn rolling_resistance(velocity: Vec2, rules: &TableRules) -> Vec2 {
        let speed = velocity.magnitude();
        if speed == 0.0 {
            Vec2::ZERO
        } else {
            velocity * (-rules.rotational_friction / speed)
        }
    }

    /// Take one axis of a sliding update. If translation and spin would cross
    /// over each other, meet in the middle instead of overshooting.
    fn settle_axis(velocity: f64, spin: f64, new_velocity: f64, new_spin: f64) -> (f64, f64) {
        if (velocity - spin) * (new_velocity - new_spin) < 0.0 {
            let mean = (new_velocity + new_spin) / 2.0;
            (mean, mean)
        } else {
            (new_velocity, new_spin)
        }
    }
}

impl FrictionModel for ClothFriction {
    fn apply(&self, body: &mut Body, rules: &TableRules, dt: f64) {
        // Force to velocity change over this step
        let k = rules.force_scale * dt / rules.mass;

        let velocity = body.velocity;
        let spin = body.spin_velocity;
        let slip = spin - velocity;
        let rolling = Self::rolling_resistance(velocity, rules);

        if slip.magnitude_squared() > constants::SLIDING_SLIP_SQ {
            let friction = slip * (rules.friction / slip.magnitude());

            let new_velocity = velocity + (friction + rolling) * k;
            let new_spin = spin - friction * (constants::SPIN_COUPLING * k);

            let (vx, sx) = Self::settle_axis(velocity.x, spin.x, new_velocity.x, new_spin.x);
            let (vy, sy) = Self::settle_axis(velocity.y, spin.y, new_velocity.y, new_spin.y);

            body.velocity = Vec2::new(vx, vy);
            body.spin_velocity = Vec2::new(sx, sy);
        } else {
            let new_velocity = velocity + rolling * (constants::ROLLING_INERTIA_FACTOR * k);

            if new_velocity.dot(&velocity) <= 0.0 {
                // Rolled to a stop within this step
                body.velocity = Vec2::ZERO;
                body.spin_velocity = Vec2::ZERO;
            } else {
                body.velocity = new_velocity;
                body.spin_velocity = new_velocity;
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
