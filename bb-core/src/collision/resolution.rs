//! Collision response.
//!
//! ## Ball-ball
//!
//! Balls are equal-mass, perfectly elastic and frictionless against each
//! other. At contact only the velocity components along the line of centres
//! change, and with equal masses they simply swap:
//!
//! ```text
//!        n
//!   ●────────→●          ●        ●───→
//!   A  (v, 0) B   ==>    A (0,0)  B (v, 0)
//! ```
//!
//! Spin is untouched; the cloth sorts it out afterwards.
//!
//! ## Ball-cushion
//!
//! The normal component is reversed and damped by `wall_damping`. The
//! cushion also grips the ball, so the matching spin component takes a slip
//! impulse equal to the incoming normal velocity.

use crate::collision::detection::Cushion;
use crate::rules::TableRules;
use crate::types::{constants, Body};

/// Collision resolver for balls and cushions.
pub struct CollisionResolver;

impl CollisionResolver {
    /// Exchange the normal velocity components of two touching balls.
    ///
    /// Both balls are marked moving. Coincident centres have no defined
    /// normal and are left untouched.
    pub fn resolve_contact(a: &mut Body, b: &mut Body) {
        let offset = b.position - a.position;
        let distance = offset.magnitude();
        if distance < constants::EPSILON {
            return;
        }
        let normal = offset / distance;

        let a_normal = normal * a.velocity.dot(&normal);
        let b_normal = normal * b.velocity.dot(&normal);

        a.velocity -= a_normal;
        a.velocity += b_normal;
        b.velocity -= b_normal;
        b.velocity += a_normal;

        a.moving = true;
        b.moving = true;
    }

    /// Push a ball back onto the cloth and bounce it off a cushion it has
    /// crossed.
    pub fn rebound(body: &mut Body, cushion: Cushion, rules: &TableRules) {
        let rest = cushion.rest_coordinate(rules);
        let (position, velocity, spin) = match cushion {
            Cushion::Right | Cushion::Left => (
                &mut body.position.x,
                &mut body.velocity.x,
                &mut body.spin_velocity.x,
            ),
            Cushion::Bottom | Cushion::Top => (
                &mut body.position.y,
                &mut body.velocity.y,
                &mut body.spin_velocity.y,
            ),
        };

        *position = rest;
        if *spin * (*spin - *velocity) < 0.0 {
            *spin = 0.0;
        } else {
            *spin -= *velocity;
        }
        *velocity *= rules.wall_damping;

        log::trace!(
            "{:?} ball off {:?} cushion, normal velocity now {:.3}",
            body.kind,
            cushion,
            *velocity
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
