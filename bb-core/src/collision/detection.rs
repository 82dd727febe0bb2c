//! Continuous collision detection.
//!
//! Ball-ball contacts are found analytically: with both balls moving at
//! constant velocity over a tick, the centre separation is a quadratic in
//! time and the first root where it equals two radii is the instant of
//! tangency. Cushions are simple half-planes checked after integration.

use crate::rules::TableRules;
use crate::types::{constants, Body, Vec2};

/// One of the four cushions, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cushion {
    /// x = width
    Right,
    /// x = 0
    Left,
    /// y = height
    Bottom,
    /// y = 0
    Top,
}

impl Cushion {
    pub const ALL: [Cushion; 4] = [Cushion::Right, Cushion::Left, Cushion::Bottom, Cushion::Top];

    /// True when a ball centred at `position` sticks through this cushion.
    pub fn is_crossed_by(&self, position: Vec2, rules: &TableRules) -> bool {
        match self {
            Cushion::Right => position.x + rules.radius > rules.width,
            Cushion::Left => position.x - rules.radius < 0.0,
            Cushion::Bottom => position.y + rules.radius > rules.height,
            Cushion::Top => position.y - rules.radius < 0.0,
        }
    }

    /// Centre coordinate of a ball resting against this cushion.
    pub fn rest_coordinate(&self, rules: &TableRules) -> f64 {
        match self {
            Cushion::Right => rules.width - rules.radius,
            Cushion::Left | Cushion::Top => rules.radius,
            Cushion::Bottom => rules.height - rules.radius,
        }
    }
}

/// Earliest ball-ball contact found for one body within a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Index of the other body
    pub partner: usize,
    /// Time from the start of the tick until the balls touch
    pub time: f64,
}

/// Collision detector for balls on the cloth.
pub struct CollisionDetector;

impl CollisionDetector {
    /// Time until two balls first touch, assuming both keep their current
    /// velocity.
    ///
    /// Solves `|Δp + Δv·t| = 2r` for the smaller root. Returns `None` when
    /// the balls are not closing on each other, when their relative speed is
    /// negligible, or when their paths never come within contact distance.
    pub fn time_to_contact(a: &Body, b: &Body, rules: &TableRules) -> Option<f64> {
        let dv = a.velocity - b.velocity;
        let dp = a.position - b.position;

        let qa = dv.magnitude_squared();
        if qa < constants::CONTACT_SPEED_SQ_EPSILON {
            return None;
        }

        let qb = 2.0 * dp.dot(&dv);
        if qb >= 0.0 {
            // Separating
            return None;
        }

        let contact = rules.contact_distance();
        let qc = dp.magnitude_squared() - contact * contact;

        let discriminant = qb * qb - 4.0 * qa * qc;
        if discriminant < 0.0 {
            return None;
        }

        Some((-qb - discriminant.sqrt()) / (2.0 * qa))
    }

    /// Find the earliest contact between `bodies[index]` and any other body
    /// that happens before `dt`.
    ///
    /// `body` is tested against `others`, which the caller supplies as the
    /// state of the table at the start of the tick. The slot at `index` is
    /// skipped. Ties keep the lower index.
    ///
    /// A contact time below zero means the balls already overlap and are
    /// still closing; it is reported as an immediate contact.
    pub fn earliest_contact(
        body: &Body,
        index: usize,
        others: &[Body],
        rules: &TableRules,
        dt: f64,
    ) -> Option<Contact> {
        let mut earliest: Option<Contact> = None;

        for (j, other) in others.iter().enumerate() {
            if j == index {
                continue;
            }
            let Some(time) = Self::time_to_contact(body, other, rules) else {
                continue;
            };
            if time >= dt {
                continue;
            }
            let time = time.max(0.0);
            if earliest.map_or(true, |e| time < e.time) {
                earliest = Some(Contact { partner: j, time });
            }
        }

        earliest
    }
}

// =============================================================================
// Tests
// =============================================================================
