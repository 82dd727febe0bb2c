//! Core types for the billiard simulation.
//!
//! Units are table-local:
//! - Position: table units (the reference table is 357 x 179)
//! - Velocity: table units per second
//! - Time: seconds
//!
//! The table is viewed from above. X runs along the long side, Y along the
//! short side, both starting at the top-left cushion corner.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::rules::TableRules;

// =============================================================================
// Vec2 - 2D Vector
// =============================================================================

/// A 2D vector used for positions, velocities and impulses on the cloth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean distance between two points
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// True when both components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl Div<f64> for Vec2 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Default for Vec2 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Ball identity
// =============================================================================

/// Which ball a body is. Physics never looks at this; it is carried so hosts
/// can colour and name what they draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallKind {
    Cue,
    Black,
    Yellow,
    Green,
    Blue,
    Pink,
    Brown,
    Red,
}

// =============================================================================
// Body
// =============================================================================

/// One ball on the cloth.
///
/// `spin_velocity` is the velocity of the ball's surface at the contact
/// point, a 2D stand-in for real angular velocity. While the ball rolls
/// without slipping it equals `velocity`; right after a cue strike or a
/// collision the two differ and cloth friction drags them back together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub kind: BallKind,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) spin_velocity: Vec2,
    pub(crate) moving: bool,
}

impl Body {
    /// Ball at rest at a given position
    pub fn at_rest(kind: BallKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            velocity: Vec2::ZERO,
            spin_velocity: Vec2::ZERO,
            moving: false,
        }
    }

    /// Ball with an explicit kinematic state. `moving` is derived.
    pub fn with_state(kind: BallKind, position: Vec2, velocity: Vec2, spin_velocity: Vec2) -> Self {
        let mut body = Self {
            kind,
            position,
            velocity,
            spin_velocity,
            moving: false,
        };
        body.refresh_moving();
        body
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn spin_velocity(&self) -> Vec2 {
        self.spin_velocity
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    /// Add a cue impulse to the linear velocity. Spin is left alone, so a
    /// freshly struck ball starts out sliding.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse;
        self.moving = true;
    }

    /// Translational kinetic energy.
    pub fn kinetic_energy(&self, rules: &TableRules) -> f64 {
        0.5 * rules.mass * self.velocity.magnitude_squared()
    }

    pub(crate) fn refresh_moving(&mut self) {
        self.moving = !(self.velocity.is_zero() && self.spin_velocity.is_zero());
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Read-only copy of a body, for hosts that render outside the tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub kind: BallKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub moving: bool,
}

impl From<&Body> for BodySnapshot {
    fn from(body: &Body) -> Self {
        Self {
            kind: body.kind,
            position: body.position,
            velocity: body.velocity,
            moving: body.moving,
        }
    }
}

// =============================================================================
// Numeric Constants
// =============================================================================

/// Thresholds shared by the physics routines.
pub mod constants {
    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;

    /// Squared relative speed below which two balls are treated as never
    /// converging.
    pub const CONTACT_SPEED_SQ_EPSILON: f64 = 0.001;

    /// Squared slip speed above which a ball is sliding rather than rolling.
    pub const SLIDING_SLIP_SQ: f64 = 0.04;

    /// Spin loses 2.5 units for every unit of velocity friction adds while
    /// sliding (solid sphere, I = 2/5 m r^2).
    pub const SPIN_COUPLING: f64 = 2.5;

    /// Share of rolling resistance felt by a ball rolling without slip.
    pub const ROLLING_INERTIA_FACTOR: f64 = 5.0 / 7.0;
}

// =============================================================================
// Tests
// =============================================================================
