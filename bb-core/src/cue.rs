//! Turning an aimed cue stroke into an impulse.
//!
//! The player aims by pointing somewhere on the table. The cue is drawn on
//! the far side of the ball and sends it toward the pointer. Strength is
//! charged by the host; the core accepts any value.

use serde::{Deserialize, Serialize};

use crate::types::{constants, Vec2};

/// Largest strength a host normally lets the player charge.
pub const MAX_STRENGTH: f64 = 500.0;

/// Unit direction a ball at `ball` travels when aimed at `pointer`.
///
/// `None` when the pointer sits on the ball centre, where no direction is
/// defined.
pub fn aim_direction(ball: Vec2, pointer: Vec2) -> Option<Vec2> {
    let offset = pointer - ball;
    let distance = offset.magnitude();
    if distance < constants::EPSILON {
        None
    } else {
        Some(offset / distance)
    }
}

/// An aimed stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Unit direction of travel
    pub direction: Vec2,
    pub strength: f64,
}

impl Shot {
    pub fn new(direction: Vec2, strength: f64) -> Self {
        Self {
            direction: direction.normalized(),
            strength,
        }
    }

    /// Stroke along an angle in degrees, measured from +X toward +Y.
    pub fn from_angle(degrees: f64, strength: f64) -> Self {
        let radians = degrees.to_radians();
        Self::new(Vec2::new(radians.cos(), radians.sin()), strength)
    }

    /// Stroke aimed from a pointer position.
    pub fn from_pointer(ball: Vec2, pointer: Vec2, strength: f64) -> Option<Self> {
        aim_direction(ball, pointer).map(|direction| Self {
            direction,
            strength,
        })
    }

    /// The same stroke with strength limited to `0..=MAX_STRENGTH`.
    pub fn clamped(self) -> Self {
        Self {
            strength: self.strength.clamp(0.0, MAX_STRENGTH),
            ..self
        }
    }

    pub fn impulse(&self) -> Vec2 {
        self.direction * self.strength
    }
}

// =============================================================================
// Tests
// =============================================================================
