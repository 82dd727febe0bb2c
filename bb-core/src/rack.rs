//! Starting layout of the balls.
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐
//!  │          │                                                │
//!  │   Y      │                                                │
//!  │ ( B  C   │           Bl            Pk ○ ○○○         Bk    │
//!  │   G      │                            (reds)              │
//!  │          │                                                │
//!  └──────────────────────────────────────────────────────────┘
//!        baulk line at x = 74
//! ```

use crate::rules::TableRules;
use crate::types::{BallKind, Body, Vec2};

/// X coordinate of the baulk line.
pub const BAULK_X: f64 = 74.0;

/// Radius of the semicircle behind the baulk line ("the D").
pub const D_RADIUS: f64 = 29.0;

const CUE_OFFSET: f64 = 15.0;
const BLACK_FROM_CUSHION: f64 = 32.4;
const RED_ROWS: usize = 5;

/// Clearance added between reds so the rack starts without contacts.
const RED_CLEARANCE: f64 = 0.5;
const RED_ROW_SPACING: f64 = 1.74;

/// The full set of balls in setup order: cue ball, colours, then the 15
/// reds in a triangle pointing at the pink.
pub fn standard_rack(rules: &TableRules) -> Vec<Body> {
    let w = rules.width;
    let mid = rules.height * 0.5;
    let r = rules.radius;

    let mut bodies = vec![
        Body::at_rest(BallKind::Cue, Vec2::new(BAULK_X, mid + CUE_OFFSET)),
        Body::at_rest(BallKind::Black, Vec2::new(w - BLACK_FROM_CUSHION, mid)),
        Body::at_rest(BallKind::Yellow, Vec2::new(BAULK_X, mid + D_RADIUS)),
        Body::at_rest(BallKind::Green, Vec2::new(BAULK_X, mid - D_RADIUS)),
        Body::at_rest(BallKind::Blue, Vec2::new(w * 0.5, mid)),
        Body::at_rest(BallKind::Pink, Vec2::new(w * 0.75, mid)),
        Body::at_rest(BallKind::Brown, Vec2::new(BAULK_X, mid)),
    ];

    let apex_x = w * 0.75 + 2.0 * r + 1.0;
    for row in 0..RED_ROWS {
        for slot in 0..=row {
            let x = apex_x + row as f64 * r * RED_ROW_SPACING;
            let y = mid + row as f64 * (r + RED_CLEARANCE)
                - slot as f64 * 2.0 * (r + RED_CLEARANCE);
            bodies.push(Body::at_rest(BallKind::Red, Vec2::new(x, y)));
        }
    }

    bodies
}

// =============================================================================
// Tests
// =============================================================================
