//! Collision detection and resolution for balls on the cloth.
//!
//! This module handles:
//! - **Detection**: when two balls first touch within a tick, and which
//!   cushions a ball has crossed
//! - **Resolution**: velocity exchange between balls, rebound off cushions
//!
//! ## Time of Impact
//!
//! Checking for overlap at the end of a tick lets fast balls pass through
//! each other. Instead the scheduler asks when, inside the tick, the two
//! paths first come exactly two radii apart, moves the ball to that instant,
//! resolves, and spends the rest of the tick on the new velocity.
//!
//! ```text
//! t=0                t*          t=dt
//!  ●─────────────────●○
//!  A                 A B  ── exchange ──→  ○────→
//! ```

pub mod detection;
pub mod resolution;

pub use detection::*;
pub use resolution::*;
