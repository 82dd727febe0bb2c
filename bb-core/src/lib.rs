//! # BB Core
//!
//! A physics engine for balls rolling on a billiard table.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec2, Body, snapshots, numeric thresholds)
//! - `rules`: Table rule sets, compiled in or loaded from YAML
//! - `integrator`: Per-ball step (move, cushions, friction)
//! - `forces`: Cloth friction (slide-to-roll coupling, rolling resistance)
//! - `collision`: Time-of-impact detection and elastic resolution
//! - `simulation`: Tick scheduler owning every ball on the table
//! - `rack`: Starting layout
//! - `cue`: Aimed strokes to impulses
//!
//! ## Example
//!
//! ```
//! use bb_core::{rack, Shot, Simulation, TableRules};
//!
//! let rules = TableRules::standard();
//! let balls = rack::standard_rack(&rules);
//! let mut table = Simulation::new(rules, balls).unwrap();
//!
//! table.apply_impulse(0, Shot::from_angle(0.0, 300.0).impulse()).unwrap();
//! while table.tick() {
//!     let _draw = table.positions();
//! }
//! ```

pub mod collision;
pub mod cue;
pub mod forces;
pub mod integrator;
pub mod rack;
pub mod rules;
pub mod simulation;
pub mod types;

pub use cue::Shot;
pub use rules::{RulesError, RulesLoader, TableRules};
pub use simulation::{Simulation, SimulationError};
pub use types::{BallKind, Body, BodySnapshot, Vec2};
