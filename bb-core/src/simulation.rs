//! The table: owns every ball and advances them one tick at a time.
//!
//! ## Tick scheduling
//!
//! At the start of a tick the table takes a snapshot of every ball. Each
//! moving ball, in setup order, then:
//!
//! 1. finds its earliest contact with any other ball before the tick ends,
//!    testing against the snapshot so that balls processed earlier in the
//!    same tick do not change what later balls see;
//! 2. if there is one, advances to the contact instant, exchanges velocity
//!    with the partner and advances through the rest of the tick. The
//!    exchange is skipped when the partner has since been knocked out of
//!    reach: the live pair must be no further apart than the contact
//!    distance plus the ground the partner could cover at its tick-start
//!    speed;
//! 3. otherwise advances through the whole tick.
//!
//! At most one contact per ball is resolved per tick. A second contact that
//! would fall in the remainder of the same tick is picked up on the next one.

use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::collision::{CollisionDetector, CollisionResolver};
use crate::rules::{RulesError, TableRules};
use crate::types::{Body, BodySnapshot, Vec2};

/// Slack allowed when checking a starting layout for overlaps.
const OVERLAP_TOLERANCE: f64 = 1e-9;

/// Slack on the live distance check before two balls exchange velocity.
const CONTACT_SLACK: f64 = 1e-6;

/// Error type for table setup and driver operations.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    InvalidRules(#[from] RulesError),
    #[error("ball {index} at ({x:.3}, {y:.3}) is outside the cushions")]
    OutOfBounds { index: usize, x: f64, y: f64 },
    #[error("balls {first} and {second} overlap")]
    Overlap { first: usize, second: usize },
    #[error("no ball with index {0}")]
    UnknownBody(usize),
    #[error("table still moving after {0} ticks")]
    DidNotSettle(usize),
}

/// A billiard table and the balls on it.
#[derive(Debug, Clone, Serialize)]
pub struct Simulation {
    rules: TableRules,
    bodies: Vec<Body>,
}

impl Simulation {
    /// Set up a table. The rules must validate and the balls must all sit
    /// on the cloth without touching through each other.
    pub fn new(rules: TableRules, bodies: Vec<Body>) -> Result<Self, SimulationError> {
        rules.validate()?;

        for (i, body) in bodies.iter().enumerate() {
            let p = body.position();
            let inside = p.x >= rules.radius
                && p.x <= rules.width - rules.radius
                && p.y >= rules.radius
                && p.y <= rules.height - rules.radius;
            if !inside {
                return Err(SimulationError::OutOfBounds {
                    index: i,
                    x: p.x,
                    y: p.y,
                });
            }
        }

        let contact = rules.contact_distance();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let gap = bodies[i].position().distance(&bodies[j].position());
                if gap < contact - OVERLAP_TOLERANCE {
                    return Err(SimulationError::Overlap { first: i, second: j });
                }
            }
        }

        Ok(Self { rules, bodies })
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    /// Ball centres in setup order, for drawing.
    pub fn positions(&self) -> Vec<Vec2> {
        self.bodies.iter().map(Body::position).collect()
    }

    /// Copy of the table state that can be handed to another thread.
    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        self.bodies.iter().map(BodySnapshot::from).collect()
    }

    pub fn any_moving(&self) -> bool {
        self.bodies.iter().any(Body::is_moving)
    }

    pub fn total_kinetic_energy(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.kinetic_energy(&self.rules))
            .sum()
    }

    /// Strike a ball.
    pub fn apply_impulse(&mut self, index: usize, impulse: Vec2) -> Result<(), SimulationError> {
        let body = self
            .bodies
            .get_mut(index)
            .ok_or(SimulationError::UnknownBody(index))?;
        body.apply_impulse(impulse);
        debug!(
            "ball {} struck with impulse ({:.3}, {:.3})",
            index, impulse.x, impulse.y
        );
        Ok(())
    }

    /// Advance the table by one tick of the rule set's duration.
    ///
    /// Returns whether any ball is still moving.
    pub fn tick(&mut self) -> bool {
        let dt = self.rules.tick;
        self.tick_by(dt)
    }

    /// Advance the table by `dt` seconds.
    ///
    /// Returns whether any ball is still moving.
    pub fn tick_by(&mut self, dt: f64) -> bool {
        let start = self.bodies.clone();

        for i in 0..self.bodies.len() {
            if !self.bodies[i].is_moving() {
                continue;
            }

            let contact =
                CollisionDetector::earliest_contact(&self.bodies[i], i, &start, &self.rules, dt);

            match contact {
                Some(contact) => {
                    self.bodies[i].advance(contact.time, &self.rules);

                    // The partner may have been knocked elsewhere earlier in
                    // this tick; only exchange if it is still within reach.
                    let reach = self.rules.contact_distance()
                        + start[contact.partner].speed() * dt
                        + CONTACT_SLACK;
                    let (body, partner) = pair_mut(&mut self.bodies, i, contact.partner);
                    let gap = body.position().distance(&partner.position());
                    if gap <= reach {
                        debug!(
                            "ball {} meets ball {} at t={:.6}",
                            i, contact.partner, contact.time
                        );
                        CollisionResolver::resolve_contact(body, partner);
                    } else {
                        debug!(
                            "ball {} skips ball {}: {:.3} apart at t={:.6}",
                            i, contact.partner, gap, contact.time
                        );
                    }

                    self.bodies[i].advance(dt - contact.time, &self.rules);
                }
                None => self.bodies[i].advance(dt, &self.rules),
            }
        }

        self.any_moving()
    }

    /// Tick until every ball has stopped.
    ///
    /// Returns the number of ticks taken, or an error if the table was still
    /// moving after `max_ticks`.
    pub fn run_until_rest(&mut self, max_ticks: usize) -> Result<usize, SimulationError> {
        let mut ticks = 0;
        while self.any_moving() {
            if ticks == max_ticks {
                warn!("giving up after {} ticks with balls still moving", ticks);
                return Err(SimulationError::DidNotSettle(ticks));
            }
            self.tick();
            ticks += 1;
        }
        info!(
            "table at rest after {} ticks ({:.2}s)",
            ticks,
            ticks as f64 * self.rules.tick
        );
        Ok(ticks)
    }
}

/// Mutable references to two distinct balls.
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = bodies.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BallKind;

    fn rules() -> TableRules {
        TableRules::standard()
    }

    fn resting(x: f64, y: f64) -> Body {
        Body::at_rest(BallKind::Red, Vec2::new(x, y))
    }

    /// A freshly struck ball: moving, no spin yet.
    fn struck(x: f64, y: f64, vx: f64, vy: f64) -> Body {
        Body::with_state(BallKind::Red, Vec2::new(x, y), Vec2::new(vx, vy), Vec2::ZERO)
    }

    #[test]
    fn test_rejects_overlapping_layout() {
        let result = Simulation::new(rules(), vec![resting(100.0, 80.0), resting(103.0, 80.0)]);
        assert!(matches!(
            result,
            Err(SimulationError::Overlap { first: 0, second: 1 })
        ));
    }

    #[test]
    fn test_rejects_ball_in_cushion() {
        let result = Simulation::new(rules(), vec![resting(1.0, 80.0)]);
        assert!(matches!(
            result,
            Err(SimulationError::OutOfBounds { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_rules() {
        let bad = TableRules {
            mass: 0.0,
            ..rules()
        };
        let result = Simulation::new(bad, vec![]);
        assert!(matches!(result, Err(SimulationError::InvalidRules(_))));
    }

    #[test]
    fn test_touching_layout_is_accepted() {
        let r = rules();
        let sim = Simulation::new(
            r.clone(),
            vec![resting(100.0, 80.0), resting(100.0 + r.contact_distance(), 80.0)],
        );
        assert!(sim.is_ok());
    }

    #[test]
    fn test_unknown_ball_cannot_be_struck() {
        let mut sim = Simulation::new(rules(), vec![resting(100.0, 80.0)]).unwrap();
        let result = sim.apply_impulse(3, Vec2::new(10.0, 0.0));
        assert!(matches!(result, Err(SimulationError::UnknownBody(3))));
    }

    #[test]
    fn test_idle_tick_changes_nothing() {
        let mut sim =
            Simulation::new(rules(), vec![resting(100.0, 80.0), resting(200.0, 50.0)]).unwrap();
        let before = sim.bodies().to_vec();

        assert!(!sim.tick());
        assert_eq!(sim.bodies(), &before[..]);
    }

    #[test]
    fn test_head_on_hit_stops_striker() {
        let r = rules();
        let v = 90.0;
        let mut sim = Simulation::new(
            r.clone(),
            vec![
                resting(100.0, 80.0),
                resting(100.0 + r.contact_distance(), 80.0),
            ],
        )
        .unwrap();
        sim.apply_impulse(0, Vec2::new(v, 0.0)).unwrap();

        assert!(sim.tick());

        let striker = sim.body(0).unwrap();
        let object = sim.body(1).unwrap();
        assert_eq!(striker.velocity(), Vec2::ZERO, "Striker should stop dead");
        assert!(!striker.is_moving());
        // The object ball has slid for one tick on the cloth
        assert!(object.velocity().x > 0.9 * v && object.velocity().x < v);
        assert!(object.velocity().y.abs() < 1e-12);
    }

    #[test]
    fn test_contact_happens_at_touching_distance() {
        let r = rules();
        // 3 units of gap, closing at 6 units per tick: contact half way
        let mut sim = Simulation::new(
            r.clone(),
            vec![
                resting(100.0, 80.0),
                resting(100.0 + r.contact_distance() + 3.0, 80.0),
            ],
        )
        .unwrap();
        sim.apply_impulse(0, Vec2::new(360.0, 0.0)).unwrap();

        sim.tick();

        let a = sim.body(0).unwrap().position();
        let b = sim.body(1).unwrap().position();
        assert!(
            a.distance(&b) >= r.contact_distance() - 1e-9,
            "Balls overlap: distance {}",
            a.distance(&b)
        );
        assert!((a.x - 103.0).abs() < 0.05, "Striker should stop near the contact point");
    }

    #[test]
    fn test_head_on_between_moving_balls() {
        let r = rules();
        let d = r.contact_distance();
        // 4 units apart, closing at 10 units per tick
        let mut sim = Simulation::new(
            r.clone(),
            vec![
                struck(100.0, 80.0, 300.0, 0.0),
                struck(100.0 + d + 4.0, 80.0, -300.0, 0.0),
            ],
        )
        .unwrap();

        sim.tick();

        let a = sim.body(0).unwrap();
        let b = sim.body(1).unwrap();
        assert!(a.velocity().x < 0.0, "Left ball should bounce back");
        assert!(b.velocity().x > 0.0, "Right ball should bounce back");
        assert!(a.position().distance(&b.position()) >= d - 1e-9);
    }

    #[test]
    fn test_partner_knocked_away_is_not_struck() {
        let r = rules();
        let d = r.contact_distance();
        // Ball 0 sends ball 1 off along +x at the very start of the tick.
        // Ball 2 is headed for where ball 1 was, arriving at 0.9 of the tick.
        let mut sim = Simulation::new(
            r.clone(),
            vec![
                struck(100.0, 80.0, 600.0, 0.0),
                resting(100.0 + d, 80.0),
                struck(100.0 + d, 80.0 + d + 5.4, 0.0, -360.0),
            ],
        )
        .unwrap();

        sim.tick();

        let knocked = sim.body(1).unwrap();
        let late = sim.body(2).unwrap();
        assert!(knocked.velocity().x > 500.0);
        assert_eq!(knocked.velocity().y, 0.0, "Ball 1 was never touched by ball 2");
        assert_eq!(late.velocity().x, 0.0, "Ball 2 should carry on undeflected");
        assert!(late.velocity().y < 0.0);
        assert!(knocked.position().distance(&late.position()) > d);
    }

    #[test]
    fn test_detection_sees_tick_start_positions() {
        let r = rules();
        // Ball 0 runs 10 units along +x this tick. Where it starts, ball 1
        // is out of reach for the tick; where it ends, ball 1 would be hit.
        let mut sim = Simulation::new(
            r,
            vec![
                struck(100.0, 80.0, 600.0, 0.0),
                struck(118.0, 84.0, 0.0, -60.0),
            ],
        )
        .unwrap();

        sim.tick();

        let runner = sim.body(0).unwrap();
        let crossing = sim.body(1).unwrap();
        assert!((runner.position().x - 110.0).abs() < 1e-9);
        assert_eq!(runner.velocity().y, 0.0);
        assert_eq!(crossing.velocity().x, 0.0, "Ball 1 must not see ball 0's new position");
        assert!((crossing.position().y - 83.0).abs() < 1e-9);
    }

    #[test]
    fn test_second_contact_waits_for_next_tick() {
        let r = rules();
        let d = r.contact_distance();
        let half_root3 = 3.0_f64.sqrt() / 2.0;
        let first_touch = Vec2::new(102.0, 80.0);
        // Glancing hit at 0.1 of the tick turns ball 0 through 30 degrees,
        // straight at ball 2 which it would reach before the tick ends.
        let glance = first_touch + Vec2::new(0.5, half_root3) * d;
        let deflected = Vec2::new(half_root3, -0.5);
        let target = first_touch + deflected * 18.0;
        let mut sim = Simulation::new(
            r.clone(),
            vec![
                struck(100.0, 80.0, 1200.0, 0.0),
                resting(glance.x, glance.y),
                resting(target.x, target.y),
            ],
        )
        .unwrap();

        sim.tick();

        let striker = sim.body(0).unwrap().clone();
        assert!(sim.body(1).unwrap().is_moving(), "First contact resolves");
        assert!(!sim.body(2).unwrap().is_moving(), "Second contact is deferred");
        assert!(striker.position().distance(&target) < d);
        assert!(striker.velocity().normalized().dot(&deflected) > 1.0 - 1e-9);

        sim.tick();

        assert!(sim.body(2).unwrap().is_moving(), "Deferred contact lands next tick");
    }

    #[test]
    fn test_positions_follow_setup_order() {
        let sim =
            Simulation::new(rules(), vec![resting(100.0, 80.0), resting(200.0, 50.0)]).unwrap();
        assert_eq!(
            sim.positions(),
            vec![Vec2::new(100.0, 80.0), Vec2::new(200.0, 50.0)]
        );
        assert_eq!(sim.snapshot()[1].position, Vec2::new(200.0, 50.0));
    }

    #[test]
    fn test_run_until_rest_reports_ticks() {
        let mut sim = Simulation::new(rules(), vec![resting(100.0, 80.0)]).unwrap();
        sim.apply_impulse(0, Vec2::new(50.0, 0.0)).unwrap();

        let ticks = sim.run_until_rest(10_000).unwrap();

        assert!(ticks > 0);
        assert!(!sim.any_moving());
        assert_eq!(sim.total_kinetic_energy(), 0.0);
    }

    #[test]
    fn test_run_until_rest_gives_up() {
        let mut sim = Simulation::new(rules(), vec![resting(100.0, 80.0)]).unwrap();
        sim.apply_impulse(0, Vec2::new(300.0, 0.0)).unwrap();

        let result = sim.run_until_rest(5);
        assert!(matches!(result, Err(SimulationError::DidNotSettle(5))));
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut bodies = vec![resting(1.0, 1.0), resting(2.0, 2.0), resting(3.0, 3.0)];

        let (a, b) = pair_mut(&mut bodies, 2, 0);
        assert_eq!(a.position().x, 3.0);
        assert_eq!(b.position().x, 1.0);

        let (a, b) = pair_mut(&mut bodies, 0, 1);
        assert_eq!(a.position().x, 1.0);
        assert_eq!(b.position().x, 2.0);
    }
}
