//! Python bindings for the bb-core billiard physics engine.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from bb_physics import Table
//!
//! table = Table()
//! table.strike_at_angle(0, 0.0, 350.0)
//!
//! while table.tick():
//!     for x, y in table.positions():
//!         draw_ball(x, y)
//! ```

use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use bb_core::rack::standard_rack;
use bb_core::{
    RulesLoader, Shot, Simulation, SimulationError, TableRules, Vec2 as CoreVec2,
};

/// 2D vector for positions and velocities.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec2 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
}

#[pymethods]
impl Vec2 {
    #[new]
    fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn __repr__(&self) -> String {
        format!("Vec2({:.4}, {:.4})", self.x, self.y)
    }

    fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    fn to_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl From<CoreVec2> for Vec2 {
    fn from(v: CoreVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Vec2> for CoreVec2 {
    fn from(v: Vec2) -> Self {
        CoreVec2::new(v.x, v.y)
    }
}

fn to_py_err(err: SimulationError) -> PyErr {
    match err {
        SimulationError::UnknownBody(_) => PyIndexError::new_err(err.to_string()),
        SimulationError::DidNotSettle(_) => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// A billiard table with the standard rack.
///
/// The table never advances on its own: call `tick()` once per frame.
#[pyclass]
pub struct Table {
    sim: Simulation,
    time: f64,
}

impl Table {
    fn racked(rules: TableRules) -> PyResult<Self> {
        let balls = standard_rack(&rules);
        let sim = Simulation::new(rules, balls).map_err(to_py_err)?;
        Ok(Self { sim, time: 0.0 })
    }
}

#[pymethods]
impl Table {
    /// Create a racked table with the standard rules.
    #[new]
    fn new() -> PyResult<Self> {
        Self::racked(TableRules::standard())
    }

    /// Create a racked table from a rule set in a `rules/` directory.
    #[staticmethod]
    fn with_rules(rules_dir: &str, name: &str) -> PyResult<Self> {
        let rules = RulesLoader::new(rules_dir)
            .load(name)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Self::racked(rules)
    }

    /// Simulated time in seconds since the table was racked.
    #[getter]
    fn time(&self) -> f64 {
        self.time
    }

    /// Table size as (width, height).
    fn dimensions(&self) -> (f64, f64) {
        let rules = self.sim.rules();
        (rules.width, rules.height)
    }

    fn ball_radius(&self) -> f64 {
        self.sim.rules().radius
    }

    fn ball_count(&self) -> usize {
        self.sim.bodies().len()
    }

    /// Name of each ball ("cue", "red", ...) in setup order.
    fn ball_kinds(&self) -> Vec<String> {
        self.sim
            .bodies()
            .iter()
            .map(|b| format!("{:?}", b.kind).to_lowercase())
            .collect()
    }

    /// Ball centres as (x, y) tuples in setup order.
    fn positions(&self) -> Vec<(f64, f64)> {
        self.sim.positions().into_iter().map(|p| (p.x, p.y)).collect()
    }

    fn ball_position(&self, index: usize) -> PyResult<Vec2> {
        self.sim
            .body(index)
            .map(|b| b.position().into())
            .ok_or_else(|| to_py_err(SimulationError::UnknownBody(index)))
    }

    fn ball_velocity(&self, index: usize) -> PyResult<Vec2> {
        self.sim
            .body(index)
            .map(|b| b.velocity().into())
            .ok_or_else(|| to_py_err(SimulationError::UnknownBody(index)))
    }

    fn is_moving(&self) -> bool {
        self.sim.any_moving()
    }

    /// Add an impulse to a ball.
    fn apply_impulse(&mut self, index: usize, impulse: Vec2) -> PyResult<()> {
        self.sim
            .apply_impulse(index, impulse.into())
            .map_err(to_py_err)
    }

    /// Strike a ball along an angle in degrees with the given strength.
    fn strike_at_angle(&mut self, index: usize, degrees: f64, strength: f64) -> PyResult<()> {
        let shot = Shot::from_angle(degrees, strength).clamped();
        self.apply_impulse(index, shot.impulse().into())
    }

    /// Strike a ball toward a pointer position. Returns False when the
    /// pointer is on the ball centre and no direction can be taken.
    fn strike_from_pointer(
        &mut self,
        index: usize,
        pointer_x: f64,
        pointer_y: f64,
        strength: f64,
    ) -> PyResult<bool> {
        let ball = self.ball_position(index)?;
        let Some(shot) =
            Shot::from_pointer(ball.into(), CoreVec2::new(pointer_x, pointer_y), strength)
        else {
            return Ok(false);
        };
        self.apply_impulse(index, shot.clamped().impulse().into())?;
        Ok(true)
    }

    /// Advance one tick. Returns whether any ball is still moving.
    fn tick(&mut self) -> bool {
        self.time += self.sim.rules().tick;
        self.sim.tick()
    }

    /// Tick until the table is still. Returns the number of ticks taken.
    fn run_until_rest(&mut self, max_ticks: usize) -> PyResult<usize> {
        let ticks = self.sim.run_until_rest(max_ticks).map_err(to_py_err)?;
        self.time += ticks as f64 * self.sim.rules().tick;
        Ok(ticks)
    }

    /// Put every ball back in its starting position.
    fn reset(&mut self) -> PyResult<()> {
        *self = Self::racked(self.sim.rules().clone())?;
        Ok(())
    }

    /// Current state as a dict for easy inspection.
    fn state_dict(&self, py: Python<'_>) -> PyResult<PyObject> {
        let dict = pyo3::types::PyDict::new_bound(py);
        dict.set_item("time", self.time)?;
        dict.set_item("moving", self.sim.any_moving())?;
        dict.set_item("kinetic_energy", self.sim.total_kinetic_energy())?;
        dict.set_item("positions", self.positions())?;
        Ok(dict.into_any().unbind())
    }
}

/// Python module definition.
#[pymodule]
fn bb_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec2>()?;
    m.add_class::<Table>()?;
    m.add("MAX_STRENGTH", bb_core::cue::MAX_STRENGTH)?;
    Ok(())
}
