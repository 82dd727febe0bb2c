//! Table rule sets.
//!
//! A [`TableRules`] value is the physical rule set of one table: its size,
//! the balls' radius and mass, and the cloth and cushion coefficients. The
//! reference set is compiled in ([`TableRules::standard`]); alternatives can
//! be loaded from YAML files without recompiling.
//!
//! ## Directory Structure
//!
//! ```text
//! rules/
//! ├── standard.yaml
//! ├── slow_cloth.yaml
//! └── ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Physical rule set of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRules {
    pub name: String,

    /// Playing surface size, cushion to cushion
    pub width: f64,
    pub height: f64,

    /// Ball properties (every ball on a table is identical)
    pub radius: f64,
    pub mass: f64,

    /// Cloth force pulling a sliding ball toward pure rolling
    pub friction: f64,
    /// Rolling resistance decelerating translation
    pub rotational_friction: f64,

    /// Multiplier applied to the normal velocity on a cushion hit.
    /// Negative: the component is reversed and damped.
    pub wall_damping: f64,

    /// Converts the friction coefficients into table units per second
    pub force_scale: f64,

    /// Fixed tick duration in seconds
    pub tick: f64,
}

impl TableRules {
    /// The reference table. These values reproduce the reference trajectories
    /// and must not be tuned.
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            width: 357.0,
            height: 179.0,
            radius: 2.625,
            mass: 0.1545,
            friction: 0.45,
            rotational_friction: 0.02,
            wall_damping: -0.8,
            force_scale: 100.0,
            tick: 1.0 / 60.0,
        }
    }

    /// Centre-to-centre distance at which two balls touch.
    pub fn contact_distance(&self) -> f64 {
        2.0 * self.radius
    }

    /// Check that the rule set describes a physically meaningful table.
    pub fn validate(&self) -> Result<(), RulesError> {
        let invalid = |reason: &str| {
            Err(RulesError::Invalid {
                name: self.name.clone(),
                reason: reason.to_string(),
            })
        };

        if !(self.radius > 0.0) {
            return invalid("radius must be positive");
        }
        if !(self.mass > 0.0) {
            return invalid("mass must be positive");
        }
        if !(self.tick > 0.0) {
            return invalid("tick must be positive");
        }
        if !(self.force_scale > 0.0) {
            return invalid("force_scale must be positive");
        }
        if !(self.width >= self.contact_distance() && self.height >= self.contact_distance()) {
            return invalid("table is too small to hold a ball");
        }
        if !(self.friction >= 0.0 && self.rotational_friction >= 0.0) {
            return invalid("friction coefficients must not be negative");
        }
        if !(self.wall_damping > -1.0 && self.wall_damping <= 0.0) {
            return invalid("wall_damping must lie in (-1, 0]");
        }
        Ok(())
    }
}

impl Default for TableRules {
    fn default() -> Self {
        Self::standard()
    }
}

/// Error type for rule loading operations.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Rule set not found: {0}")]
    NotFound(String),
    #[error("Rule set '{name}' is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

/// Rule set loader with configurable base directory.
pub struct RulesLoader {
    base_path: PathBuf,
}

impl RulesLoader {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load and validate a rule set by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = RulesLoader::new("rules");
    /// let rules = loader.load("slow_cloth")?;
    /// ```
    pub fn load(&self, name: &str) -> Result<TableRules, RulesError> {
        let path = self.base_path.join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(RulesError::NotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        let rules = Self::parse(&contents)?;
        log::debug!("loaded rule set '{}' from {}", rules.name, path.display());
        Ok(rules)
    }

    /// Parse and validate a rule set from YAML text.
    pub fn parse(contents: &str) -> Result<TableRules, RulesError> {
        let rules: TableRules = serde_yaml::from_str(contents)?;
        rules.validate()?;
        Ok(rules)
    }

    /// List all available rule sets, sorted by name.
    pub fn list_rules(&self) -> Result<Vec<String>, RulesError> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if name.ends_with(".yaml") {
                names.push(name.trim_end_matches(".yaml").to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================
