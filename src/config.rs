//! Shaping configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Tunables shared by the assignment pass and the resolution selector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapingConfig {
    /// Fewest sides a generated cross-section may have
    pub min_sides: usize,
    /// Most sides a generated cross-section may have
    pub max_sides: usize,
    /// Branch-local positions this close to 0 or 1 snap onto the end
    pub boundary_snap: f32,
}

impl Default for ShapingConfig {
    fn default() -> Self {
        Self {
            min_sides: 6,
            max_sides: 18,
            boundary_snap: 0.01,
        }
    }
}

impl ShapingConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.min_sides < 3 {
            return Err(Error::InvalidConfig(format!("min_sides must be at least 3, got {}", self.min_sides)));
        }
        if self.max_sides < self.min_sides {
            return Err(Error::InvalidConfig(format!(
                "max_sides ({}) is below min_sides ({})",
                self.max_sides, self.min_sides
            )));
        }
        if !(0.0..0.5).contains(&self.boundary_snap) {
            return Err(Error::InvalidConfig(format!(
                "boundary_snap must be in [0, 0.5), got {}",
                self.boundary_snap
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Save to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }
}
