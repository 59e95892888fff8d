use serde::Deserialize;

use crate::error::TerrainError;
use crate::hex::Bounds;

/// All tunable parameters. Missing JSON fields fall back to the defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Params {
    pub seed: u32,
    pub bounds: Bounds,

    // Plates
    pub plates: usize,
    pub max_elevation: f64,
    pub ocean: f64,
    pub colors: u32,
    pub shuffle_growth: bool,
    pub smooth: usize,

    // Erosion
    pub drops: usize,
    pub erosion_passes: usize,
    pub erosion_rate: f64,
    pub deposition_rate: f64,

    // Biomes
    pub mountain_elevation: f64,
    pub divide_mountain_elevation: f64,
    pub shallow_depth: f64,
    pub swamp_fraction: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            seed: 42,
            bounds: Bounds::Rect { width: 40, height: 30 },
            plates: 12,
            max_elevation: 10000.0,
            ocean: 0.5,
            colors: 6,
            shuffle_growth: false,
            smooth: 3,
            drops: 500,
            erosion_passes: 1,
            erosion_rate: 0.02,
            deposition_rate: 0.5,
            mountain_elevation: 7000.0,
            divide_mountain_elevation: 5000.0,
            shallow_depth: 2000.0,
            swamp_fraction: 0.7,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), TerrainError> {
        self.bounds.validate()?;
        if self.plates == 0 {
            return Err(TerrainError::NoPlates);
        }
        if self.colors == 0 {
            return Err(TerrainError::NoColors);
        }
        if !self.max_elevation.is_finite() || self.max_elevation <= 0.0 {
            return Err(TerrainError::OutOfRange {
                name: "max_elevation",
                value: self.max_elevation,
            });
        }
        if !self.shallow_depth.is_finite() || self.shallow_depth < 0.0 {
            return Err(TerrainError::OutOfRange {
                name: "shallow_depth",
                value: self.shallow_depth,
            });
        }
        for (name, value) in [
            ("mountain_elevation", self.mountain_elevation),
            ("divide_mountain_elevation", self.divide_mountain_elevation),
        ] {
            if !value.is_finite() {
                return Err(TerrainError::OutOfRange { name, value });
            }
        }
        for (name, value) in [
            ("ocean", self.ocean),
            ("erosion_rate", self.erosion_rate),
            ("deposition_rate", self.deposition_rate),
            ("swamp_fraction", self.swamp_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TerrainError::OutOfRange { name, value });
            }
        }
        Ok(())
    }
}
