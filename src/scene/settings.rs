//! View settings for the browser scene
//!
//! Settings are plain data with defaults for every field, so a JSON file only
//! needs to name the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ArError, Result};

/// Culling, sizing and overlay settings for rendering world points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Objects closer than this distance are not rendered
    pub minimum_distance: f32,
    /// Objects further away than this are not rendered
    pub maximum_distance: f32,
    /// Objects closer than this appear the same size
    pub near_distance: f32,
    /// Objects further away than this appear the same size
    pub far_distance: f32,
    /// Display a small on-screen compass
    pub display_radar: bool,
    /// Center of the radar in relative screen coordinates; (-1, -1) is the
    /// top left, (1, 1) the bottom right
    pub radar_center: [f32; 2],
    /// Display a background horizon grid
    pub display_grid: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            minimum_distance: 2.0,
            maximum_distance: 500.0,
            near_distance: 4.0,
            far_distance: 100.0,
            display_radar: true,
            radar_center: [0.0, -0.6],
            display_grid: false,
        }
    }
}

impl ViewSettings {
    /// Parses settings from a JSON string; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: ViewSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Checks the distance ranges are non-negative and ordered
    pub fn validate(&self) -> Result<()> {
        let distances = [
            ("minimum_distance", self.minimum_distance),
            ("maximum_distance", self.maximum_distance),
            ("near_distance", self.near_distance),
            ("far_distance", self.far_distance),
        ];
        for (name, value) in distances {
            if !(value >= 0.0) {
                return Err(ArError::InvalidInput(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        if self.minimum_distance > self.maximum_distance {
            return Err(ArError::InvalidInput(format!(
                "minimum_distance {} exceeds maximum_distance {}",
                self.minimum_distance, self.maximum_distance
            )));
        }
        if self.near_distance > self.far_distance {
            return Err(ArError::InvalidInput(format!(
                "near_distance {} exceeds far_distance {}",
                self.near_distance, self.far_distance
            )));
        }
        Ok(())
    }
}
