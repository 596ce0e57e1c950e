//! Device location tracking
//!
//! [`LocationTracker`] is the application-owned replacement for a shared
//! location controller. Platform callbacks feed it readings and headings; it
//! smooths them and maintains the device's [`WorldLocation`].

use log::{debug, warn};
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

use super::{PlatformReading, ReadingUpdate, WorldLocation};
use crate::coordinates::angle::{normalize_bearing, normalize_longitude, shortest_delta};
use crate::coordinates::geodetic::GeodeticCoordinate;
use crate::{ArError, Result};

/// Tuning for [`LocationTracker`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// Readings with a horizontal uncertainty above this (meters) are ignored
    pub max_uncertainty: f64,
    /// Low-pass factor for position updates, in (0, 1]; 1 disables smoothing
    pub location_smoothing: f64,
    /// Low-pass factor for heading updates, in (0, 1]; 1 disables smoothing
    pub bearing_smoothing: f64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            max_uncertainty: 100.0,
            location_smoothing: 0.5,
            bearing_smoothing: 0.25,
        }
    }
}

impl TrackerSettings {
    /// Checks that the smoothing factors are usable
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("location_smoothing", self.location_smoothing),
            ("bearing_smoothing", self.bearing_smoothing),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ArError::InvalidInput(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }
        if !(self.max_uncertainty >= 0.0) {
            return Err(ArError::InvalidInput(format!(
                "max_uncertainty must be non-negative, got {}",
                self.max_uncertainty
            )));
        }
        Ok(())
    }
}

/// Tracks the device's location and heading from platform updates
///
/// Updates must be serialized by the owner; the tracker holds no locks.
#[derive(Debug, Clone)]
pub struct LocationTracker {
    settings: TrackerSettings,
    current_reading: Option<PlatformReading>,
    fixed_location: Option<WorldLocation>,
    smoothed: Option<WorldLocation>,
    smoothed_bearing: Option<f64>,
}

impl LocationTracker {
    /// Creates a tracker with no location yet
    pub fn new(settings: TrackerSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            current_reading: None,
            fixed_location: None,
            smoothed: None,
            smoothed_bearing: None,
        })
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// The last raw reading received, accepted or not
    pub fn current_reading(&self) -> Option<&PlatformReading> {
        self.current_reading.as_ref()
    }

    /// The smoothed heading in radians, if any heading has been received
    pub fn current_bearing(&self) -> Option<f64> {
        self.smoothed_bearing
    }

    /// The device's current location
    ///
    /// A fixed location, when set, overrides the tracked one.
    pub fn world_location(&self) -> Option<&WorldLocation> {
        self.fixed_location.as_ref().or(self.smoothed.as_ref())
    }

    /// Feeds a new platform reading into the tracker
    ///
    /// The first accepted reading is taken as-is; later ones are blended in
    /// with the configured smoothing factor. Longitude is blended the short
    /// way around, so readings either side of the antimeridian stay close.
    pub fn update_location(&mut self, reading: PlatformReading) -> Result<ReadingUpdate> {
        self.current_reading = Some(reading);

        let target = WorldLocation::from_reading(&reading).map_err(|e| {
            warn!("Discarding location update: {}", e);
            e
        })?;

        if !reading.is_accurate_within(self.settings.max_uncertainty) {
            debug!(
                "Location accuracy {:?} exceeds {} m, ignoring",
                reading.horizontal_accuracy, self.settings.max_uncertainty
            );
            return Ok(ReadingUpdate::Ignored);
        }

        match self.smoothed.as_mut() {
            None => {
                let mut location = target;
                if let Some(bearing) = self.smoothed_bearing {
                    location.set_bearing(bearing)?;
                }
                self.smoothed = Some(location);
            }
            Some(current) => {
                // Only the coordinate is blended; the heading is owned by
                // update_heading
                let (coordinate, altitude) =
                    blend(current, &target, self.settings.location_smoothing);
                current.set_coordinate(coordinate, altitude)?;
            }
        }

        if self.fixed_location.is_some() {
            debug!("Fixed location set, tracked location updated in the background");
        } else if let Some(location) = &self.smoothed {
            let (lat, lon) = location.coordinate().to_degrees();
            debug!("Location updated to ({:.6}, {:.6})", lat, lon);
        }

        Ok(ReadingUpdate::Applied)
    }

    /// Feeds a new heading (radians clockwise from north) into the tracker
    pub fn update_heading(&mut self, bearing: f64) -> Result<()> {
        if !bearing.is_finite() {
            return Err(ArError::InvalidInput(format!("heading is not finite: {}", bearing)));
        }
        let bearing = normalize_bearing(bearing);

        let smoothed = match self.smoothed_bearing {
            None => bearing,
            Some(previous) => normalize_bearing(
                previous + shortest_delta(previous, bearing) * self.settings.bearing_smoothing,
            ),
        };
        self.smoothed_bearing = Some(smoothed);

        if let Some(location) = self.smoothed.as_mut() {
            location.set_bearing(smoothed)?;
        }
        if let Some(location) = self.fixed_location.as_mut() {
            location.set_bearing(smoothed)?;
        }
        Ok(())
    }

    /// Sets or clears a fixed location which overrides the tracked one
    pub fn set_fixed_location(&mut self, reading: Option<PlatformReading>) -> Result<()> {
        self.fixed_location = match reading {
            None => None,
            Some(reading) => {
                let mut location = WorldLocation::from_reading(&reading)?;
                if let Some(bearing) = self.smoothed_bearing {
                    location.set_bearing(bearing)?;
                }
                Some(location)
            }
        };
        Ok(())
    }

    /// Directly places the tracked location, bypassing smoothing
    pub fn reset_location(&mut self, coordinate: GeodeticCoordinate, altitude: f64) -> Result<()> {
        let mut location = WorldLocation::new(coordinate, altitude)?;
        if let Some(bearing) = self.smoothed_bearing {
            location.set_bearing(bearing)?;
        }
        self.smoothed = Some(location);
        Ok(())
    }
}

/// Low-pass step from `current` towards `target` by `alpha`
fn blend(current: &WorldLocation, target: &WorldLocation, alpha: f64) -> (GeodeticCoordinate, f64) {
    let from = current.coordinate();
    let to = target.coordinate();

    let latitude = from.latitude + (to.latitude - from.latitude) * alpha;
    let longitude =
        normalize_longitude(from.longitude + shortest_delta(from.longitude, to.longitude) * alpha);
    let altitude = current.altitude() + (target.altitude() - current.altitude()) * alpha;

    (GeodeticCoordinate::new(latitude, longitude), altitude)
}

/// Builds the device's global orientation from gravity and a north axis
///
/// Both vectors are in device coordinates: `gravity` points down and
/// `north_axis` is the device-local direction of north (it need not be
/// perpendicular to gravity). The resulting rotation maps device
/// coordinates into a local east/north/up frame; its rows are the east,
/// north and up axes expressed in device space.
///
/// Returns `None` when gravity is zero or north is parallel to it.
pub fn calculate_global_orientation(
    gravity: Vector3<f32>,
    north_axis: Vector3<f32>,
) -> Option<Matrix4<f32>> {
    let up = (-gravity).try_normalize(f32::EPSILON)?;
    let east = north_axis.cross(&up).try_normalize(f32::EPSILON)?;
    let north = up.cross(&east);

    Some(Matrix4::new(
        east.x, east.y, east.z, 0.0, //
        north.x, north.y, north.z, 0.0, //
        up.x, up.y, up.z, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ))
}
