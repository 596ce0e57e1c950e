//! World locations: geodetic coordinates with a derived Cartesian position
//!
//! A [`WorldLocation`] ties a latitude/longitude/altitude to its position in
//! the Earth-centered frame and a heading. The position is recomputed on every
//! successful mutation, so it is never stale with respect to the coordinate.

pub mod tracker;

use log::{debug, warn};
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::constants::DEG2RAD;
use crate::coordinates::angle::interpolate_bearing;
use crate::coordinates::geodetic::{
    altitude_above_surface, distance_between, to_cartesian, GeodeticCoordinate,
};
use crate::{ArError, Result};

pub use tracker::{calculate_global_orientation, LocationTracker, TrackerSettings};

/// A location reading as delivered by a platform location service
///
/// Every field is optional because platform services may omit any of them.
/// Angles are in degrees and `altitude` is the height above the surface in
/// meters. `horizontal_accuracy` is an uncertainty radius in meters, where a
/// negative value marks the reading as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlatformReading {
    pub latitude_degrees: Option<f64>,
    pub longitude_degrees: Option<f64>,
    pub altitude: Option<f64>,
    pub horizontal_accuracy: Option<f64>,
}

impl PlatformReading {
    /// Creates a complete reading with unknown accuracy
    pub fn new(latitude_degrees: f64, longitude_degrees: f64, altitude: f64) -> Self {
        PlatformReading {
            latitude_degrees: Some(latitude_degrees),
            longitude_degrees: Some(longitude_degrees),
            altitude: Some(altitude),
            horizontal_accuracy: None,
        }
    }

    /// Sets the horizontal accuracy of the reading
    pub fn with_accuracy(mut self, horizontal_accuracy: f64) -> Self {
        self.horizontal_accuracy = Some(horizontal_accuracy);
        self
    }

    /// Extracts the coordinate (radians) and altitude (distance from center)
    ///
    /// Fails when any of the positional fields is missing or not finite.
    pub fn coordinate_and_altitude(&self) -> Result<(GeodeticCoordinate, f64)> {
        let latitude = finite_field(self.latitude_degrees, "latitude")?;
        let longitude = finite_field(self.longitude_degrees, "longitude")?;
        let height = finite_field(self.altitude, "altitude")?;

        Ok((
            GeodeticCoordinate::from_degrees(latitude, longitude),
            altitude_above_surface(height),
        ))
    }

    /// True when the reported accuracy is acceptable for `max_uncertainty`
    ///
    /// A missing accuracy is accepted; a negative or NaN one is not.
    pub fn is_accurate_within(&self, max_uncertainty: f64) -> bool {
        match self.horizontal_accuracy {
            None => true,
            Some(accuracy) => accuracy >= 0.0 && accuracy <= max_uncertainty,
        }
    }
}

fn finite_field(value: Option<f64>, name: &str) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(ArError::InvalidInput(format!("{} is not finite: {}", name, v))),
        None => Err(ArError::InvalidInput(format!("{} is missing", name))),
    }
}

/// Outcome of applying a platform reading to a location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingUpdate {
    /// The reading was accepted and the position recomputed
    Applied,
    /// The reading was well-formed but too inaccurate to use
    Ignored,
}

/// A location on the surface of the earth with a heading
///
/// Provides the conversion between spherical and Cartesian coordinates and
/// the relative-position and distance queries used for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldLocation {
    coordinate: GeodeticCoordinate,
    altitude: f64,
    position: Vector3<f64>,
    rotation: f64,
}

impl WorldLocation {
    /// Creates a location from a coordinate in radians and an altitude
    /// measured from the center of the earth
    pub fn new(coordinate: GeodeticCoordinate, altitude: f64) -> Result<Self> {
        validate(coordinate, altitude)?;
        Ok(WorldLocation {
            coordinate,
            altitude,
            position: to_cartesian(coordinate, altitude),
            rotation: 0.0,
        })
    }

    /// Creates a location from a platform reading, ignoring its accuracy
    pub fn from_reading(reading: &PlatformReading) -> Result<Self> {
        let (coordinate, altitude) = reading.coordinate_and_altitude()?;
        Self::new(coordinate, altitude)
    }

    /// The latitude/longitude in radians
    pub fn coordinate(&self) -> GeodeticCoordinate {
        self.coordinate
    }

    /// The distance from the center of the sphere
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// The Cartesian position in the Earth-centered frame
    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    /// The heading, in radians clockwise from north
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Sets the coordinate and altitude and recomputes the position
    ///
    /// Non-finite values, latitudes beyond the poles and negative altitudes
    /// are rejected and leave the location unchanged.
    pub fn set_coordinate(&mut self, coordinate: GeodeticCoordinate, altitude: f64) -> Result<()> {
        validate(coordinate, altitude)?;
        self.coordinate = coordinate;
        self.altitude = altitude;
        self.position = to_cartesian(coordinate, altitude);
        Ok(())
    }

    /// Applies a platform reading if it is accurate enough
    ///
    /// # Arguments
    ///
    /// * `reading` - The platform location reading
    /// * `max_uncertainty` - Largest acceptable horizontal uncertainty in meters
    ///
    /// # Returns
    ///
    /// `Applied` when the position was updated, `Ignored` when the reading was
    /// too inaccurate, or `InvalidInput` when a field is missing or NaN.
    pub fn set_from_platform_reading(
        &mut self,
        reading: &PlatformReading,
        max_uncertainty: f64,
    ) -> Result<ReadingUpdate> {
        let (coordinate, altitude) = reading.coordinate_and_altitude().map_err(|e| {
            warn!("Rejected platform reading {:?}: {}", reading, e);
            e
        })?;

        if !reading.is_accurate_within(max_uncertainty) {
            debug!(
                "Ignoring reading with accuracy {:?} (limit {})",
                reading.horizontal_accuracy, max_uncertainty
            );
            return Ok(ReadingUpdate::Ignored);
        }

        self.set_coordinate(coordinate, altitude)?;
        Ok(ReadingUpdate::Applied)
    }

    /// Sets the heading in radians; no normalization is applied
    ///
    /// Non-finite bearings are rejected and leave the heading unchanged.
    pub fn set_bearing(&mut self, bearing: f64) -> Result<()> {
        if !bearing.is_finite() {
            return Err(ArError::InvalidInput(format!("bearing is not finite: {}", bearing)));
        }
        self.rotation = bearing;
        Ok(())
    }

    /// Calculates the position of `other` relative to this location
    ///
    /// The components correspond to longitude (east, west), latitude
    /// (north, south) and altitude (up, down). This is the plain difference
    /// of the two Cartesian positions rather than a projection onto the local
    /// tangent plane, so it is only a good approximation close to the
    /// reference meridian and may fail near the poles.
    pub fn relative_position_of(&self, other: &WorldLocation) -> Vector3<f64> {
        other.position - self.position
    }

    /// Great-circle distance to `destination` at this location's altitude
    pub fn spherical_distance_from(&self, destination: &WorldLocation) -> f64 {
        distance_between(self.coordinate, destination.coordinate, self.altitude)
    }

    /// Straight-line distance between the two Cartesian positions
    pub fn distance_from(&self, destination: &WorldLocation) -> f64 {
        (destination.position - self.position).norm()
    }

    /// Sets this location by interpolating between two others at `time`
    ///
    /// Latitude, longitude and altitude are interpolated linearly; the bearing
    /// follows the shortest way around the circle. `time` is not clamped.
    pub fn interpolate(&mut self, from: &WorldLocation, to: &WorldLocation, time: f64) -> Result<()> {
        if !time.is_finite() {
            return Err(ArError::InvalidInput(format!("interpolation time is not finite: {}", time)));
        }

        let lerp = |a: f64, b: f64| a + (b - a) * time;
        let coordinate = GeodeticCoordinate::new(
            lerp(from.coordinate.latitude, to.coordinate.latitude),
            lerp(from.coordinate.longitude, to.coordinate.longitude),
        );
        let altitude = lerp(from.altitude, to.altitude);

        self.set_coordinate(coordinate, altitude)?;
        self.rotation = interpolate_bearing(from.rotation, to.rotation, time);
        Ok(())
    }

    /// Unit vector pointing along the heading on the screen plane (north is up)
    pub fn normalized_direction(&self) -> Vector2<f64> {
        Vector2::new(self.rotation.sin(), self.rotation.cos())
    }

    /// The heading in degrees, for display
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation / DEG2RAD
    }
}

fn validate(coordinate: GeodeticCoordinate, altitude: f64) -> Result<()> {
    if !coordinate.is_valid() {
        return Err(ArError::InvalidInput(format!(
            "invalid coordinate: latitude {}, longitude {}",
            coordinate.latitude, coordinate.longitude
        )));
    }
    if !altitude.is_finite() || altitude < 0.0 {
        return Err(ArError::InvalidInput(format!("invalid altitude: {}", altitude)));
    }
    Ok(())
}
