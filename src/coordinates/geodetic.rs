//! # Geodetic Frame Module
//!
//! Conversions between latitude/longitude/altitude on a spherical Earth and
//! the Cartesian world frame used for rendering, plus great-circle bearing and
//! distance.
//!
//! ## Coordinate System Convention
//!
//! The Cartesian frame is Earth-centered and Earth-fixed, with the axes laid
//! out to match a Y-up renderer:
//! - **X-axis**: Toward latitude 0°, longitude 90°E
//! - **Y-axis**: Toward the north pole (up)
//! - **Z-axis**: Toward latitude 0°, longitude 0°
//!
//! ## Altitude
//!
//! Altitude is always the distance from the center of the sphere, never the
//! height above the surface. Use [`EARTH_RADIUS`] plus a height to build one.
//!
//! ## Examples
//!
//! ```rust
//! use arspatial::coordinates::geodetic::{to_cartesian, GeodeticCoordinate};
//!
//! let north_pole = GeodeticCoordinate::from_degrees(90.0, 0.0);
//! let position = to_cartesian(north_pole, 1.0);
//! assert!((position.y - 1.0).abs() < 1e-15);
//! ```

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{DEG2RAD, EARTH_RADIUS, RAD2DEG};
use crate::coordinates::angle::normalize_bearing;

/// A latitude/longitude pair in radians
///
/// Latitude lies in [-π/2, π/2] and longitude in (-π, π]. Values are stored
/// as given; callers normalize before use.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeodeticCoordinate {
    /// Latitude in radians, positive north
    pub latitude: f64,
    /// Longitude in radians, positive east
    pub longitude: f64,
}

impl GeodeticCoordinate {
    /// Creates a new coordinate from radians
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeodeticCoordinate {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate from a latitude/longitude pair in degrees
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arspatial::coordinates::geodetic::GeodeticCoordinate;
    /// use std::f64::consts::PI;
    ///
    /// let coord = GeodeticCoordinate::from_degrees(45.0, -90.0);
    /// assert!((coord.latitude - PI / 4.0).abs() < 1e-15);
    /// assert!((coord.longitude + PI / 2.0).abs() < 1e-15);
    /// ```
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64) -> Self {
        GeodeticCoordinate {
            latitude: latitude_deg * DEG2RAD,
            longitude: longitude_deg * DEG2RAD,
        }
    }

    /// Returns `(latitude, longitude)` in degrees
    pub fn to_degrees(&self) -> (f64, f64) {
        (self.latitude * RAD2DEG, self.longitude * RAD2DEG)
    }

    /// True when both components are finite and latitude is within the poles
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= std::f64::consts::FRAC_PI_2
    }
}

/// Converts a coordinate in degrees to radians
///
/// Free-function form of [`GeodeticCoordinate::from_degrees`].
pub fn from_degrees(latitude_deg: f64, longitude_deg: f64) -> GeodeticCoordinate {
    GeodeticCoordinate::from_degrees(latitude_deg, longitude_deg)
}

/// Converts latitude/longitude and altitude into the Earth-centered frame
///
/// # Arguments
///
/// * `coordinate` - Latitude/longitude in radians
/// * `altitude` - Distance from the center of the sphere
///
/// # Mathematical Conversion
///
/// - `x = altitude * cos(lat) * sin(lon)`
/// - `y = altitude * sin(lat)`
/// - `z = altitude * cos(lat) * cos(lon)`
///
/// # Examples
///
/// ```rust
/// use arspatial::coordinates::geodetic::{to_cartesian, GeodeticCoordinate};
///
/// let origin = to_cartesian(GeodeticCoordinate::new(0.0, 0.0), 2.0);
/// assert_eq!(origin.z, 2.0);
/// assert_eq!(origin.x, 0.0);
/// ```
pub fn to_cartesian(coordinate: GeodeticCoordinate, altitude: f64) -> Vector3<f64> {
    let cos_lat = coordinate.latitude.cos();
    Vector3::new(
        altitude * cos_lat * coordinate.longitude.sin(),
        altitude * coordinate.latitude.sin(),
        altitude * cos_lat * coordinate.longitude.cos(),
    )
}

/// Converts an Earth-centered position back to a coordinate and altitude
///
/// Longitude is returned in (-π, π]. At the poles longitude is arbitrary and
/// reported as 0; the zero vector maps to `(0, 0)` with altitude 0.
pub fn from_cartesian(position: &Vector3<f64>) -> (GeodeticCoordinate, f64) {
    let altitude = position.norm();

    if altitude == 0.0 {
        return (GeodeticCoordinate::default(), 0.0);
    }

    let r_xz = (position.x * position.x + position.z * position.z).sqrt();
    let latitude = position.y.atan2(r_xz);
    let longitude = if position.x == 0.0 && position.z == 0.0 {
        0.0
    } else {
        position.x.atan2(position.z)
    };

    (GeodeticCoordinate::new(latitude, longitude), altitude)
}

/// Calculates the initial great-circle bearing from one point to another
///
/// The bearing is measured clockwise from north, in radians within [0, 2π).
/// When the two points coincide the result is 0, but callers should not
/// depend on any particular value in that case.
///
/// # Examples
///
/// ```rust
/// use arspatial::coordinates::geodetic::{bearing_between, GeodeticCoordinate};
/// use std::f64::consts::FRAC_PI_2;
///
/// let from = GeodeticCoordinate::from_degrees(0.0, 0.0);
/// let east = GeodeticCoordinate::from_degrees(0.0, 1.0);
/// assert!((bearing_between(from, east) - FRAC_PI_2).abs() < 1e-12);
/// ```
pub fn bearing_between(from: GeodeticCoordinate, to: GeodeticCoordinate) -> f64 {
    let delta_longitude = to.longitude - from.longitude;

    let y = delta_longitude.sin() * to.latitude.cos();
    let x = from.latitude.cos() * to.latitude.sin()
        - from.latitude.sin() * to.latitude.cos() * delta_longitude.cos();

    normalize_bearing(y.atan2(x))
}

/// Calculates the great-circle distance between two points at a given altitude
///
/// Uses the haversine formula on a sphere of radius `altitude`. Accuracy is
/// not guaranteed for nearly antipodal points.
pub fn distance_between(from: GeodeticCoordinate, to: GeodeticCoordinate, altitude: f64) -> f64 {
    let delta_latitude = to.latitude - from.latitude;
    let delta_longitude = to.longitude - from.longitude;

    let sin_half_lat = (delta_latitude / 2.0).sin();
    let sin_half_lon = (delta_longitude / 2.0).sin();

    let a = sin_half_lat * sin_half_lat
        + from.latitude.cos() * to.latitude.cos() * sin_half_lon * sin_half_lon;
    let c = 2.0 * a.sqrt().min(1.0).asin();

    altitude * c
}

/// Altitude of a point `height` meters above the surface of the sphere
pub fn altitude_above_surface(height: f64) -> f64 {
    EARTH_RADIUS + height
}
