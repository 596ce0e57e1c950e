//! # Bearing Angle Module
//!
//! Helpers for working with compass bearings expressed in radians.
//!
//! Bearings are measured clockwise from north and live in [0, 2π). Arithmetic
//! on bearings has to respect the wraparound at north: the difference between
//! 350° and 10° is 20°, not 340°, and halfway between them is 0°.
//!
//! ## Examples
//!
//! ```rust
//! use arspatial::coordinates::angle::{interpolate_bearing, shortest_delta};
//! use arspatial::constants::DEG2RAD;
//!
//! let delta = shortest_delta(350.0 * DEG2RAD, 10.0 * DEG2RAD);
//! assert!((delta - 20.0 * DEG2RAD).abs() < 1e-12);
//!
//! let halfway = interpolate_bearing(350.0 * DEG2RAD, 10.0 * DEG2RAD, 0.5);
//! assert!(halfway.sin().abs() < 1e-12 && halfway.cos() > 0.0);
//! ```

use std::f64::consts::PI;

use crate::constants::TAU;

/// Wraps a bearing into [0, 2π)
///
/// # Examples
///
/// ```rust
/// use arspatial::coordinates::angle::normalize_bearing;
/// use std::f64::consts::PI;
///
/// assert!((normalize_bearing(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-15);
/// assert_eq!(normalize_bearing(0.0), 0.0);
/// ```
pub fn normalize_bearing(bearing: f64) -> f64 {
    let wrapped = bearing.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Returns the signed angle in [-π, π) that turns `from` onto `to` along the
/// shorter way around the circle
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    (to - from + PI).rem_euclid(TAU) - PI
}

/// Interpolates between two bearings along the shortest angular path
///
/// `time` is not clamped; values outside [0, 1] extrapolate along the same
/// arc. The result is normalized into [0, 2π).
pub fn interpolate_bearing(from: f64, to: f64, time: f64) -> f64 {
    normalize_bearing(from + shortest_delta(from, to) * time)
}

/// Wraps a longitude into (-π, π]
///
/// Values that land exactly on the antimeridian are reported as +π.
pub fn normalize_longitude(longitude: f64) -> f64 {
    let wrapped = PI - (PI - longitude).rem_euclid(TAU);
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Absolute angular separation between two bearings, in [0, π]
pub fn angular_separation(a: f64, b: f64) -> f64 {
    shortest_delta(a, b).abs()
}
