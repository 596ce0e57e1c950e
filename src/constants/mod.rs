//! Constants module for geodetic and rendering calculations

use std::f64::consts::PI;

// Earth model
/// Radius of the spherical Earth model in meters (equatorial radius)
pub const EARTH_RADIUS: f64 = 6_378_137.0;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;

// Numerical tolerances
/// Direction components smaller than this are treated as parallel to a plane
pub const PARALLEL_EPSILON: f32 = 1e-6;
/// Homogeneous w values smaller than this cannot be projected back to 3D
pub const W_EPSILON: f32 = 1e-12;

// Rendering
/// The on-screen radar spans -20..20 in its own local units
pub const RADAR_DIAMETER: f32 = 40.0;
/// Spacing between horizon grid lines, in meters
pub const GRID_SPACING: f32 = 10.0;
/// Number of grid cells on each side of the origin
pub const GRID_HALF_CELLS: i32 = 10;
