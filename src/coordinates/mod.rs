//! Geodetic coordinates and bearing arithmetic

pub mod angle;
pub mod geodetic;

pub use geodetic::{
    bearing_between, distance_between, from_cartesian, from_degrees, to_cartesian,
    GeodeticCoordinate,
};
