//! Line geometry for background overlays
//!
//! Both generators return vertices in pairs, one pair per line segment, ready
//! to be drawn as a line list.

use nalgebra::Vector3;

use crate::constants::{DEG2RAD, GRID_HALF_CELLS, GRID_SPACING};
use crate::coordinates::geodetic::{to_cartesian, GeodeticCoordinate};

/// Angular spacing of globe rings and meridians, in degrees
const GLOBE_STEP_DEG: i32 = 10;

/// Generates a square horizon grid on the `y = 0` plane around the origin
pub fn generate_grid() -> Vec<Vector3<f32>> {
    let extent = GRID_HALF_CELLS as f32 * GRID_SPACING;
    let mut points = Vec::with_capacity(((2 * GRID_HALF_CELLS + 1) * 4) as usize);

    for i in -GRID_HALF_CELLS..=GRID_HALF_CELLS {
        let offset = i as f32 * GRID_SPACING;

        points.push(Vector3::new(offset, 0.0, -extent));
        points.push(Vector3::new(offset, 0.0, extent));

        points.push(Vector3::new(-extent, 0.0, offset));
        points.push(Vector3::new(extent, 0.0, offset));
    }
    points
}

/// Generates latitude rings and longitude meridians on a sphere of `radius`
///
/// The poles themselves are left out of the rings since they collapse to a
/// point.
pub fn generate_globe(radius: f32) -> Vec<Vector3<f32>> {
    let at = |lat_deg: i32, lon_deg: i32| -> Vector3<f32> {
        let coordinate = GeodeticCoordinate::new(lat_deg as f64 * DEG2RAD, lon_deg as f64 * DEG2RAD);
        to_cartesian(coordinate, radius as f64).cast::<f32>()
    };

    let mut points = Vec::new();

    // Rings of constant latitude
    for lat in (-90 + GLOBE_STEP_DEG..90).step_by(GLOBE_STEP_DEG as usize) {
        for lon in (0..360).step_by(GLOBE_STEP_DEG as usize) {
            points.push(at(lat, lon));
            points.push(at(lat, lon + GLOBE_STEP_DEG));
        }
    }

    // Meridians from pole to pole
    for lon in (0..360).step_by(GLOBE_STEP_DEG as usize) {
        for lat in (-90..90).step_by(GLOBE_STEP_DEG as usize) {
            points.push(at(lat, lon));
            points.push(at(lat + GLOBE_STEP_DEG, lon));
        }
    }

    points
}
