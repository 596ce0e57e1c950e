//! The browser scene: world points seen from the device's location
//!
//! This module ties the geometry together for a frame: which points are close
//! enough to draw, how large to draw them, which one the user tapped, and the
//! radar and grid overlays.

pub mod grid;
pub mod radar;
pub mod settings;
pub mod world_point;

use log::debug;
use nalgebra::{Matrix4, Vector2, Vector3};

use crate::location::WorldLocation;
use crate::picking::{find_intersection, intersect_at_y0, ray_from_screen_coordinates, Viewport};
use crate::{ArError, Result};

pub use radar::{radar_blips, RadarBlips};
pub use settings::ViewSettings;
pub use world_point::WorldPoint;

/// Indices of the points within `distance` of `origin` (straight-line)
pub fn points_within_distance(origin: &WorldLocation, points: &[WorldPoint], distance: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, point)| origin.distance_from(&point.location) <= distance)
        .map(|(index, _)| index)
        .collect()
}

/// Indices of the points that fall between the minimum and maximum
/// rendering distances
pub fn visible_points(origin: &WorldLocation, points: &[WorldPoint], settings: &ViewSettings) -> Vec<usize> {
    let min = settings.minimum_distance as f64;
    let max = settings.maximum_distance as f64;

    let visible: Vec<usize> = points
        .iter()
        .enumerate()
        .filter(|(_, point)| {
            let distance = origin.distance_from(&point.location);
            distance >= min && distance <= max
        })
        .map(|(index, _)| index)
        .collect();

    debug!("{} of {} world points visible", visible.len(), points.len());
    visible
}

/// Scale applied to a model at `distance` so it keeps a constant apparent
/// size outside the near/far band
///
/// Within `[near_distance, far_distance]` models are drawn at their true
/// size (scale 1). Nearer models are shrunk and further ones enlarged so they
/// look as they would at the nearest or furthest bound. Settings that were
/// never validated are tolerated: swapped bounds are reordered and NaN
/// bounds impose no limit.
pub fn distance_scale(distance: f32, settings: &ViewSettings) -> f32 {
    if !(distance > 0.0) || !distance.is_finite() {
        return 1.0;
    }
    let near = settings.near_distance.min(settings.far_distance);
    let far = settings.near_distance.max(settings.far_distance);
    distance.max(near).min(far) / distance
}

/// Finds the world point under a point on the screen
///
/// Points without a model cannot be picked. The camera is assumed to sit at
/// `origin`, at the local origin of the view.
pub fn pick_world_point(
    projection: &Matrix4<f32>,
    view: &Matrix4<f32>,
    viewport: Viewport,
    origin: &WorldLocation,
    screen: Vector2<f32>,
    points: &[WorldPoint],
) -> Result<Option<usize>> {
    let (indices, spheres): (Vec<usize>, Vec<_>) = points
        .iter()
        .enumerate()
        .filter_map(|(index, point)| point.bounding_sphere_from(origin).map(|s| (index, s)))
        .unzip();

    let hit = find_intersection(projection, view, viewport, Vector3::zeros(), screen, &spheres)?;
    Ok(hit.map(|result| indices[result.index]))
}

/// Finds the point on the ground plane (`y = 0`) under a point on the screen
pub fn ground_point_from_screen(
    projection: &Matrix4<f32>,
    view: &Matrix4<f32>,
    viewport: Viewport,
    screen: Vector2<f32>,
) -> Result<Vector3<f32>> {
    let ray = ray_from_screen_coordinates(projection, view, viewport, screen)?;
    intersect_at_y0(&ray).ok_or(ArError::NoIntersection)
}
