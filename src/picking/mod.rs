//! Ray casting and view-frustum culling
//!
//! Screen coordinates are turned into world-space rays by unprojecting them
//! through the inverse of `projection * view`, using OpenGL conventions:
//! column-major matrices and normalized device depth in [-1, 1]. Screen
//! points share the pixel space of the [`Viewport`]; no y-flip is applied.

use log::{debug, warn};
use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

use crate::bounds::{BoundingBox, BoundingSphere};
use crate::constants::{PARALLEL_EPSILON, W_EPSILON};
use crate::{ArError, Result};

/// A rendering viewport in pixels
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Viewport {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a viewport from the `[x, y, width, height]` array renderers use
    pub fn from_array(viewport: [f32; 4]) -> Self {
        Self::new(viewport[0], viewport[1], viewport[2], viewport[3])
    }

    /// Maps a pixel position to normalized device x/y in [-1, 1]
    pub fn to_ndc(&self, screen: &Vector2<f32>) -> Result<Vector2<f32>> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ArError::InvalidInput(format!(
                "viewport has no area: {}x{}",
                self.width, self.height
            )));
        }
        Ok(Vector2::new(
            2.0 * (screen.x - self.x) / self.width - 1.0,
            2.0 * (screen.y - self.y) / self.height - 1.0,
        ))
    }

    fn corners(&self) -> [Vector2<f32>; 4] {
        [
            Vector2::new(self.x, self.y),
            Vector2::new(self.x + self.width, self.y),
            Vector2::new(self.x, self.y + self.height),
            Vector2::new(self.x + self.width, self.y + self.height),
        ]
    }
}

/// A half-line from `origin` along `direction`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Ray { origin, direction }
    }

    /// The point at parameter `t`: `origin + direction * t`
    pub fn at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Result of a picking test, see [`find_intersection`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionResult {
    /// Number of candidates hit in front of the ray origin
    pub hits: u32,
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
    /// Index of the nearest candidate that was hit
    pub index: usize,
    /// Entry time along `direction`
    pub t1: f32,
    /// Exit time along `direction`
    pub t2: f32,
}

impl IntersectionResult {
    /// The point where the ray enters the nearest candidate
    pub fn entry_point(&self) -> Vector3<f32> {
        self.origin + self.direction * self.t1
    }
}

/// Unprojects screen coordinates through `projection * view`
///
/// Precomputes the inverse once; used for both single rays and frustum
/// corners.
struct Unprojector {
    inverse: Matrix4<f32>,
    viewport: Viewport,
}

impl Unprojector {
    fn new(projection: &Matrix4<f32>, view: &Matrix4<f32>, viewport: Viewport) -> Result<Self> {
        let combined = projection * view;
        let inverse = combined.try_inverse().ok_or_else(|| {
            warn!("projection * view is not invertible");
            ArError::InvalidInput("projection * view matrix is not invertible".to_string())
        })?;
        Ok(Unprojector { inverse, viewport })
    }

    fn unproject(&self, screen: &Vector2<f32>, depth: f32) -> Result<Vector3<f32>> {
        let ndc = self.viewport.to_ndc(screen)?;
        let world = self.inverse * Vector4::new(ndc.x, ndc.y, depth, 1.0);

        if world.w.abs() < W_EPSILON || !world.w.is_finite() {
            return Err(ArError::DegenerateGeometry(format!(
                "unprojected point at depth {} has w = {}",
                depth, world.w
            )));
        }
        Ok(world.xyz() / world.w)
    }

    fn ray(&self, screen: &Vector2<f32>) -> Result<Ray> {
        let near = self.unproject(screen, -1.0)?;
        let far = self.unproject(screen, 1.0)?;

        let direction = (far - near).try_normalize(f32::EPSILON).ok_or_else(|| {
            ArError::DegenerateGeometry("near and far points coincide".to_string())
        })?;
        Ok(Ray::new(near, direction))
    }
}

/// Calculates the world-space ray under a point on the screen
///
/// The ray starts on the near plane and its unit direction points towards
/// the matching point on the far plane.
pub fn ray_from_screen_coordinates(
    projection: &Matrix4<f32>,
    view: &Matrix4<f32>,
    viewport: Viewport,
    screen: Vector2<f32>,
) -> Result<Ray> {
    Unprojector::new(projection, view, viewport)?.ray(&screen)
}

/// Finds where a ray crosses the horizontal plane `y = 0`
///
/// Returns `None` when the ray is parallel to the plane or the crossing lies
/// behind the ray origin.
pub fn intersect_at_y0(ray: &Ray) -> Option<Vector3<f32>> {
    if ray.direction.y.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    if t < 0.0 {
        return None;
    }
    let mut point = ray.at(t);
    point.y = 0.0;
    Some(point)
}

/// Tests a ray against candidate spheres and selects the nearest hit
///
/// Only hits with `t1 >= 0` count. When two candidates share the same entry
/// time the one earlier in the list wins.
pub fn nearest_sphere_hit(ray: &Ray, spheres: &[BoundingSphere]) -> Option<IntersectionResult> {
    let mut best: Option<IntersectionResult> = None;
    let mut hits = 0;

    for (index, sphere) in spheres.iter().enumerate() {
        let Some((t1, t2)) = sphere.intersects_with(&ray.origin, &ray.direction) else {
            continue;
        };
        if t1 < 0.0 {
            continue;
        }
        hits += 1;

        if best.map_or(true, |b| t1 < b.t1) {
            best = Some(IntersectionResult {
                hits: 0,
                origin: ray.origin,
                direction: ray.direction,
                index,
                t1,
                t2,
            });
        }
    }

    best.map(|mut result| {
        result.hits = hits;
        result
    })
}

/// Finds the object under a point on the screen
///
/// # Arguments
///
/// * `projection`, `view` - The camera matrices used for rendering
/// * `viewport` - The rendering viewport
/// * `origin` - The eye position; the pick ray starts here
/// * `screen` - The tapped point in viewport pixel space
/// * `spheres` - Candidate bounding spheres in world space
///
/// # Returns
///
/// `Ok(None)` when nothing is hit, or an error when the camera matrices
/// cannot be inverted.
pub fn find_intersection(
    projection: &Matrix4<f32>,
    view: &Matrix4<f32>,
    viewport: Viewport,
    origin: Vector3<f32>,
    screen: Vector2<f32>,
    spheres: &[BoundingSphere],
) -> Result<Option<IntersectionResult>> {
    let ray = ray_from_screen_coordinates(projection, view, viewport, screen)?;
    let ray = Ray::new(origin, ray.direction);

    let result = nearest_sphere_hit(&ray, spheres);
    match &result {
        Some(hit) => debug!(
            "Picked candidate {} of {} at t = {} ({} hits)",
            hit.index,
            spheres.len(),
            hit.t1,
            hit.hits
        ),
        None => debug!("Pick at {:?} missed {} candidates", screen, spheres.len()),
    }
    Ok(result)
}

/// Calculates the world-space box enclosing the view frustum
///
/// All eight frustum corners (four screen corners on the near and far
/// planes) are unprojected and folded into a box.
pub fn calculate_view_frustum_bounding_box(
    projection: &Matrix4<f32>,
    view: &Matrix4<f32>,
    viewport: Viewport,
) -> Result<BoundingBox> {
    let unprojector = Unprojector::new(projection, view, viewport)?;

    let mut bbox = BoundingBox::empty();
    for depth in [-1.0, 1.0] {
        for corner in viewport.corners() {
            bbox.add(unprojector.unproject(&corner, depth)?);
        }
    }
    Ok(bbox)
}

/// Uniform scale that makes `child` fit inside `container`
///
/// Returns the ratio `container.extent / child.extent` along the most
/// constraining axis. The ratio is exact, so it exceeds 1 when the child is
/// already smaller than the container; clamp it if content should only ever
/// shrink. Axes where the child is flat do not constrain the result.
pub fn scale_factor_to_fit_frustum(container: &BoundingBox, child: &BoundingBox) -> Result<f32> {
    let container_extent = container.extent()?;
    let child_extent = child.extent()?;

    (0..3)
        .filter(|&axis| child_extent[axis] > 0.0)
        .map(|axis| container_extent[axis] / child_extent[axis])
        .reduce(f32::min)
        .ok_or_else(|| ArError::DegenerateGeometry("child box has no extent".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use rstest::rstest;

    fn viewport() -> Viewport {
        Viewport::new(0.0, 0.0, 100.0, 100.0)
    }

    fn camera() -> (Matrix4<f32>, Matrix4<f32>) {
        let projection = Matrix4::new_perspective(1.0, std::f32::consts::FRAC_PI_2, 1.0, 100.0);
        let view = Matrix4::look_at_rh(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(0.0, 0.0, -1.0),
            &Vector3::y(),
        );
        (projection, view)
    }

    #[test]
    fn test_identity_ray() {
        let identity = Matrix4::identity();
        let ray = ray_from_screen_coordinates(&identity, &identity, viewport(), Vector2::new(50.0, 50.0))
            .unwrap();
        assert_relative_eq!(ray.origin, Vector3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(ray.direction, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_perspective_center_ray_points_forward() {
        let (projection, view) = camera();
        let ray = ray_from_screen_coordinates(&projection, &view, viewport(), Vector2::new(50.0, 50.0))
            .unwrap();
        assert_relative_eq!(ray.origin, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-4);
        assert_relative_eq!(ray.direction, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-4);
    }

    #[test]
    fn test_perspective_corner_ray() {
        // 90° field of view: the right edge of the screen is 45° off axis
        let (projection, view) = camera();
        let ray = ray_from_screen_coordinates(&projection, &view, viewport(), Vector2::new(100.0, 50.0))
            .unwrap();
        let expected = Vector3::new(1.0, 0.0, -1.0).normalize();
        assert_relative_eq!(ray.direction, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_singular_matrix_is_reported() {
        let singular = Matrix4::zeros();
        let result = ray_from_screen_coordinates(
            &singular,
            &Matrix4::identity(),
            viewport(),
            Vector2::new(1.0, 1.0),
        );
        assert!(matches!(result, Err(ArError::InvalidInput(_))));

        let flat = Viewport::new(0.0, 0.0, 0.0, 100.0);
        let identity = Matrix4::identity();
        assert!(ray_from_screen_coordinates(&identity, &identity, flat, Vector2::zeros()).is_err());
    }

    #[test]
    fn test_intersect_at_y0() {
        let ray = Ray::new(Vector3::new(1.0, 10.0, 2.0), Vector3::new(0.0, -2.0, 1.0));
        let point = intersect_at_y0(&ray).unwrap();
        assert_relative_eq!(point, Vector3::new(1.0, 0.0, 7.0));

        let level = Ray::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(intersect_at_y0(&level).is_none());

        // Looking at the sky: the plane is only crossed behind the origin
        let skyward = Ray::new(Vector3::new(0.0, 10.0, 0.0), Vector3::new(0.0, 1.0, -1.0));
        assert!(intersect_at_y0(&skyward).is_none());
    }

    #[test]
    fn test_find_intersection_picks_nearer_sphere() {
        let identity = Matrix4::identity();
        let spheres = [
            BoundingSphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0),
            BoundingSphere::new(Vector3::new(0.0, 0.0, 0.0), 1.0),
            BoundingSphere::new(Vector3::new(10.0, 0.0, 0.0), 1.0),
        ];

        let result = find_intersection(
            &identity,
            &identity,
            viewport(),
            Vector3::new(0.0, 0.0, -10.0),
            Vector2::new(50.0, 50.0),
            &spheres,
        )
        .unwrap()
        .unwrap();

        assert_eq!(result.index, 1);
        assert_eq!(result.hits, 2);
        assert_relative_eq!(result.t1, 9.0, epsilon = 1e-5);
        assert_relative_eq!(result.t2, 11.0, epsilon = 1e-5);
        assert_relative_eq!(result.entry_point(), Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_overlapping_spheres_tie_goes_to_first() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, -10.0), Vector3::new(0.0, 0.0, 1.0));
        let spheres = [
            BoundingSphere::new(Vector3::new(0.0, 0.0, 3.0), 2.0),
            BoundingSphere::new(Vector3::new(0.0, 0.0, 0.0), 2.0),
            BoundingSphere::new(Vector3::new(0.0, 0.0, 0.0), 2.0),
        ];
        let result = nearest_sphere_hit(&ray, &spheres).unwrap();
        assert_eq!(result.index, 1);
        assert_eq!(result.hits, 3);
    }

    #[test]
    fn test_spheres_behind_origin_are_ignored() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
        let spheres = [
            BoundingSphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0),
            // Contains the origin, so entry lies behind it
            BoundingSphere::new(Vector3::new(0.0, 0.0, 0.5), 1.0),
        ];
        assert!(nearest_sphere_hit(&ray, &spheres).is_none());
        assert!(nearest_sphere_hit(&ray, &[]).is_none());
    }

    #[test]
    fn test_find_intersection_miss() {
        let identity = Matrix4::identity();
        let spheres = [BoundingSphere::new(Vector3::new(5.0, 5.0, 0.0), 1.0)];
        let result = find_intersection(
            &identity,
            &identity,
            viewport(),
            Vector3::new(0.0, 0.0, -10.0),
            Vector2::new(50.0, 50.0),
            &spheres,
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_identity_frustum_is_ndc_cube() {
        let identity = Matrix4::identity();
        let bbox = calculate_view_frustum_bounding_box(&identity, &identity, viewport()).unwrap();
        assert_eq!(bbox.count, 8);
        assert_relative_eq!(bbox.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_relative_eq!(bbox.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_perspective_frustum_box() {
        let (projection, view) = camera();
        let bbox = calculate_view_frustum_bounding_box(&projection, &view, viewport()).unwrap();

        // Far plane at z = -100 with half-width 100 for a 90° square frustum
        assert_relative_eq!(bbox.min, Vector3::new(-100.0, -100.0, -100.0), max_relative = 1e-3);
        assert_relative_eq!(bbox.max.x, 100.0, max_relative = 1e-3);
        assert_relative_eq!(bbox.max.z, -1.0, max_relative = 1e-3);
    }

    #[rstest]
    #[case(Vector3::new(5.0, 20.0, 5.0), 0.5)]
    #[case(Vector3::new(20.0, 5.0, 40.0), 0.25)]
    #[case(Vector3::new(5.0, 5.0, 5.0), 2.0)]
    #[case(Vector3::new(20.0, 0.0, 0.0), 0.5)]
    fn test_scale_factor_to_fit(#[case] child_max: Vector3<f32>, #[case] expected: f32) {
        let container = BoundingBox::new(Vector3::zeros(), Vector3::new(10.0, 10.0, 10.0));
        let child = BoundingBox::new(Vector3::zeros(), child_max);
        assert_relative_eq!(scale_factor_to_fit_frustum(&container, &child).unwrap(), expected);
    }

    #[test]
    fn test_scale_factor_degenerate() {
        let container = BoundingBox::new(Vector3::zeros(), Vector3::new(10.0, 10.0, 10.0));
        let point = BoundingBox::from_points([Vector3::new(1.0, 1.0, 1.0)]);
        assert!(matches!(
            scale_factor_to_fit_frustum(&container, &point),
            Err(ArError::DegenerateGeometry(_))
        ));
        assert!(scale_factor_to_fit_frustum(&BoundingBox::empty(), &container).is_err());
    }
}
