//! Bounding sphere

use nalgebra::{Matrix4, Point3, Vector3};

/// A sphere that can be transformed and provides basic intersection tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vector3<f32>,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vector3<f32>, radius: f32) -> Self {
        BoundingSphere { center, radius }
    }

    /// Transforms the sphere by an affine matrix
    ///
    /// The center goes through the full transform. The radius is scaled by
    /// the longest of the three transformed basis vectors, which is exact for
    /// uniform scaling and keeps the sphere enclosing under non-uniform
    /// scaling.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> BoundingSphere {
        let center = matrix.transform_point(&Point3::from(self.center)).coords;

        let linear = matrix.fixed_view::<3, 3>(0, 0);
        let scale = (0..3)
            .map(|column| linear.column(column).norm())
            .fold(0.0f32, f32::max);

        BoundingSphere {
            center,
            radius: self.radius * scale,
        }
    }

    /// Checks if a line from `origin` along `direction` intersects the sphere
    ///
    /// Solves `|origin + t * direction - center|² = radius²` and returns the
    /// roots `(t1, t2)` with `t1 <= t2`. A tangent line yields `t1 == t2`.
    /// Roots behind the origin are still reported; callers decide whether a
    /// negative `t1` counts. A zero direction never intersects.
    pub fn intersects_with(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
    ) -> Option<(f32, f32)> {
        let offset = origin - self.center;

        let a = direction.dot(direction);
        if a == 0.0 {
            return None;
        }
        let b = 2.0 * direction.dot(&offset);
        let c = offset.dot(&offset) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let t1 = (-b - root) / (2.0 * a);
        let t2 = (-b + root) / (2.0 * a);

        Some((t1, t2))
    }

    /// True when `point` lies inside or on the sphere
    pub fn contains(&self, point: &Vector3<f32>) -> bool {
        (point - self.center).norm_squared() <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Rotation3, Similarity3, Translation3};
    use std::f32::consts::FRAC_PI_2;

    fn unit_sphere() -> BoundingSphere {
        BoundingSphere::new(Vector3::zeros(), 1.0)
    }

    #[test]
    fn test_ray_through_center() {
        let (t1, t2) = unit_sphere()
            .intersects_with(&Vector3::new(0.0, 0.0, -5.0), &Vector3::new(0.0, 0.0, 1.0))
            .unwrap();
        assert_relative_eq!(t1, 4.0);
        assert_relative_eq!(t2, 6.0);
    }

    #[test]
    fn test_unnormalized_direction_scales_times() {
        let (t1, t2) = unit_sphere()
            .intersects_with(&Vector3::new(0.0, 0.0, -5.0), &Vector3::new(0.0, 0.0, 2.0))
            .unwrap();
        assert_relative_eq!(t1, 2.0);
        assert_relative_eq!(t2, 3.0);
    }

    #[test]
    fn test_tangent_ray() {
        let (t1, t2) = unit_sphere()
            .intersects_with(&Vector3::new(1.0, 0.0, -5.0), &Vector3::new(0.0, 0.0, 1.0))
            .unwrap();
        assert_eq!(t1, t2);
        assert_relative_eq!(t1, 5.0);
    }

    #[test]
    fn test_miss_and_zero_direction() {
        let sphere = unit_sphere();
        assert!(sphere
            .intersects_with(&Vector3::new(2.0, 0.0, -5.0), &Vector3::new(0.0, 0.0, 1.0))
            .is_none());
        assert!(sphere
            .intersects_with(&Vector3::new(0.0, 0.0, -5.0), &Vector3::zeros())
            .is_none());
    }

    #[test]
    fn test_sphere_behind_origin() {
        let (t1, t2) = unit_sphere()
            .intersects_with(&Vector3::new(0.0, 0.0, 5.0), &Vector3::new(0.0, 0.0, 1.0))
            .unwrap();
        assert!(t1 < 0.0 && t2 < 0.0);
    }

    #[test]
    fn test_origin_inside() {
        let (t1, t2) = unit_sphere()
            .intersects_with(&Vector3::zeros(), &Vector3::new(1.0, 0.0, 0.0))
            .unwrap();
        assert_relative_eq!(t1, -1.0);
        assert_relative_eq!(t2, 1.0);
    }

    #[test]
    fn test_transform_translation_and_rotation() {
        let sphere = BoundingSphere::new(Vector3::new(1.0, 0.0, 0.0), 2.0);
        let matrix = Translation3::new(0.0, 10.0, 0.0).to_homogeneous()
            * Rotation3::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2).to_homogeneous();

        let moved = sphere.transform(&matrix);
        assert_relative_eq!(moved.center, Vector3::new(0.0, 11.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(moved.radius, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_uniform_scale() {
        let matrix = Similarity3::new(Vector3::new(1.0, 2.0, 3.0), Vector3::zeros(), 3.0)
            .to_homogeneous();
        let scaled = unit_sphere().transform(&matrix);
        assert_relative_eq!(scaled.center, Vector3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(scaled.radius, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_non_uniform_scale_stays_enclosing() {
        let matrix = Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 4.0, 2.0));
        let scaled = unit_sphere().transform(&matrix);
        assert_relative_eq!(scaled.radius, 4.0);
        assert!(scaled.contains(&Vector3::new(0.0, 4.0, 0.0)));
    }
}
