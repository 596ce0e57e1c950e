//! Bounding volumes for culling and picking
//!
//! [`BoundingBox`] is an axis-aligned box built up incrementally from points;
//! [`BoundingSphere`] is a center and radius. Both can be transformed by a
//! 4×4 matrix and intersected with a ray.

pub mod bbox;
pub mod sphere;

pub use bbox::BoundingBox;
pub use sphere::BoundingSphere;
