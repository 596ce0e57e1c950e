//! Axis-aligned bounding box

use nalgebra::{Matrix4, Point3, Vector3};

use super::BoundingSphere;
use crate::constants::PARALLEL_EPSILON;
use crate::{ArError, Result};

/// An axis-aligned bounding box which provides basic intersection tests
///
/// A box starts empty (`count == 0`) and grows as points are added. `min`
/// and `max` are meaningless while the box is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// The lower corner of the box
    pub min: Vector3<f32>,
    /// The upper corner of the box
    pub max: Vector3<f32>,
    /// Number of points added to the box
    pub count: u32,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// Creates an empty box
    pub fn empty() -> Self {
        BoundingBox {
            min: Vector3::zeros(),
            max: Vector3::zeros(),
            count: 0,
        }
    }

    /// Creates a box spanning two corners
    ///
    /// The corners may be given in any order.
    pub fn new(a: Vector3<f32>, b: Vector3<f32>) -> Self {
        BoundingBox {
            min: a.inf(&b),
            max: a.sup(&b),
            count: 2,
        }
    }

    /// Creates the smallest box enclosing all `points`
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vector3<f32>>,
    {
        let mut bbox = Self::empty();
        for point in points {
            bbox.add(point);
        }
        bbox
    }

    /// True until the first point is added
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Adds a point to the box, expanding it when the point lies outside
    pub fn add(&mut self, point: Vector3<f32>) {
        if self.count == 0 {
            self.min = point;
            self.max = point;
        } else {
            self.min = self.min.inf(&point);
            self.max = self.max.sup(&point);
        }
        self.count += 1;
    }

    /// Size of the box along each axis
    pub fn extent(&self) -> Result<Vector3<f32>> {
        self.require_points("extent")?;
        Ok(self.max - self.min)
    }

    /// Center of the box, used as the center of its bounding sphere
    pub fn center(&self) -> Result<Vector3<f32>> {
        self.require_points("center")?;
        Ok((self.min + self.max) / 2.0)
    }

    /// Distance from the center to a corner, used as its bounding sphere radius
    pub fn radius(&self) -> Result<f32> {
        let center = self.center()?;
        Ok((self.max - center).norm())
    }

    /// The sphere through the corners of the box
    pub fn bounding_sphere(&self) -> Result<BoundingSphere> {
        Ok(BoundingSphere::new(self.center()?, self.radius()?))
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Vector3<f32>; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vector3::new(lo.x, lo.y, lo.z),
            Vector3::new(hi.x, lo.y, lo.z),
            Vector3::new(lo.x, hi.y, lo.z),
            Vector3::new(hi.x, hi.y, lo.z),
            Vector3::new(lo.x, lo.y, hi.z),
            Vector3::new(hi.x, lo.y, hi.z),
            Vector3::new(lo.x, hi.y, hi.z),
            Vector3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// True when `point` lies inside or on the box
    pub fn contains(&self, point: &Vector3<f32>) -> bool {
        !self.is_empty()
            && (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }

    /// Transforms the box and returns the axis-aligned box enclosing the result
    ///
    /// All eight corners go through the (possibly projective) transform, so
    /// the result stays correct under rotation. An empty box stays empty.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> BoundingBox {
        if self.is_empty() {
            return *self;
        }

        self.corners()
            .iter()
            .map(|corner| matrix.transform_point(&Point3::from(*corner)).coords)
            .collect()
    }

    /// Checks if a line from `origin` along `direction` intersects the box
    ///
    /// Returns `(t1, t2)`, the entry and exit times along `direction`: the
    /// entry point is `origin + direction * t1`. `t1` is negative when the
    /// origin lies inside the box. Returns `None` when the ray misses, when
    /// the box lies entirely behind the origin, or when the box is empty.
    pub fn intersects_with(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
    ) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }

        let mut t1 = f32::NEG_INFINITY;
        let mut t2 = f32::INFINITY;

        for axis in 0..3 {
            let (o, d) = (origin[axis], direction[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < PARALLEL_EPSILON {
                // Parallel to this slab: either always inside it or never
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let mut near = (lo - o) / d;
            let mut far = (hi - o) / d;
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }

            t1 = t1.max(near);
            t2 = t2.min(far);

            if t1 > t2 {
                return None;
            }
        }

        if t2 < 0.0 {
            return None;
        }

        Some((t1, t2))
    }

    fn require_points(&self, what: &str) -> Result<()> {
        if self.is_empty() {
            Err(ArError::DegenerateGeometry(format!(
                "{} of an empty bounding box",
                what
            )))
        } else {
            Ok(())
        }
    }
}

impl FromIterator<Vector3<f32>> for BoundingBox {
    fn from_iter<I: IntoIterator<Item = Vector3<f32>>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}

impl Extend<Vector3<f32>> for BoundingBox {
    fn extend<I: IntoIterator<Item = Vector3<f32>>>(&mut self, iter: I) {
        for point in iter {
            self.add(point);
        }
    }
}
