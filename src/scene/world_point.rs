//! World points: a location with a model and metadata

use std::collections::BTreeMap;

use nalgebra::{Matrix4, Vector3};

use crate::bounds::BoundingSphere;
use crate::location::WorldLocation;
use crate::model::{Model, Renderable};

/// Metadata key read by [`WorldPoint::title`]
pub const TITLE_KEY: &str = "title";
/// Metadata key read by [`WorldPoint::subtitle`]
pub const SUBTITLE_KEY: &str = "subtitle";

/// A renderable model and associated metadata at a world location
///
/// The metadata map is the place to keep anything else known about the
/// point, such as a street address or telephone number.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPoint {
    pub location: WorldLocation,
    pub model: Option<Model>,
    /// Local transform applied to the model before placing it
    pub transform: Matrix4<f32>,
    pub metadata: BTreeMap<String, String>,
    /// Render at the absolute Earth-centered position instead of relative
    /// to the viewer
    pub fixed: bool,
}

impl WorldPoint {
    pub fn new(location: WorldLocation) -> Self {
        WorldPoint {
            location,
            model: None,
            transform: Matrix4::identity(),
            metadata: BTreeMap::new(),
            fixed: false,
        }
    }

    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get(TITLE_KEY).map(String::as_str)
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.metadata.get(SUBTITLE_KEY).map(String::as_str)
    }

    /// Where the model is placed when viewed from `origin`
    ///
    /// Relative to the viewer normally, or the absolute position for fixed
    /// points.
    pub fn placement_from(&self, origin: &WorldLocation) -> Vector3<f32> {
        let offset = if self.fixed {
            self.location.position()
        } else {
            origin.relative_position_of(&self.location)
        };
        offset.cast::<f32>()
    }

    /// The model's bounding sphere in the viewer's frame
    ///
    /// `None` when the point has no model.
    pub fn bounding_sphere_from(&self, origin: &WorldLocation) -> Option<BoundingSphere> {
        let model = self.model.as_ref()?;
        let local = model.bounding_sphere().transform(&self.transform);
        Some(BoundingSphere::new(
            local.center + self.placement_from(origin),
            local.radius,
        ))
    }
}
