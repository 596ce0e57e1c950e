//! arspatial: spatial math for location-based augmented reality
//!
//! This crate converts geodetic coordinates into a Cartesian world frame,
//! tracks the device location, and provides the bounding volume, ray casting
//! and culling operations needed to place and pick geo-anchored content in a
//! camera view.

use thiserror::Error;

pub mod bounds;
pub mod constants;
pub mod coordinates;
pub mod location;
pub mod model;
pub mod picking;
pub mod scene;

// Re-export commonly used types
pub use bounds::{BoundingBox, BoundingSphere};
pub use coordinates::GeodeticCoordinate;
pub use location::{LocationTracker, PlatformReading, ReadingUpdate, WorldLocation};
pub use model::{Model, Renderable};
pub use picking::{IntersectionResult, Ray, Viewport};
pub use scene::{ViewSettings, WorldPoint};

/// Main error type for the arspatial library
#[derive(Debug, Error)]
pub enum ArError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No intersection")]
    NoIntersection,

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for arspatial operations
pub type Result<T> = std::result::Result<T, ArError>;
