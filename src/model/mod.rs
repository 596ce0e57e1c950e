//! Renderable models attached to world points
//!
//! Drawing is left to the platform renderer; the geometry layer only needs
//! the bounding volumes of each model for culling and picking. Models come in
//! two kinds: meshes loaded from disk by an external loader and flat
//! billboards showing a rendered view.

use nalgebra::Vector3;

use crate::bounds::{BoundingBox, BoundingSphere};

/// The bounding-volume capability of anything that can be drawn in the scene
pub trait Renderable {
    /// A box enclosing the model in its local coordinates
    fn bounding_box(&self) -> BoundingBox;

    /// A sphere enclosing the model in its local coordinates
    fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_box()
            .bounding_sphere()
            .unwrap_or_else(|_| BoundingSphere::new(Vector3::zeros(), 0.0))
    }
}

/// A triangle mesh model
///
/// Vertices are supplied by an external `.obj` loader; the bounding box is
/// kept in sync with them.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshModel {
    name: String,
    vertices: Vec<Vector3<f32>>,
    bounding_box: BoundingBox,
}

impl MeshModel {
    pub fn new(name: &str, vertices: Vec<Vector3<f32>>) -> Self {
        let bounding_box = BoundingBox::from_points(vertices.iter().copied());
        MeshModel {
            name: name.to_string(),
            vertices,
            bounding_box,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vector3<f32>] {
        &self.vertices
    }

    /// Replaces the vertices and recomputes the bounding box
    pub fn set_vertices(&mut self, vertices: Vec<Vector3<f32>>) {
        self.bounding_box = BoundingBox::from_points(vertices.iter().copied());
        self.vertices = vertices;
    }
}

impl Renderable for MeshModel {
    fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }
}

/// A flat, camera-facing quad in the XY plane centered on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillboardModel {
    pub width: f32,
    pub height: f32,
    /// Multiplies both width and height
    pub scale: f32,
}

impl BillboardModel {
    pub fn new(width: f32, height: f32) -> Self {
        BillboardModel {
            width,
            height,
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl Renderable for BillboardModel {
    fn bounding_box(&self) -> BoundingBox {
        let half = Vector3::new(self.width * self.scale / 2.0, self.height * self.scale / 2.0, 0.0);
        BoundingBox::new(-half, half)
    }
}

/// Any model that can be attached to a world point
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Mesh(MeshModel),
    Billboard(BillboardModel),
}

impl Renderable for Model {
    fn bounding_box(&self) -> BoundingBox {
        match self {
            Model::Mesh(mesh) => mesh.bounding_box(),
            Model::Billboard(billboard) => billboard.bounding_box(),
        }
    }
}

impl From<MeshModel> for Model {
    fn from(mesh: MeshModel) -> Self {
        Model::Mesh(mesh)
    }
}

impl From<BillboardModel> for Model {
    fn from(billboard: BillboardModel) -> Self {
        Model::Billboard(billboard)
    }
}
