use crate::geometry::Real;
use crate::geometry::transform::{RotationAngles, compose_rotation, normalize, rotate_points};
use crate::material_system::texture::Texture;
use nalgebra::{Point3, Vector3};
use std::sync::Arc;

/// Which side of the cube a face lies on, in object space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSide {
    /// -z, facing a camera placed on the negative z axis
    Front,
    /// +z
    Back,
    /// -y
    Bottom,
    /// +y
    Top,
    /// -x
    Left,
    /// +x
    Right,
}

/// Corner signs of the 8 base vertices.
const CORNERS: [[Real; 3]; 8] = [
    [-1.0, -1.0, -1.0], // 0: front bottom left
    [1.0, -1.0, -1.0],  // 1: front bottom right
    [1.0, 1.0, -1.0],   // 2: front top right
    [-1.0, 1.0, -1.0],  // 3: front top left
    [-1.0, -1.0, 1.0],  // 4: back bottom left
    [1.0, -1.0, 1.0],   // 5: back bottom right
    [1.0, 1.0, 1.0],    // 6: back top right
    [-1.0, 1.0, 1.0],   // 7: back top left
];

/// Face topology in definition order. Index order matches the texture
/// corners (0,0), (w-1,0), (w-1,h-1), (0,h-1).
const FACES: [(FaceSide, [usize; 4]); 6] = [
    (FaceSide::Front, [0, 1, 2, 3]),
    (FaceSide::Back, [4, 5, 6, 7]),
    (FaceSide::Bottom, [0, 1, 5, 4]),
    (FaceSide::Top, [2, 3, 7, 6]),
    (FaceSide::Left, [0, 3, 7, 4]),
    (FaceSide::Right, [1, 2, 6, 5]),
];

/// A quad face of the cube: four indices into the cube's vertex arrays and
/// the values derived from the current transformed vertices.
#[derive(Debug, Clone)]
pub struct Face {
    side: FaceSide,
    indices: [usize; 4],
    center: Point3<Real>,
    depth: Real,
    normal: Vector3<Real>,
}

impl Face {
    fn new(side: FaceSide, indices: [usize; 4]) -> Self {
        Face {
            side,
            indices,
            center: Point3::origin(),
            depth: 0.0,
            normal: Vector3::zeros(),
        }
    }

    /// Recomputes centroid, depth and normal from the cube's transformed
    /// vertices.
    fn update(&mut self, transformed_vertices: &[Point3<Real>]) {
        let [a, b, c, d] = self.indices.map(|i| transformed_vertices[i]);
        self.center = Point3::from((a.coords + b.coords + c.coords + d.coords) / 4.0);
        self.depth = self.center.z;

        // Winding differs between faces; orient away from the cube centre
        let normal = normalize(&(b - a).cross(&(c - a)));
        self.normal = if normal.dot(&self.center.coords) < 0.0 {
            -normal
        } else {
            normal
        };
    }

    pub fn side(&self) -> FaceSide {
        self.side
    }

    pub fn indices(&self) -> &[usize; 4] {
        &self.indices
    }

    pub fn center(&self) -> Point3<Real> {
        self.center
    }

    /// Camera-axis coordinate of the centroid; larger is farther away.
    pub fn depth(&self) -> Real {
        self.depth
    }

    pub fn normal(&self) -> Vector3<Real> {
        self.normal
    }
}

/// Axis-aligned textured cube centred on the origin.
#[derive(Debug, Clone)]
pub struct Cube {
    size: Real,
    texture: Arc<Texture>,
    vertices: [Point3<Real>; 8],
    transformed_vertices: [Point3<Real>; 8],
    faces: Vec<Face>,
    rotation: RotationAngles,
}

impl Cube {
    /// Builds the cube and rotates it by zero once so that every face has a
    /// valid depth and normal from the start.
    pub fn new(texture: Arc<Texture>, size: Real) -> Self {
        let half = size / 2.0;
        let vertices = CORNERS.map(|[x, y, z]| Point3::new(x * half, y * half, z * half));
        let faces = FACES
            .iter()
            .map(|&(side, indices)| Face::new(side, indices))
            .collect();

        let mut cube = Cube {
            size,
            texture,
            vertices,
            transformed_vertices: vertices,
            faces,
            rotation: RotationAngles::zero(),
        };
        cube.rotate(0.0, 0.0, 0.0);
        cube
    }

    /// Sets the absolute orientation. Transformed vertices are always the
    /// base vertices times the new rotation, never the previous state.
    pub fn rotate(&mut self, angle_x: Real, angle_y: Real, angle_z: Real) {
        self.rotate_to(RotationAngles::new(angle_x, angle_y, angle_z));
    }

    pub fn rotate_to(&mut self, angles: RotationAngles) {
        let rotation = compose_rotation(&angles);
        let rotated = rotate_points(&self.vertices, &rotation);
        self.transformed_vertices.copy_from_slice(&rotated);
        self.rotation = angles;

        for face in &mut self.faces {
            face.update(&self.transformed_vertices);
        }
    }

    pub fn size(&self) -> Real {
        self.size
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn rotation(&self) -> RotationAngles {
        self.rotation
    }

    pub fn vertices(&self) -> &[Point3<Real>; 8] {
        &self.vertices
    }

    pub fn transformed_vertices(&self) -> &[Point3<Real>; 8] {
        &self.transformed_vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face(&self, side: FaceSide) -> &Face {
        // FACES covers every side exactly once
        &self.faces[FACES
            .iter()
            .position(|(s, _)| *s == side)
            .unwrap_or_default()]
    }

    /// The face's 4 transformed vertices in index order.
    pub fn face_vertices(&self, face: &Face) -> [Point3<Real>; 4] {
        face.indices.map(|i| self.transformed_vertices[i])
    }
}
