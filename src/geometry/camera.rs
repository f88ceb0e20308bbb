use crate::geometry::Real;
use nalgebra::{Point3, Vector3};

/// Fixed pinhole camera looking down +z.
///
/// There is no look-at target and no up vector: camera space is world space
/// translated so that the camera sits at the origin.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Point3<Real>,
    fov_degrees: Real,
    focal_length: Real,
}

impl Camera {
    /// `fov_degrees` is the full field of view; the focal length is derived
    /// once as `1 / tan(fov / 2)`.
    pub fn new(position: Point3<Real>, fov_degrees: Real) -> Self {
        let fov_rad = fov_degrees.to_radians();
        Camera {
            position,
            fov_degrees,
            focal_length: 1.0 / (fov_rad / 2.0).tan(),
        }
    }

    pub fn position(&self) -> Point3<Real> {
        self.position
    }

    pub fn fov_degrees(&self) -> Real {
        self.fov_degrees
    }

    pub fn focal_length(&self) -> Real {
        self.focal_length
    }

    /// World point -> camera space (camera at the origin).
    pub fn to_camera_space(&self, point: &Point3<Real>) -> Vector3<Real> {
        point - self.position
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, -5.0), 60.0)
    }
}
