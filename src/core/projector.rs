use crate::geometry::camera::Camera;
use crate::geometry::{EPSILON, Real};
use nalgebra::{Point2, Point3};

/// Perspective projection from world space to screen pixels.
#[derive(Debug, Clone)]
pub struct Projector {
    camera: Camera,
    width: usize,
    height: usize,
    aspect_ratio: Real,
}

impl Projector {
    pub fn new(camera: Camera, width: usize, height: usize) -> Self {
        Projector {
            camera,
            width,
            height,
            aspect_ratio: width as Real / height as Real,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn aspect_ratio(&self) -> Real {
        self.aspect_ratio
    }

    /// Projects one point.
    ///
    /// A camera-space depth closer to zero than [`EPSILON`] is clamped to
    /// `±EPSILON` (sign kept, zero counts as positive), so the result is
    /// always finite even for points on the camera's own plane.
    pub fn project_point(&self, point: &Point3<Real>) -> Point2<Real> {
        let view = self.camera.to_camera_space(point);
        let z = if view.z.abs() < EPSILON {
            if view.z < 0.0 { -EPSILON } else { EPSILON }
        } else {
            view.z
        };

        let focal_length = self.camera.focal_length();
        let x_projected = view.x * focal_length / z;
        let y_projected = view.y * focal_length / z;

        let half_height = self.height as Real / 2.0;
        Point2::new(
            x_projected * self.aspect_ratio * half_height + self.width as Real / 2.0,
            y_projected * half_height + half_height,
        )
    }

    /// One screen point per input vertex, same order.
    pub fn project(&self, vertices: &[Point3<Real>]) -> Vec<Point2<Real>> {
        vertices.iter().map(|v| self.project_point(v)).collect()
    }
}
