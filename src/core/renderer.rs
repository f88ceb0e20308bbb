use crate::core::frame_buffer::FrameBuffer;
use crate::core::projector::Projector;
use crate::core::texture_mapper::{FaceImage, map_texture_to_face};
use crate::geometry::Real;
use crate::geometry::camera::Camera;
use crate::scene::cube::{Cube, Face};
use log::debug;
use nalgebra::Point2;

/// Composites a textured cube into RGB frames with the painter's algorithm.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub width: usize,
    pub height: usize,
    projector: Projector,
}

impl Renderer {
    pub fn new(width: usize, height: usize, camera: Camera) -> Self {
        Renderer {
            width,
            height,
            projector: Projector::new(camera, width, height),
        }
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Screen positions of the cube's 8 transformed vertices.
    pub fn project_vertices(&self, cube: &Cube) -> Vec<Point2<Real>> {
        self.projector.project(cube.transformed_vertices())
    }

    /// Warps the texture onto one face given the projected vertices.
    pub fn map_face(&self, cube: &Cube, projected: &[Point2<Real>], face: &Face) -> Option<FaceImage> {
        let quad = face_quad(projected, face);
        map_texture_to_face(cube.texture(), &quad, self.width, self.height)
    }

    /// Renders one frame: black background, faces painted farthest first,
    /// each face overwriting the frame wherever its coverage mask is set.
    pub fn render(&self, cube: &Cube) -> FrameBuffer {
        let mut frame = FrameBuffer::new(self.width, self.height);
        let projected = self.project_vertices(cube);

        for face in sort_faces_back_to_front(cube.faces()) {
            let Some(face_image) = self.map_face(cube, &projected, face) else {
                debug!(
                    "Skipping face {:?}: no usable homography (depth {:.4})",
                    face.side(),
                    face.depth()
                );
                continue;
            };
            composite(&mut frame, &face_image);
        }
        frame
    }
}

/// Faces ordered by depth, farthest first. The sort is stable, so faces at
/// equal depth keep their definition order.
pub fn sort_faces_back_to_front(faces: &[Face]) -> Vec<&Face> {
    let mut sorted: Vec<&Face> = faces.iter().collect();
    sorted.sort_by(|a, b| b.depth().total_cmp(&a.depth()));
    sorted
}

/// The face's projected vertices in index order.
pub fn face_quad(projected: &[Point2<Real>], face: &Face) -> [Point2<Real>; 4] {
    face.indices().map(|i| projected[i])
}

/// Copies every masked pixel of `face_image` into `frame`.
fn composite(frame: &mut FrameBuffer, face_image: &FaceImage) {
    let row_bytes = frame.width * 3;
    for (y, x_start, x_end) in face_image.mask.spans() {
        let start = y * row_bytes + x_start * 3;
        let end = y * row_bytes + (x_end + 1) * 3;
        frame.color_buffer[start..end]
            .copy_from_slice(&face_image.image.color_buffer[start..end]);
    }
}
