use crate::core::frame_buffer::FrameBuffer;
use crate::core::renderer::Renderer;
use crate::error::Result;
use crate::geometry::Real;
use crate::geometry::transform::RotationAngles;
use crate::io::render_settings::RenderSettings;
use crate::material_system::texture::Texture;
use crate::scene::cube::Cube;
use nalgebra::Vector3;
use std::sync::Arc;

/// A cube, its renderer and the animation parameters that drive it.
///
/// Time comes from outside: the preview window passes wall-clock seconds,
/// the recorder passes `frame_index / fps`.
#[derive(Debug, Clone)]
pub struct CubeAnimation {
    cube: Cube,
    renderer: Renderer,
    angular_velocity: Vector3<Real>,
    speed: Real,
}

impl CubeAnimation {
    pub fn new(settings: &RenderSettings, texture: Arc<Texture>) -> Result<Self> {
        Ok(CubeAnimation {
            cube: Cube::new(texture, settings.cube_size),
            renderer: Renderer::new(settings.width, settings.height, settings.camera()?),
            angular_velocity: settings.angular_velocity_vec()?,
            speed: settings.speed,
        })
    }

    /// Rotates the cube to where it is after `elapsed_secs`.
    pub fn update(&mut self, elapsed_secs: Real) -> RotationAngles {
        let angles = RotationAngles::from_elapsed(elapsed_secs, &self.angular_velocity, self.speed);
        self.cube.rotate_to(angles);
        angles
    }

    pub fn render(&self) -> FrameBuffer {
        self.renderer.render(&self.cube)
    }

    pub fn render_at(&mut self, elapsed_secs: Real) -> FrameBuffer {
        self.update(elapsed_secs);
        self.render()
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

/// Animation time of frame `frame_index` at `fps` frames per second.
pub fn frame_time(frame_index: usize, fps: usize) -> Real {
    frame_index as Real / fps.max(1) as Real
}
