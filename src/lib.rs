//! Software renderer for a textured rotating cube.
//!
//! The pipeline per frame is: rotate the cube ([`scene::cube::Cube::rotate`]),
//! project its vertices ([`core::projector::Projector`]), sort faces back to
//! front, warp the texture onto every face through a planar homography
//! ([`core::texture_mapper`]) and paint the faces over a black frame
//! ([`core::renderer::Renderer::render`]).
//!
//! Everything under `io`, `utils` and `ui` is glue around that pipeline:
//! settings, texture files, video encoding and the preview window.

pub mod core;
pub mod error;
pub mod geometry;
pub mod io;
pub mod material_system;
pub mod scene;
pub mod ui;
pub mod utils;

pub use crate::core::frame_buffer::FrameBuffer;
pub use crate::core::renderer::Renderer;
pub use crate::error::{CubeError, Result};
pub use crate::geometry::camera::Camera;
pub use crate::geometry::transform::RotationAngles;
pub use crate::material_system::texture::Texture;
pub use crate::scene::cube::{Cube, Face, FaceSide};
