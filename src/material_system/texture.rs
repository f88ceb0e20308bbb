use crate::error::{CubeError, Result};
use image::{DynamicImage, RgbImage};
use log::info;
use std::path::Path;

/// Immutable RGB texel grid shared by every face of a cube.
///
/// Alpha is dropped on construction. A texture always has at least one
/// texel.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    image: RgbImage,
}

impl Texture {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|e| {
            CubeError::texture(format!("failed to load '{}': {}", path_ref.display(), e))
        })?;
        let texture = Self::from_image(img)?;
        info!(
            "Loaded texture {} ({}x{})",
            path_ref.display(),
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    pub fn from_image(img: DynamicImage) -> Result<Self> {
        Self::from_rgb_image(img.into_rgb8())
    }

    pub fn from_rgb_image(image: RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(CubeError::texture(format!(
                "texture must not be empty (got {}x{})",
                width, height
            )));
        }
        Ok(Texture {
            width,
            height,
            image,
        })
    }

    /// Row-major RGB bytes, three per texel.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(CubeError::texture(format!(
                "expected {} bytes for a {}x{} RGB texture, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        let image = RgbImage::from_raw(width, height, data)
            .ok_or_else(|| CubeError::texture("RGB buffer does not match its dimensions"))?;
        Self::from_rgb_image(image)
    }

    /// Row-major RGBA bytes; the alpha channel is ignored.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CubeError::texture(format!(
                "expected {} bytes for a {}x{} RGBA texture, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        let rgb = data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Self::from_rgb8(width, height, rgb)
    }

    /// Texel at integer coordinates, `None` outside the grid.
    pub fn texel(&self, x: i64, y: i64) -> Option<[u8; 3]> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.image.get_pixel(x as u32, y as u32).0)
    }
}
