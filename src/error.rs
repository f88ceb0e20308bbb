use thiserror::Error;

/// Errors raised by the layers around the rendering core.
///
/// The core itself never fails: numeric degeneracies are clamped or the
/// affected pixels/faces are skipped.
#[derive(Debug, Error)]
pub enum CubeError {
    #[error("texture error: {message}")]
    Texture { message: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("video encoding failed: {message}")]
    Video { message: String },

    #[error("preview window failed: {message}")]
    Gui { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl CubeError {
    pub fn texture(message: impl Into<String>) -> Self {
        CubeError::Texture {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        CubeError::Config {
            message: message.into(),
        }
    }

    pub fn video(message: impl Into<String>) -> Self {
        CubeError::Video {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CubeError>;
