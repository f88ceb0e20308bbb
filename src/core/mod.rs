pub mod frame_buffer;
pub mod homography;
pub mod projector;
pub mod renderer;
pub mod texture_mapper;
