// geometry/mod.rs
// Rotation math and the camera model
pub mod camera;
pub mod transform;

/// Scalar type of the whole pipeline.
pub type Real = f64;

/// Smallest magnitude allowed for a perspective divisor or a homogeneous
/// weight. Shared by the projector and the texture mapper.
pub const EPSILON: Real = 1e-10;
