use crate::geometry::Real;
use nalgebra::{Matrix3, Point3, Vector3};

/// Rotation about the three principal axes, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationAngles {
    pub x: Real,
    pub y: Real,
    pub z: Real,
}

impl RotationAngles {
    pub fn new(x: Real, y: Real, z: Real) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Angles reached after `elapsed_secs` when every axis turns at its own
    /// angular velocity (rad/s), all scaled by `speed`.
    pub fn from_elapsed(elapsed_secs: Real, angular_velocity: &Vector3<Real>, speed: Real) -> Self {
        let t = elapsed_secs * speed;
        Self {
            x: t * angular_velocity.x,
            y: t * angular_velocity.y,
            z: t * angular_velocity.z,
        }
    }
}

/// Right-handed rotation matrices about X (pitch), Y (yaw) and Z (roll).
pub fn rotation_matrices(
    angle_x: Real,
    angle_y: Real,
    angle_z: Real,
) -> (Matrix3<Real>, Matrix3<Real>, Matrix3<Real>) {
    let (sin_x, cos_x) = angle_x.sin_cos();
    let (sin_y, cos_y) = angle_y.sin_cos();
    let (sin_z, cos_z) = angle_z.sin_cos();

    // Matrix3::new takes its arguments row by row
    let rotation_x = Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, cos_x, -sin_x, //
        0.0, sin_x, cos_x,
    );
    let rotation_y = Matrix3::new(
        cos_y, 0.0, sin_y, //
        0.0, 1.0, 0.0, //
        -sin_y, 0.0, cos_y,
    );
    let rotation_z = Matrix3::new(
        cos_z, -sin_z, 0.0, //
        sin_z, cos_z, 0.0, //
        0.0, 0.0, 1.0,
    );

    (rotation_x, rotation_y, rotation_z)
}

/// Composed rotation `Rx · Ry · Rz`: applied to a column vector, Z acts
/// first, then Y, then X.
pub fn compose_rotation(angles: &RotationAngles) -> Matrix3<Real> {
    let (rotation_x, rotation_y, rotation_z) = rotation_matrices(angles.x, angles.y, angles.z);
    rotation_x * rotation_y * rotation_z
}

/// Rotates every point by `rotation`, returning new points in the same order.
pub fn rotate_points(points: &[Point3<Real>], rotation: &Matrix3<Real>) -> Vec<Point3<Real>> {
    points.iter().map(|p| Point3::from(rotation * p.coords)).collect()
}

/// Unit vector in the direction of `vector`; a zero vector is returned as-is.
pub fn normalize(vector: &Vector3<Real>) -> Vector3<Real> {
    let magnitude = vector.norm();
    if magnitude > 0.0 {
        vector / magnitude
    } else {
        *vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOLERANCE: Real = 1e-12;

    #[test]
    fn test_zero_angles_give_identity() {
        let rotation = compose_rotation(&RotationAngles::zero());
        assert!((rotation - Matrix3::identity()).norm() < TOLERANCE);
    }

    #[test]
    fn test_right_handed_axes() {
        let (rx, ry, rz) = rotation_matrices(FRAC_PI_2, FRAC_PI_2, FRAC_PI_2);
        // +y rolls onto +z about X, +z onto +x about Y, +x onto +y about Z
        assert!((rx * Vector3::y() - Vector3::z()).norm() < TOLERANCE);
        assert!((ry * Vector3::z() - Vector3::x()).norm() < TOLERANCE);
        assert!((rz * Vector3::x() - Vector3::y()).norm() < TOLERANCE);
    }

    #[test]
    fn test_composition_order_applies_z_first() {
        let angles = RotationAngles::new(0.4, -1.1, 2.3);
        let (rx, ry, rz) = rotation_matrices(angles.x, angles.y, angles.z);
        let v = Vector3::new(0.3, -2.0, 1.5);
        let stepwise = rx * (ry * (rz * v));
        assert!((compose_rotation(&angles) * v - stepwise).norm() < TOLERANCE);
    }

    #[test]
    fn test_composed_rotation_is_orthonormal() {
        for angles in [
            RotationAngles::new(0.3, 0.5, 0.1),
            RotationAngles::new(-PI, 2.0 * PI, 7.25),
            RotationAngles::new(1e6, -3.0, 0.0),
        ] {
            let rotation = compose_rotation(&angles);
            assert!((rotation.transpose() * rotation - Matrix3::identity()).norm() < 1e-9);
            assert!((rotation.determinant() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_single_axis_negation_undoes_rotation() {
        let forward = compose_rotation(&RotationAngles::new(0.0, 0.7, 0.0));
        let back = compose_rotation(&RotationAngles::new(0.0, -0.7, 0.0));
        assert!((back * forward - Matrix3::identity()).norm() < TOLERANCE);
    }

    #[test]
    fn test_from_elapsed_scales_each_axis() {
        let velocity = Vector3::new(0.3, 0.5, 0.1);
        let angles = RotationAngles::from_elapsed(2.0, &velocity, 1.5);
        assert!((angles.x - 0.9).abs() < TOLERANCE);
        assert!((angles.y - 1.5).abs() < TOLERANCE);
        assert!((angles.z - 0.3).abs() < TOLERANCE);
    }

    #[test]
    fn test_normalize_keeps_zero_vector() {
        assert_eq!(normalize(&Vector3::zeros()), Vector3::zeros());
        let unit = normalize(&Vector3::new(3.0, 0.0, 4.0));
        assert!((unit - Vector3::new(0.6, 0.0, 0.8)).norm() < TOLERANCE);
    }
}
