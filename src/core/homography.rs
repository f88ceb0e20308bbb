use crate::geometry::{EPSILON, Real};
use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};

/// Planar projective transform `p' ~ H · (x, y, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Homography {
    matrix: Matrix3<Real>,
}

impl Homography {
    pub fn from_matrix(matrix: Matrix3<Real>) -> Self {
        Homography { matrix }
    }

    pub fn matrix(&self) -> &Matrix3<Real> {
        &self.matrix
    }

    /// Estimates the homography taking each `src[i]` to `dst[i]`.
    ///
    /// Both point sets are normalized (centroid at the origin, mean distance
    /// √2) before the 8×8 linear system with `h33 = 1` is solved, then the
    /// normalization is undone. Returns `None` when three points of either
    /// set are collinear (or all coincide), when the system is singular, or
    /// when the result is not invertible.
    pub fn from_correspondences(src: &[Point2<Real>; 4], dst: &[Point2<Real>; 4]) -> Option<Self> {
        let src_norm = normalizing_transform(src)?;
        let dst_norm = normalizing_transform(dst)?;
        let src_n = src.map(|p| apply_affine(&src_norm, &p));
        let dst_n = dst.map(|p| apply_affine(&dst_norm, &p));
        if has_collinear_triple(&src_n) || has_collinear_triple(&dst_n) {
            return None;
        }

        let mut a = SMatrix::<Real, 8, 8>::zeros();
        let mut b = SVector::<Real, 8>::zeros();
        for (i, (s, d)) in src_n.iter().zip(dst_n.iter()).enumerate() {
            let (x, y, u, v) = (s.x, s.y, d.x, d.y);
            let r = 2 * i;
            a.row_mut(r)
                .copy_from_slice(&[x, y, 1.0, 0.0, 0.0, 0.0, -x * u, -y * u]);
            a.row_mut(r + 1)
                .copy_from_slice(&[0.0, 0.0, 0.0, x, y, 1.0, -x * v, -y * v]);
            b[r] = u;
            b[r + 1] = v;
        }

        let h = a.lu().solve(&b)?;
        if h.iter().any(|value| !value.is_finite()) {
            return None;
        }
        let normalized = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
        if normalized.determinant().abs() < EPSILON {
            return None;
        }

        let dst_denorm = dst_norm.try_inverse()?;
        let mut matrix = dst_denorm * normalized * src_norm;
        let scale = matrix[(2, 2)];
        if scale.abs() > EPSILON {
            matrix /= scale;
        }
        Some(Homography { matrix })
    }

    /// `None` when the matrix is singular or the inverse is not finite.
    pub fn inverse(&self) -> Option<Homography> {
        let inverse = self.matrix.try_inverse()?;
        if inverse.iter().all(|value| value.is_finite()) {
            Some(Homography { matrix: inverse })
        } else {
            None
        }
    }

    /// `H · (x, y, 1)` without the perspective divide.
    #[inline]
    pub fn apply_homogeneous(&self, x: Real, y: Real) -> Vector3<Real> {
        self.matrix * Vector3::new(x, y, 1.0)
    }

    /// Maps a point, or `None` when its homogeneous weight is within
    /// [`EPSILON`] of zero.
    pub fn apply(&self, point: &Point2<Real>) -> Option<Point2<Real>> {
        let h = self.apply_homogeneous(point.x, point.y);
        if h.z.abs() < EPSILON {
            return None;
        }
        Some(Point2::new(h.x / h.z, h.y / h.z))
    }
}

/// Similarity transform moving the centroid to the origin and scaling the
/// mean distance from it to √2.
fn normalizing_transform(points: &[Point2<Real>; 4]) -> Option<Matrix3<Real>> {
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return None;
    }
    let centroid = points.iter().fold(Vector3::zeros(), |acc, p| {
        acc + Vector3::new(p.x, p.y, 0.0)
    }) / points.len() as Real;
    let mean_distance = points
        .iter()
        .map(|p| ((p.x - centroid.x).powi(2) + (p.y - centroid.y).powi(2)).sqrt())
        .sum::<Real>()
        / points.len() as Real;
    if mean_distance < EPSILON {
        return None;
    }

    let s = std::f64::consts::SQRT_2 / mean_distance;
    Some(Matrix3::new(
        s, 0.0, -s * centroid.x, //
        0.0, s, -s * centroid.y, //
        0.0, 0.0, 1.0,
    ))
}

/// Any three of the points (already normalized) spanning less than
/// `COLLINEAR_AREA` makes the 8×8 system rank deficient.
fn has_collinear_triple(points: &[Point2<Real>; 4]) -> bool {
    const COLLINEAR_AREA: Real = 1e-9;
    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    TRIPLES.iter().any(|&[i, j, k]| {
        let (a, b, c) = (points[i], points[j], points[k]);
        (b - a).perp(&(c - a)).abs() < COLLINEAR_AREA
    })
}

fn apply_affine(transform: &Matrix3<Real>, p: &Point2<Real>) -> Point2<Real> {
    let h = transform * Vector3::new(p.x, p.y, 1.0);
    Point2::new(h.x, h.y)
}
