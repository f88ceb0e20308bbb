use crate::core::frame_buffer::FrameBuffer;
use crate::core::homography::Homography;
use crate::geometry::{EPSILON, Real};
use crate::material_system::texture::Texture;
use nalgebra::Point2;

/// Slack used when testing lattice points against polygon edges.
const EDGE_TOLERANCE: Real = 1e-9;

// ===== Coverage mask =====

/// Pixels covered by a convex screen-space polygon, stored as at most one
/// inclusive `[x_start, x_end]` span per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMask {
    pub width: usize,
    pub height: usize,
    rows: Vec<Option<(usize, usize)>>,
}

impl CoverageMask {
    pub fn empty(width: usize, height: usize) -> Self {
        CoverageMask {
            width,
            height,
            rows: vec![None; height],
        }
    }

    /// Marks every pixel `(x, y)` whose lattice point lies inside or on the
    /// boundary of the polygon, clipped to the frame.
    ///
    /// The polygon is assumed convex, which holds for any planar quad
    /// projected from in front of the camera. Non-finite vertices give an
    /// empty mask.
    pub fn fill_convex(points: &[Point2<Real>], width: usize, height: usize) -> Self {
        let mut mask = CoverageMask::empty(width, height);
        if points.len() < 3 || width == 0 || height == 0 {
            return mask;
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return mask;
        }

        let min_y = points.iter().map(|p| p.y).fold(Real::INFINITY, Real::min);
        let max_y = points.iter().map(|p| p.y).fold(Real::NEG_INFINITY, Real::max);
        let first_row = (min_y - EDGE_TOLERANCE).ceil().max(0.0);
        let last_row = (max_y + EDGE_TOLERANCE).floor().min((height - 1) as Real);
        if first_row > last_row {
            return mask;
        }

        let max_x = (width - 1) as Real;
        for y in first_row as usize..=last_row as usize {
            let Some((left, right)) = row_extent(points, y as Real) else {
                continue;
            };
            let x_start = (left - EDGE_TOLERANCE).ceil().max(0.0);
            let x_end = (right + EDGE_TOLERANCE).floor().min(max_x);
            if x_start <= x_end {
                mask.rows[y] = Some((x_start as usize, x_end as usize));
            }
        }
        mask
    }

    /// Inclusive covered span of row `y`.
    pub fn span(&self, y: usize) -> Option<(usize, usize)> {
        self.rows.get(y).copied().flatten()
    }

    pub fn spans(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(y, span)| span.map(|(x_start, x_end)| (y, x_start, x_end)))
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.span(y)
            .is_some_and(|(x_start, x_end)| x_start <= x && x <= x_end)
    }

    pub fn pixel_count(&self) -> usize {
        self.spans()
            .map(|(_, x_start, x_end)| x_end - x_start + 1)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Option::is_none)
    }

    /// Covered pixels in row-major order, as `(x, y)`.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + Clone + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(y, span)| span.map(|(x_start, x_end)| (y, x_start, x_end)))
            .flat_map(|(y, x_start, x_end)| (x_start..=x_end).map(move |x| (x, y)))
    }
}

/// Leftmost and rightmost boundary x on the horizontal line at `y`.
fn row_extent(points: &[Point2<Real>], y: Real) -> Option<(Real, Real)> {
    let mut extent: Option<(Real, Real)> = None;
    let mut include = |x: Real| {
        extent = Some(match extent {
            Some((left, right)) => (left.min(x), right.max(x)),
            None => (x, x),
        });
    };

    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        let (low, high) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
        if y < low - EDGE_TOLERANCE || y > high + EDGE_TOLERANCE {
            continue;
        }

        let dy = b.y - a.y;
        if dy.abs() < EDGE_TOLERANCE {
            // Horizontal edge: the whole edge lies on this row
            include(a.x);
            include(b.x);
        } else {
            let t = ((y - a.y) / dy).clamp(0.0, 1.0);
            include(a.x + t * (b.x - a.x));
        }
    }
    extent
}

// ===== Texture mapping =====

/// One sampled pixel: where it lands on screen and which texel it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexelMatch {
    pub screen: (usize, usize),
    pub texel: (u32, u32),
}

/// Lazily maps every covered pixel back into texture space.
///
/// `(x, y, 1)` goes through `inverse`; pixels with a homogeneous weight
/// below [`EPSILON`] are dropped, the rest are divided out and truncated
/// toward zero, and pixels landing outside `[0, tex_width) × [0, tex_height)`
/// are dropped. A clone resumes from the same position; calling this again
/// starts over.
pub fn texel_mapping<'a>(
    mask: &'a CoverageMask,
    inverse: &'a Homography,
    tex_width: u32,
    tex_height: u32,
) -> impl Iterator<Item = TexelMatch> + Clone + 'a {
    let (tex_w, tex_h) = (tex_width as Real, tex_height as Real);
    mask.pixels().filter_map(move |(x, y)| {
        let h = inverse.apply_homogeneous(x as Real, y as Real);
        if h.z.abs() < EPSILON {
            return None;
        }
        let u = (h.x / h.z).trunc();
        let v = (h.y / h.z).trunc();
        // NaN fails every comparison and is dropped here too
        if !(u >= 0.0 && u < tex_w && v >= 0.0 && v < tex_h) {
            return None;
        }
        Some(TexelMatch {
            screen: (x, y),
            texel: (u as u32, v as u32),
        })
    })
}

/// Texture-space corners matched with a face's vertices in index order.
///
/// A one-texel axis still gets a unit extent so the quad never collapses.
pub fn texture_corners(tex_width: u32, tex_height: u32) -> [Point2<Real>; 4] {
    let w = tex_width.saturating_sub(1).max(1) as Real;
    let h = tex_height.saturating_sub(1).max(1) as Real;
    [
        Point2::new(0.0, 0.0),
        Point2::new(w, 0.0),
        Point2::new(w, h),
        Point2::new(0.0, h),
    ]
}

/// A single face warped into screen space.
#[derive(Debug, Clone)]
pub struct FaceImage {
    pub mask: CoverageMask,
    /// Frame-sized RGB buffer; covered pixels whose texel was discarded stay black
    pub image: FrameBuffer,
    pub homography: Homography,
}

/// Warps `texture` onto the screen quad by inverse mapping.
///
/// Returns `None` when the texture-to-quad homography cannot be built or
/// inverted (degenerate or collinear quads).
pub fn map_texture_to_face(
    texture: &Texture,
    quad: &[Point2<Real>; 4],
    width: usize,
    height: usize,
) -> Option<FaceImage> {
    let corners = texture_corners(texture.width, texture.height);
    let homography = Homography::from_correspondences(&corners, quad)?;
    let inverse = homography.inverse()?;

    let mask = CoverageMask::fill_convex(quad, width, height);
    let mut image = FrameBuffer::new(width, height);
    for m in texel_mapping(&mask, &inverse, texture.width, texture.height) {
        if let Some(color) = texture.texel(m.texel.0 as i64, m.texel.1 as i64) {
            image.set_pixel(m.screen.0, m.screen.1, color);
        }
    }

    Some(FaceImage {
        mask,
        image,
        homography,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: Real, y0: Real, x1: Real, y1: Real) -> [Point2<Real>; 4] {
        [
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    /// Brute-force closed-polygon membership for convex polygons.
    fn lattice_count(points: &[Point2<Real>], width: usize, height: usize) -> usize {
        let n = points.len();
        let mut count = 0;
        for y in 0..height {
            for x in 0..width {
                let (px, py) = (x as Real, y as Real);
                let crosses: Vec<Real> = (0..n)
                    .map(|i| {
                        let a = points[i];
                        let b = points[(i + 1) % n];
                        (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
                    })
                    .collect();
                let inside = crosses.iter().all(|&c| c >= -1e-9)
                    || crosses.iter().all(|&c| c <= 1e-9);
                if inside {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_axis_aligned_square_count() {
        let quad = square(100.0, 100.0, 200.0, 200.0);
        let mask = CoverageMask::fill_convex(&quad, 600, 600);
        assert_eq!(mask.pixel_count(), 101 * 101);
        assert_eq!(mask.span(100), Some((100, 200)));
        assert_eq!(mask.span(99), None);
        assert!(mask.contains(150, 150));
        assert!(!mask.contains(201, 150));
    }

    #[test]
    fn test_diamond_count() {
        let diamond = [
            Point2::new(60.0, 50.0),
            Point2::new(50.0, 60.0),
            Point2::new(40.0, 50.0),
            Point2::new(50.0, 40.0),
        ];
        let mask = CoverageMask::fill_convex(&diamond, 100, 100);
        assert_eq!(mask.pixel_count(), 221);
        assert_eq!(mask.span(40), Some((50, 50)));
        assert_eq!(mask.span(50), Some((40, 60)));
    }

    #[test]
    fn test_half_pixel_offsets() {
        let quad = square(10.5, 10.5, 20.5, 20.5);
        let mask = CoverageMask::fill_convex(&quad, 64, 64);
        assert_eq!(mask.pixel_count(), 100);
        assert_eq!(mask.span(11), Some((11, 20)));
    }

    #[test]
    fn test_clipped_to_frame() {
        let quad = square(-10.0, -10.0, 10.0, 10.0);
        let mask = CoverageMask::fill_convex(&quad, 64, 64);
        assert_eq!(mask.pixel_count(), 121);

        let outside = square(100.0, 100.0, 120.0, 120.0);
        assert!(CoverageMask::fill_convex(&outside, 64, 64).is_empty());
    }

    #[test]
    fn test_perspective_quad_matches_lattice() {
        let quad = [
            Point2::new(12.3, 8.9),
            Point2::new(70.2, 15.1),
            Point2::new(64.8, 71.7),
            Point2::new(5.5, 60.4),
        ];
        let mask = CoverageMask::fill_convex(&quad, 80, 80);
        assert_eq!(mask.pixel_count(), lattice_count(&quad, 80, 80));
    }

    #[test]
    fn test_non_finite_vertices_give_empty_mask() {
        let mut quad = square(0.0, 0.0, 10.0, 10.0);
        quad[2].x = Real::NAN;
        assert!(CoverageMask::fill_convex(&quad, 32, 32).is_empty());
    }

    #[test]
    fn test_pixels_are_row_major_and_restartable() {
        let mask = CoverageMask::fill_convex(&square(1.0, 1.0, 2.0, 2.0), 8, 8);
        let pixels: Vec<_> = mask.pixels().collect();
        assert_eq!(pixels, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);

        let mut iter = mask.pixels();
        iter.next();
        let rest = iter.clone();
        assert_eq!(iter.count(), 3);
        assert_eq!(rest.count(), 3);
    }

    #[test]
    fn test_identity_mapping_reads_same_texel() {
        let mask = CoverageMask::fill_convex(&square(0.0, 0.0, 3.0, 3.0), 8, 8);
        let identity = Homography::from_matrix(nalgebra::Matrix3::identity());
        let matches: Vec<_> = texel_mapping(&mask, &identity, 2, 3).collect();

        // x in [0, 2) and y in [0, 3) survive out of the 4x4 covered pixels
        assert_eq!(matches.len(), 6);
        assert!(matches.iter().all(|m| m.screen.0 as u32 == m.texel.0
            && m.screen.1 as u32 == m.texel.1));
    }

    #[test]
    fn test_zero_weight_pixels_are_discarded() {
        let mask = CoverageMask::fill_convex(&square(0.0, 0.0, 4.0, 0.0), 8, 8);
        // w = x - 2 vanishes at x = 2
        let h = Homography::from_matrix(nalgebra::Matrix3::new(
            1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -2.0,
        ));
        let screens: Vec<_> = texel_mapping(&mask, &h, 100, 100)
            .map(|m| m.screen.0)
            .collect();
        assert!(!screens.contains(&2));
    }

    #[test]
    fn test_single_texel_corners_do_not_collapse() {
        let corners = texture_corners(1, 1);
        assert_eq!(corners[2], Point2::new(1.0, 1.0));
        assert_eq!(texture_corners(256, 128)[2], Point2::new(255.0, 127.0));
    }

    #[test]
    fn test_map_solid_texture_fills_mask() {
        let texture = Texture::from_rgb8(2, 2, vec![200; 12]).unwrap();
        let quad = square(10.0, 10.0, 40.0, 40.0);
        let face = map_texture_to_face(&texture, &quad, 64, 64).unwrap();

        assert_eq!(face.mask.pixel_count(), 31 * 31);
        assert_eq!(face.image.get_pixel(25, 25), Some([200, 200, 200]));
        assert_eq!(face.image.get_pixel(5, 5), Some([0, 0, 0]));
    }

    #[test]
    fn test_map_degenerate_quad_is_none() {
        let texture = Texture::from_rgb8(2, 2, vec![200; 12]).unwrap();
        let flat = [Point2::new(5.0, 5.0); 4];
        assert!(map_texture_to_face(&texture, &flat, 64, 64).is_none());
    }
}
