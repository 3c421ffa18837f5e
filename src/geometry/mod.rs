//! Planar geometry helpers: points, lines, polygons and homographies.
//!
//! All coordinates are image coordinates in pixels, x to the right and y
//! down. Functions here are pure and allocation-free unless they return a
//! collection.

mod homography;
mod line;

pub use homography::{estimate_homography, homography_from_4pt, Homography};
pub use line::{intersect_lines, sort_by_length_desc, sort_by_sequence, Line};

/// Real-valued 2D point.
pub type Point = nalgebra::Point2<f32>;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f32 {
    nalgebra::distance(&a, &b)
}

/// Direction of the vector `a -> b` in degrees, in (-180, 180].
#[inline]
pub fn angle_deg(a: Point, b: Point) -> f32 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

/// Signed area of a closed polygon (shoelace formula).
///
/// In image coordinates a polygon traversed clockwise on screen has a
/// positive area.
pub fn signed_area(points: &[Point]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0f64;
    let mut prev = points[points.len() - 1];
    for &p in points {
        acc += f64::from(prev.x) * f64::from(p.y) - f64::from(p.x) * f64::from(prev.y);
        prev = p;
    }
    (acc * 0.5) as f32
}

/// Returns true if the three points lie on a line within `tol` pixels.
pub fn is_collinear(a: Point, b: Point, c: Point, tol: f32) -> bool {
    let base = distance(a, c).max(distance(a, b)).max(distance(b, c));
    if base <= f32::EPSILON {
        return true;
    }
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    // Twice the triangle area over the longest side is the height.
    (cross.abs() / base) <= tol
}

/// Returns true if segments `p1-p2` and `q1-q2` properly cross.
pub(crate) fn segments_cross(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    fn orient(a: Point, b: Point, c: Point) -> f32 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}
