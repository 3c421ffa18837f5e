//! Keypoint thinning: score ordering, suppression and top-K capping.

use imageproc::corners::Corner;
use std::cmp::Ordering;

fn corner_cmp_desc(a: &Corner, b: &Corner) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Keeps the strongest corners at least `radius + 1` apart.
///
/// Corners are sorted by descending score with row-major tie-breaking and
/// kept if they are farther than `radius` in Chebyshev distance from every
/// corner kept before them. At most `k` corners are returned.
pub fn select_keypoints(mut corners: Vec<Corner>, radius: u32, k: usize) -> Vec<Corner> {
    corners.sort_by(corner_cmp_desc);
    if radius == 0 {
        corners.truncate(k);
        return corners;
    }

    let mut kept: Vec<Corner> = Vec::with_capacity(k.min(corners.len()));
    'outer: for corner in corners {
        if kept.len() == k {
            break;
        }
        for other in kept.iter() {
            let dx = corner.x.abs_diff(other.x);
            let dy = corner.y.abs_diff(other.y);
            if dx.max(dy) <= radius {
                continue 'outer;
            }
        }
        kept.push(corner);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: u32, y: u32, score: f32) -> Corner {
        Corner::new(x, y, score)
    }

    #[test]
    fn suppression_keeps_local_maxima() {
        let kept = select_keypoints(
            vec![c(10, 10, 5.0), c(11, 10, 9.0), c(30, 30, 1.0)],
            2,
            10,
        );
        assert_eq!(kept.len(), 2);
        assert_eq!((kept[0].x, kept[0].y), (11, 10));
        assert_eq!((kept[1].x, kept[1].y), (30, 30));
    }

    #[test]
    fn ties_break_in_row_major_order() {
        let kept = select_keypoints(vec![c(50, 5, 1.0), c(5, 5, 1.0), c(5, 1, 1.0)], 0, 2);
        assert_eq!((kept[0].x, kept[0].y), (5, 1));
        assert_eq!((kept[1].x, kept[1].y), (5, 5));
    }
}
