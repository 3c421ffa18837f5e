//! Intensity-centroid orientation and steered BRIEF descriptors.

use super::Descriptor;
use image::GrayImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PATCH_RADIUS: i32 = 15;
const PAIRS: usize = 256;

/// Test-pair offsets for a 256-bit descriptor.
#[derive(Clone, Debug)]
pub struct SamplingPattern {
    pairs: Vec<[i8; 4]>,
}

impl SamplingPattern {
    /// Minimum distance from the border for a keypoint to be described.
    ///
    /// Covers a rotated patch corner: `ceil(15 * sqrt(2)) + 1`.
    pub const MARGIN: u32 = 23;

    /// Draws `(x1, y1, x2, y2)` offsets uniformly inside the patch.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let pairs = (0..PAIRS)
            .map(|_| {
                let mut p = [0i8; 4];
                for v in p.iter_mut() {
                    *v = rng.random_range(-PATCH_RADIUS..=PATCH_RADIUS) as i8;
                }
                p
            })
            .collect();
        Self { pairs }
    }

    /// Computes the descriptor at `(x, y)` with the pattern rotated by `angle`.
    ///
    /// The caller keeps `(x, y)` at least [`Self::MARGIN`] pixels inside
    /// the image.
    pub fn describe(&self, image: &GrayImage, x: u32, y: u32, angle: f32) -> Descriptor {
        let (sin, cos) = angle.sin_cos();
        let sample = |dx: i8, dy: i8| -> u8 {
            let (dx, dy) = (dx as f32, dy as f32);
            let rx = (cos * dx - sin * dy).round() as i64;
            let ry = (sin * dx + cos * dy).round() as i64;
            let px = (x as i64 + rx).clamp(0, image.width() as i64 - 1) as u32;
            let py = (y as i64 + ry).clamp(0, image.height() as i64 - 1) as u32;
            image.get_pixel(px, py)[0]
        };

        let mut out = [0u8; 32];
        for (bit, pair) in self.pairs.iter().enumerate() {
            if sample(pair[0], pair[1]) < sample(pair[2], pair[3]) {
                out[bit / 8] |= 1 << (bit % 8);
            }
        }
        out
    }
}

/// Orientation of the intensity centroid inside a circular patch.
pub(crate) fn centroid_angle(image: &GrayImage, x: u32, y: u32) -> f32 {
    let (w, h) = (image.width() as i64, image.height() as i64);
    let mut m10 = 0.0f64;
    let mut m01 = 0.0f64;
    let r2 = PATCH_RADIUS * PATCH_RADIUS;
    for dy in -PATCH_RADIUS..=PATCH_RADIUS {
        for dx in -PATCH_RADIUS..=PATCH_RADIUS {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let px = x as i64 + dx as i64;
            let py = y as i64 + dy as i64;
            if px < 0 || py < 0 || px >= w || py >= h {
                continue;
            }
            let v = image.get_pixel(px as u32, py as u32)[0] as f64;
            m10 += dx as f64 * v;
            m01 += dy as f64 * v;
        }
    }
    m01.atan2(m10) as f32
}
