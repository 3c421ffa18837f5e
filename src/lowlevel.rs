//! Low-level building blocks for custom detection pipelines.
//!
//! These expose the individual recovery strategies, geometry helpers and
//! feature primitives behind the high-level `Detector` API. Most users
//! should prefer `Detector`, `Deck` and the two matching strategies.

pub use crate::features::{
    hamming, match_descriptors, select_keypoints, verify, Descriptor, DescriptorMatch,
    FeatureExtractor, FeatureSet, Keypoint, SamplingPattern,
};
pub use crate::frame::{adaptive_threshold_inv, rotate_half_turn};
pub use crate::geometry::{
    estimate_homography, homography_from_4pt, intersect_lines, Homography, Line,
};
pub use crate::quad::{canonical_orientation, BoundingRect, DiagonalPairing, EdgeIntersection};
