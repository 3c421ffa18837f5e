//! Brute-force nearest-neighbour matching under Hamming distance.

use super::Descriptor;

/// One query-to-train correspondence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DescriptorMatch {
    pub query_idx: usize,
    pub train_idx: usize,
    pub distance: u32,
}

#[inline]
pub fn hamming(a: &Descriptor, b: &Descriptor) -> u32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x ^ y).count_ones()).sum()
}

/// Finds the nearest train descriptor for every query descriptor.
///
/// Ties keep the lowest train index. Returns an empty list when either
/// side is empty.
pub fn match_descriptors(query: &[Descriptor], train: &[Descriptor]) -> Vec<DescriptorMatch> {
    if train.is_empty() {
        return Vec::new();
    }
    query
        .iter()
        .enumerate()
        .filter_map(|(query_idx, q)| {
            let mut best: Option<DescriptorMatch> = None;
            for (train_idx, t) in train.iter().enumerate() {
                let distance = hamming(q, t);
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(DescriptorMatch {
                        query_idx,
                        train_idx,
                        distance,
                    });
                }
            }
            best
        })
        .collect()
}
