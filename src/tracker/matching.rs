//! Matching utilities for hand tracking.

use ndarray::Array2;

use crate::landmarks::{HandObservation, Handedness, Keypoint};

/// Where a track was last seen, for association.
#[derive(Debug, Clone, Copy)]
pub struct Anchor {
    pub centroid: Keypoint,
    pub handedness: Handedness,
}

/// Compute the centroid distance matrix between tracks and observations.
///
/// Pairs with disagreeing handedness are never matched and cost infinity.
pub fn centroid_distance(anchors: &[Anchor], observations: &[HandObservation]) -> Array2<f32> {
    let mut dists = Array2::zeros((anchors.len(), observations.len()));
    for (i, a) in anchors.iter().enumerate() {
        for (j, o) in observations.iter().enumerate() {
            dists[[i, j]] = if a.handedness == o.handedness {
                a.centroid.planar_distance(&o.centroid())
            } else {
                f32::INFINITY
            };
        }
    }
    dists
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Greedy one-to-one assignment.
///
/// Pairs under `thresh` are taken in ascending cost order, ties broken by
/// row then column, so the lower-distance pairing always wins a conflict.
pub fn greedy_assignment(cost_matrix: &Array2<f32>, thresh: f32) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    let mut pairs: Vec<(f32, usize, usize)> = cost_matrix
        .indexed_iter()
        .filter(|&(_, &c)| c <= thresh)
        .map(|((i, j), &c)| (c, i, j))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    let mut row_used = vec![false; num_rows];
    let mut col_used = vec![false; num_cols];
    let mut matches = Vec::new();

    for (_, i, j) in pairs {
        if row_used[i] || col_used[j] {
            continue;
        }
        row_used[i] = true;
        col_used[j] = true;
        matches.push((i, j));
    }

    let unmatched_tracks = (0..num_rows).filter(|&i| !row_used[i]).collect();
    let unmatched_detections = (0..num_cols).filter(|&j| !col_used[j]).collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}
